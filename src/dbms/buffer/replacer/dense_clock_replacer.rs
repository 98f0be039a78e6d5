use super::buffer_pool_replacer::{BufferPoolReplacerError, IBufferPoolReplacer};
use crate::dbms::types::FrameId;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum SlotStatus {
    /// Frame is not in the replacer
    Empty,
    /// Frame is victimizable and has spent its reference bit
    Untouched,
    /// Frame is victimizable and holds a reference bit
    Accessed,
}

/// Clock (second-chance) replacer over a dense status array, one slot per
/// frame id in `[0, pool_size)`.
///
/// Simpler than [`super::ClockReplacer`]: the scan runs in frame-id order
/// rather than insertion order, and frame ids outside the pool range are
/// rejected. Memory use is `pool_size` slots regardless of occupancy.
pub struct DenseClockReplacer {
    hand: FrameId,
    slots: Vec<SlotStatus>,
}

impl DenseClockReplacer {
    /// Creates a new [`DenseClockReplacer`] for a pool of `num_frames` frames.
    pub fn new(num_frames: usize) -> Self {
        Self {
            hand: 0,
            slots: vec![SlotStatus::Empty; num_frames],
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn check_range(&self, frame_id: FrameId) -> Result<(), BufferPoolReplacerError> {
        if frame_id >= self.capacity() {
            return Err(BufferPoolReplacerError::FrameOutOfRange(frame_id));
        }
        Ok(())
    }
}

impl IBufferPoolReplacer for DenseClockReplacer {
    fn victim(&mut self) -> Result<Option<FrameId>, BufferPoolReplacerError> {
        if let Ok(0) = self.size() {
            return Ok(None);
        }

        loop {
            let slot = self.hand;
            self.hand = (self.hand + 1) % self.capacity();
            match self.slots[slot] {
                SlotStatus::Empty => {}
                SlotStatus::Accessed => {
                    self.slots[slot] = SlotStatus::Untouched;
                }
                SlotStatus::Untouched => {
                    self.slots[slot] = SlotStatus::Empty;
                    return Ok(Some(slot));
                }
            }
        }
    }

    fn pin(&mut self, frame_id: FrameId) -> Result<(), BufferPoolReplacerError> {
        self.check_range(frame_id)?;
        self.slots[frame_id] = SlotStatus::Empty;
        Ok(())
    }

    fn unpin(&mut self, frame_id: FrameId) -> Result<(), BufferPoolReplacerError> {
        self.check_range(frame_id)?;
        self.slots[frame_id] = SlotStatus::Accessed;
        Ok(())
    }

    fn size(&self) -> Result<usize, BufferPoolReplacerError> {
        Ok(self
            .slots
            .iter()
            .filter(|status| **status != SlotStatus::Empty)
            .count())
    }
}
