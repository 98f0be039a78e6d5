use thiserror::Error;

use crate::dbms::types::FrameId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferPoolReplacerError {
    /// Frame is out of the range the replacer was sized for
    #[error("frame {0} is out of range")]
    FrameOutOfRange(FrameId),
    /// Every clock slot is occupied; a new frame cannot be tracked
    #[error("no open clock slot for frame {0}")]
    NoFreeSlot(FrameId),
}

/// Eviction policy over buffer frames. The replacer tracks which frames are
/// victimizable (resident, pin count zero) and answers which of them to
/// reclaim next.
pub trait IBufferPoolReplacer {
    /// Choose a frame to evict and remove it from the victimizable set.
    /// Returns `None` when nothing is victimizable.
    fn victim(&mut self) -> Result<Option<FrameId>, BufferPoolReplacerError>;
    /// Remove a frame from the victimizable set, after the pool handed it to
    /// a caller. Idempotent.
    fn pin(&mut self, frame_id: FrameId) -> Result<(), BufferPoolReplacerError>;
    /// Admit a frame to the victimizable set, after its pin count dropped to
    /// zero. Idempotent.
    fn unpin(&mut self, frame_id: FrameId) -> Result<(), BufferPoolReplacerError>;
    /// Number of frames currently victimizable.
    fn size(&self) -> Result<usize, BufferPoolReplacerError>;
}
