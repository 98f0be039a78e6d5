use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;
use tracing::debug;

use crate::dbms::buffer::replacer::BufferPoolReplacerError;
use crate::dbms::buffer::types::{
    DiskManagerGeneric, PageGeneric, ReadOnlyPage, ReplacerGeneric, WritablePage,
};
use crate::dbms::storage::disk::DiskManagerError;
use crate::dbms::storage::page::{Page, PageError};
use crate::dbms::types::{FrameId, PageId, PAGE_SIZE};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferPoolManagerError {
    /// Every frame is pinned; nothing can be freed for the requested page
    #[error("no free frame available and no page can be evicted")]
    NoFrameAvailable,
    /// The requested page is not resident in the buffer pool
    #[error("the requested page is not in the buffer pool")]
    PageNotInPool,
    /// The page still has outstanding pins
    #[error("the page is still pinned")]
    PagePinned,
    /// The page's pin count is already zero
    #[error("the page's pin count is already zero")]
    PageNotPinned,
    #[error(transparent)]
    ReplacerError(#[from] BufferPoolReplacerError),
    #[error(transparent)]
    PageError(#[from] PageError),
    #[error(transparent)]
    DiskManagerError(#[from] DiskManagerError),
}

pub trait IBufferPoolManager {
    /// Fetch the requested page as readable from the buffer pool, pinning it.
    fn fetch_page(&self, page_id: PageId) -> Result<ReadOnlyPage, BufferPoolManagerError>;
    /// Fetch the requested page as writable from the buffer pool, pinning it.
    fn fetch_page_writable(&self, page_id: PageId)
        -> Result<WritablePage, BufferPoolManagerError>;
    /// Allocate a new zeroed page, pin it and return it as writable. The
    /// caller reads the assigned page id off the returned page.
    fn new_page(&self) -> Result<WritablePage, BufferPoolManagerError>;
    /// Drop one pin on the target page, recording whether the caller wrote to
    /// it. The dirty flag is sticky: a clean unpin never hides an earlier
    /// dirtying one.
    fn unpin_page(&self, page_id: PageId, is_dirty: bool) -> Result<(), BufferPoolManagerError>;
    /// Write the target page's bytes to disk and mark it clean. Pins are
    /// unchanged.
    fn flush_page(&self, page_id: PageId) -> Result<(), BufferPoolManagerError>;
    /// Drop a page from the pool and deallocate it on disk. Refused while the
    /// page is pinned; deleting a non-resident page still deallocates it.
    fn delete_page(&self, page_id: PageId) -> Result<(), BufferPoolManagerError>;
    /// Write every resident page's bytes to disk and mark them clean.
    fn flush_all_pages(&self) -> Result<(), BufferPoolManagerError>;
}

/// Buffer pool manager over a fixed set of page frames.
///
/// The page table's write lock doubles as the admission/eviction latch: it is
/// held across the disk I/O of an admission, so a page is read from disk at
/// most once no matter how many threads race to fetch it. Lock order is
/// page table, then replacer, then free list, then disk manager, then frame
/// latch, and is never reversed.
///
/// The guards handed out by `fetch_page`/`new_page` borrow the frame's latch;
/// the pin, not the guard, is what keeps the page resident. Callers release
/// the guard before making further pool calls, and in particular before
/// unpinning, flushing or deleting the page it covers.
pub struct BufferPoolManager {
    replacer: RwLock<ReplacerGeneric>,
    disk_manager: RwLock<DiskManagerGeneric>,
    /// page_id -> frame_id for every resident page
    page_table: RwLock<HashMap<PageId, FrameId>>,
    free_frames: RwLock<Vec<FrameId>>,
    /// One slot per frame; the `RwLock` is the per-frame latch
    pages: Vec<RwLock<PageGeneric>>,
}

impl BufferPoolManager {
    pub fn new(
        pool_size: usize,
        replacer: ReplacerGeneric,
        disk_manager: DiskManagerGeneric,
    ) -> BufferPoolManager {
        BufferPoolManager {
            replacer: RwLock::new(replacer),
            disk_manager: RwLock::new(disk_manager),
            page_table: RwLock::new(HashMap::new()),
            // All frames start out free
            free_frames: RwLock::new((0..pool_size).collect()),
            pages: (0..pool_size)
                .map(|_| RwLock::new(Box::new(Page::new(None)) as PageGeneric))
                .collect(),
        }
    }

    /// Write back a frame's page if dirty, wipe the frame to empty, erase its
    /// page table entry and return the frame to the free list. The frame must
    /// not be pinned.
    fn wipe_page(
        &self,
        frame_id: FrameId,
        page_table: &mut HashMap<PageId, FrameId>,
        free_frames: &mut Vec<FrameId>,
        disk_manager: &mut DiskManagerGeneric,
    ) -> Result<(), BufferPoolManagerError> {
        let mut page = self.pages[frame_id].write().unwrap();
        if let Some(page_id) = page.get_page_id()? {
            if page.is_dirty()? {
                debug!(page_id, frame_id, "writing back dirty page before reuse");
                let data = page.get_data()?;
                disk_manager.write_page(page_id, &data)?;
            }
            page_table.remove(&page_id);
        }
        page.reset()?;
        free_frames.push(frame_id);
        Ok(())
    }

    /// Take an empty frame for an incoming page, preferring the free list and
    /// falling back to evicting a replacer victim.
    fn acquire_frame(
        &self,
        page_table: &mut HashMap<PageId, FrameId>,
        replacer: &mut ReplacerGeneric,
        free_frames: &mut Vec<FrameId>,
        disk_manager: &mut DiskManagerGeneric,
    ) -> Result<FrameId, BufferPoolManagerError> {
        if free_frames.is_empty() {
            let victim = match replacer.victim()? {
                Some(frame_id) => frame_id,
                None => return Err(BufferPoolManagerError::NoFrameAvailable),
            };
            debug!(frame_id = victim, "evicting victim frame");
            self.wipe_page(victim, page_table, free_frames, disk_manager)?;
        }
        free_frames
            .pop()
            .ok_or(BufferPoolManagerError::NoFrameAvailable)
    }

    /// Fetch a page, from disk if needed, and return the frame holding it
    /// with one pin added.
    fn fetch_page_frame(&self, page_id: PageId) -> Result<FrameId, BufferPoolManagerError> {
        let mut page_table = self.page_table.write().unwrap();
        let mut replacer = self.replacer.write().unwrap();

        if let Some(&frame_id) = page_table.get(&page_id) {
            debug!(page_id, frame_id, "fetch hit");
            {
                let mut page = self.pages[frame_id].write().unwrap();
                page.increase_pin_count()?;
            }
            replacer.pin(frame_id)?;
            return Ok(frame_id);
        }

        debug!(page_id, "fetch miss, admitting from disk");
        let mut free_frames = self.free_frames.write().unwrap();
        let mut disk_manager = self.disk_manager.write().unwrap();
        let frame_id = self.acquire_frame(
            &mut page_table,
            &mut replacer,
            &mut free_frames,
            &mut disk_manager,
        )?;

        let data = match disk_manager.read_page(page_id) {
            Ok(data) => data,
            Err(e) => {
                // Roll the claim back so the frame is not lost to the pool.
                free_frames.push(frame_id);
                return Err(e.into());
            }
        };
        {
            let mut page = self.pages[frame_id].write().unwrap();
            page.overwrite(Some(page_id), data)?;
        }
        page_table.insert(page_id, frame_id);
        replacer.pin(frame_id)?;
        Ok(frame_id)
    }
}

impl IBufferPoolManager for BufferPoolManager {
    fn fetch_page(&self, page_id: PageId) -> Result<ReadOnlyPage, BufferPoolManagerError> {
        match self.fetch_page_frame(page_id) {
            Ok(frame_id) => Ok(self.pages[frame_id].read().unwrap()),
            Err(e) => Err(e),
        }
    }

    fn fetch_page_writable(
        &self,
        page_id: PageId,
    ) -> Result<WritablePage, BufferPoolManagerError> {
        match self.fetch_page_frame(page_id) {
            Ok(frame_id) => Ok(self.pages[frame_id].write().unwrap()),
            Err(e) => Err(e),
        }
    }

    fn new_page(&self) -> Result<WritablePage, BufferPoolManagerError> {
        let frame_id = {
            let mut page_table = self.page_table.write().unwrap();
            let mut replacer = self.replacer.write().unwrap();
            let mut free_frames = self.free_frames.write().unwrap();
            let mut disk_manager = self.disk_manager.write().unwrap();

            let frame_id = self.acquire_frame(
                &mut page_table,
                &mut replacer,
                &mut free_frames,
                &mut disk_manager,
            )?;

            let page_id = match disk_manager.allocate_page() {
                Ok(page_id) => page_id,
                Err(e) => {
                    free_frames.push(frame_id);
                    return Err(e.into());
                }
            };
            debug!(page_id, frame_id, "allocated new page");

            {
                let mut page = self.pages[frame_id].write().unwrap();
                debug_assert_eq!(page.get_pin_count()?, 0, "freed frame should not be pinned");
                page.overwrite(Some(page_id), [0; PAGE_SIZE])?;
            }
            page_table.insert(page_id, frame_id);
            replacer.pin(frame_id)?;
            frame_id
        };

        Ok(self.pages[frame_id].write().unwrap())
    }

    fn unpin_page(&self, page_id: PageId, is_dirty: bool) -> Result<(), BufferPoolManagerError> {
        let page_table = self.page_table.read().unwrap();
        let mut replacer = self.replacer.write().unwrap();

        if let Some(&frame_id) = page_table.get(&page_id) {
            let mut page = self.pages[frame_id].write().unwrap();

            if is_dirty {
                page.set_dirty()?;
            }
            if page.get_pin_count()? == 0 {
                debug!(page_id, "unpin of a page with no outstanding pins");
                return Err(BufferPoolManagerError::PageNotPinned);
            }
            page.decrease_pin_count()?;
            if page.get_pin_count()? == 0 {
                replacer.unpin(frame_id)?;
            }
            Ok(())
        } else {
            Err(BufferPoolManagerError::PageNotInPool)
        }
    }

    fn flush_page(&self, page_id: PageId) -> Result<(), BufferPoolManagerError> {
        let page_table = self.page_table.read().unwrap();
        let mut disk_manager = self.disk_manager.write().unwrap();

        if let Some(&frame_id) = page_table.get(&page_id) {
            let mut page = self.pages[frame_id].write().unwrap();
            let data = page.get_data()?;
            disk_manager.write_page(page_id, &data)?;
            page.set_clean()?;
            Ok(())
        } else {
            Err(BufferPoolManagerError::PageNotInPool)
        }
    }

    fn delete_page(&self, page_id: PageId) -> Result<(), BufferPoolManagerError> {
        let mut page_table = self.page_table.write().unwrap();
        let mut replacer = self.replacer.write().unwrap();
        let mut free_frames = self.free_frames.write().unwrap();
        let mut disk_manager = self.disk_manager.write().unwrap();

        let frame_id = match page_table.get(&page_id) {
            Some(&frame_id) => frame_id,
            None => {
                // Not resident; release the disk page regardless.
                disk_manager.deallocate_page(page_id)?;
                return Ok(());
            }
        };

        {
            let mut page = self.pages[frame_id].write().unwrap();
            if page.get_pin_count()? > 0 {
                debug!(page_id, frame_id, "refusing to delete a pinned page");
                return Err(BufferPoolManagerError::PagePinned);
            }
            // The page is going away; skip the write-back.
            page.set_clean()?;
        }

        replacer.pin(frame_id)?;
        self.wipe_page(frame_id, &mut page_table, &mut free_frames, &mut disk_manager)?;
        disk_manager.deallocate_page(page_id)?;
        Ok(())
    }

    fn flush_all_pages(&self) -> Result<(), BufferPoolManagerError> {
        // Hold the admission latch so the set of resident pages stays put.
        let _page_table = self.page_table.read().unwrap();
        let mut disk_manager = self.disk_manager.write().unwrap();

        for frame in self.pages.iter() {
            let mut page = frame.write().unwrap();
            if let Some(page_id) = page.get_page_id()? {
                let data = page.get_data()?;
                disk_manager.write_page(page_id, &data)?;
                page.set_clean()?;
            }
        }
        Ok(())
    }
}
