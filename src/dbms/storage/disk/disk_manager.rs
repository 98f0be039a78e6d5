#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use crate::dbms::types::{PageData, PageId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiskManagerError {
    /// The page was never allocated, or has been deallocated
    #[error("page not found on disk")]
    PageNotFound,
    /// A log read past the end of the log
    #[error("log read out of range")]
    LogOutOfRange,
}

/// On-disk page store the buffer pool reads from and writes back to.
///
/// Page ids are allocated monotonically starting at 0. The log channel is
/// reserved for a write-ahead log sitting next to the page store; the buffer
/// pool itself never writes log records.
#[cfg_attr(test, automock)]
pub trait IDiskManager {
    fn read_page(&self, page_id: PageId) -> Result<PageData, DiskManagerError>;
    fn write_page(&mut self, page_id: PageId, page: &PageData) -> Result<(), DiskManagerError>;
    fn write_log(&mut self, log: &[u8]) -> Result<(), DiskManagerError>;
    fn read_log(&self, size: usize, offset: usize) -> Result<Vec<u8>, DiskManagerError>;
    /// Allocate a fresh page and return its id.
    fn allocate_page(&mut self) -> Result<PageId, DiskManagerError>;
    /// Release a page. Idempotent; deallocating an unknown page is a no-op.
    fn deallocate_page(&mut self, page_id: PageId) -> Result<(), DiskManagerError>;
}
