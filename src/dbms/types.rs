/// Size in bytes of a single page, both on disk and in a buffer frame.
pub const PAGE_SIZE: usize = 4096;

pub type PageData = [u8; PAGE_SIZE];

/// Identifier of a page on disk. Allocated by the disk manager, starting at 0.
pub type PageId = usize;

/// Index of a frame in the buffer pool, in `[0, pool_size)`.
pub type FrameId = usize;
