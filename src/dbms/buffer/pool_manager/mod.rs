mod buffer_pool_manager;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use buffer_pool_manager::{BufferPoolManager, BufferPoolManagerError, IBufferPoolManager};
