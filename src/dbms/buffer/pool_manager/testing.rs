use crate::dbms::buffer::replacer::ClockReplacer;
use crate::dbms::storage::disk::testing::InMemoryDiskManager;

use super::BufferPoolManager;

/// A pool over an in-memory disk manager and a clock replacer, for tests.
pub fn create_testing_pool_manager(pool_size: usize) -> BufferPoolManager {
    let disk_manager = InMemoryDiskManager::new();
    let replacer = ClockReplacer::new(pool_size);
    BufferPoolManager::new(pool_size, Box::new(replacer), Box::new(disk_manager))
}
