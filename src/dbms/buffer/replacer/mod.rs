mod buffer_pool_replacer;
mod clock_replacer;
mod dense_clock_replacer;

pub use buffer_pool_replacer::{BufferPoolReplacerError, IBufferPoolReplacer};
pub use clock_replacer::ClockReplacer;
pub use dense_clock_replacer::DenseClockReplacer;
