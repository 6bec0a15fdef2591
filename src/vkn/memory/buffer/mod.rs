mod buffer;
pub use buffer::*;

mod buffer_usage;
pub use buffer_usage::*;
