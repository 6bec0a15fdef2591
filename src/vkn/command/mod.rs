mod command_pool;
pub use command_pool::*;
