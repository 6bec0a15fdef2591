mod barrier;
pub use barrier::*;

mod semaphore;
pub use semaphore::*;

mod fence;
pub use fence::*;
