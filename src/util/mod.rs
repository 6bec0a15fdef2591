mod compiler;
pub use compiler::*;

mod time_info;
pub use time_info::*;

mod path;
pub use path::*;

mod buffer_alloc;
pub use buffer_alloc::*;

mod atlas_alloc;
#[allow(unused_imports)]
pub use atlas_alloc::*;

mod timer;
#[allow(unused_imports)]
pub use timer::*;

mod bench;
#[allow(unused_imports)]
pub use bench::*;

mod sun_dir;
pub use sun_dir::*;

mod halton;
pub use halton::*;
