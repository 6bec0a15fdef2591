mod descriptor_pool;
pub use descriptor_pool::*;

mod descriptor_set_layout;
pub use descriptor_set_layout::*;

mod descriptor_set;
pub use descriptor_set::*;
