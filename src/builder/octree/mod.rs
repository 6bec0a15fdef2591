mod resources;
pub use resources::*;

mod frag_list_builder;
pub use frag_list_builder::*;

mod octree_builder;
pub use octree_builder::*;
