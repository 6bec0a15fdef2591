mod atlas_allocator;
pub use atlas_allocator::*;
