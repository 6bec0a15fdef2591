mod resources;
pub use resources::*;

mod field_builder;
pub use field_builder::*;
