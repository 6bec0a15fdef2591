mod struct_layout;
pub use struct_layout::*;

mod data_builder;
pub use data_builder::*;

mod data_reader;
pub use data_reader::*;

mod shader_module;
pub use shader_module::*;
