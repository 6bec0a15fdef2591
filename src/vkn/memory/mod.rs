mod buffer;
pub use buffer::*;

mod texture;
pub use texture::*;
