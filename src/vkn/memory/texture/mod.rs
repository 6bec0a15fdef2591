mod image;
pub use image::*;

mod image_view;
pub use image_view::*;

mod sampler;
pub use sampler::*;

mod texture;
pub use texture::*;

mod region;
pub use region::*;

mod desc;
pub use desc::*;
