mod desc;
pub use desc::*;

mod movement;
pub use movement::*;

mod vectors;
pub use vectors::*;

mod camera;
pub use camera::*;

mod shadow_camera;
pub use shadow_camera::*;
