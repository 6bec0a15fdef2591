mod descriptor_bundle;
pub use descriptor_bundle::{DescriptorBundle, DescriptorBundleBuilder, DuplicateBinding};

mod ubo;
pub use ubo::{EnvironmentInfo, RenderInfo, SpatialFilterInfo, TemporalFilterInfo, TweakableParameters};

mod resources;
pub use resources::TracerResources;

mod tracer;
pub use tracer::{pass_names, TraceParams, Tracer};
