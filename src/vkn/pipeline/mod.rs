mod compute_pipeline;
pub use compute_pipeline::*;

mod pipeline_layout;
pub use pipeline_layout::*;
