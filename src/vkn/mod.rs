mod instance;
mod physical_device;

mod extent;
pub use extent::{Extent2D, Extent3D};

mod queue;
pub use queue::{Queue, QueueFamilyIndices};

mod surface;

mod context;
pub use {context::VulkanContext, context::VulkanContextDesc};

mod swapchain;
pub use swapchain::Swapchain;

mod device;
pub use device::Device;

mod shader;
pub use shader::*;

mod command_buffer;
pub use command_buffer::{execute_one_time_command, CommandBuffer};

mod command;
pub use command::CommandPool;

mod memory;
pub use memory::*;

mod allocator;
pub use allocator::Allocator;

mod pipeline;
pub use pipeline::*;

mod descriptor;
pub use descriptor::*;

mod sync;
pub use sync::*;
