use ash::vk;
use std::collections::HashSet;

use super::{
    instance::Instance, physical_device::create_physical_device, surface::Surface, CommandPool,
    Device, Queue, QueueFamilyIndices,
};

fn create_logical_device(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
    queue_family_indices: &QueueFamilyIndices,
) -> ash::Device {
    let queue_priorities = [1.0f32];
    let queue_create_infos = {
        let mut indices = HashSet::new();
        indices.extend(queue_family_indices.get_all_indices());
        indices
            .into_iter()
            .map(|index| {
                vk::DeviceQueueCreateInfo::default()
                    .queue_family_index(index)
                    .queue_priorities(&queue_priorities)
            })
            .collect::<Vec<_>>()
    };

    let device_extensions_ptrs = [
        ash::khr::swapchain::NAME.as_ptr(),
        #[cfg(any(target_os = "macos", target_os = "ios"))]
        ash::khr::portability_subset::NAME.as_ptr(),
    ];

    let device_create_info = vk::DeviceCreateInfo::default()
        .queue_create_infos(&queue_create_infos)
        .enabled_extension_names(&device_extensions_ptrs);

    unsafe {
        instance
            .create_device(physical_device, &device_create_info, None)
            .expect("Failed to create logical device")
    }
}

pub struct VulkanContextDesc<'a> {
    pub name: &'a str,
}

/// Owns the Vulkan instance, surface, physical/logical device pair and the
/// general-purpose command pool. Collaborator-level bring-up: the renderer
/// consumes this and a [`super::Swapchain`] without re-deriving any of it.
pub struct VulkanContext {
    entry: ash::Entry,
    instance: Instance,
    surface: Surface,
    physical_device: vk::PhysicalDevice,
    device: Device,
    queue_family_indices: QueueFamilyIndices,
    general_queue: Queue,
    transfer_queue: Queue,
    command_pool: CommandPool,
}

impl VulkanContext {
    pub fn new(window: &winit::window::Window, desc: VulkanContextDesc) -> Self {
        let entry = unsafe { ash::Entry::load().expect("Failed to load Vulkan entry points") };
        let instance = Instance::new(&entry, window, desc.name);
        let surface = Surface::new(&entry, &instance, window);

        let (physical_device, queue_family_indices) =
            create_physical_device(instance.as_raw(), &surface.surface, surface.surface_khr);

        let device = Device::new(create_logical_device(
            instance.as_raw(),
            physical_device,
            &queue_family_indices,
        ));

        let general_queue = Queue::new(
            unsafe { device.get_device_queue(queue_family_indices.general, 0) },
            queue_family_indices.general,
        );
        let transfer_queue = Queue::new(
            unsafe { device.get_device_queue(queue_family_indices.transfer_only, 0) },
            queue_family_indices.transfer_only,
        );

        let command_pool = CommandPool::new(&device, queue_family_indices.general);

        Self {
            entry,
            instance,
            surface,
            physical_device,
            device,
            queue_family_indices,
            general_queue,
            transfer_queue,
            command_pool,
        }
    }

    pub fn entry(&self) -> &ash::Entry {
        &self.entry
    }

    pub fn instance(&self) -> &ash::Instance {
        self.instance.as_raw()
    }

    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn surface_khr(&self) -> vk::SurfaceKHR {
        self.surface.surface_khr
    }

    pub fn surface_loader(&self) -> &ash::khr::surface::Instance {
        &self.surface.surface
    }

    pub fn queue_family_indices(&self) -> &QueueFamilyIndices {
        &self.queue_family_indices
    }

    pub fn get_general_queue(&self) -> Queue {
        self.general_queue
    }

    pub fn get_transfer_only_queue(&self) -> Queue {
        self.transfer_queue
    }

    pub fn command_pool(&self) -> &CommandPool {
        &self.command_pool
    }
}
