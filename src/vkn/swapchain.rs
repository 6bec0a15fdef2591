use ash::khr::swapchain;
use ash::vk;

use super::{Device, VulkanContext};

/// Owns the `VkSwapchainKHR`, its images and image views. Recreated wholesale on resize.
pub struct Swapchain {
    device: Device,
    loader: swapchain::Device,
    swapchain: vk::SwapchainKHR,
    images: Vec<vk::Image>,
    image_views: Vec<vk::ImageView>,
    format: vk::Format,
    extent: vk::Extent2D,
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        unsafe {
            for view in &self.image_views {
                self.device.destroy_image_view(*view, None);
            }
            self.loader.destroy_swapchain(self.swapchain, None);
        }
    }
}

impl Swapchain {
    pub fn new(vulkan_context: &VulkanContext, desired_extent: [u32; 2]) -> Self {
        let loader =
            swapchain::Device::new(vulkan_context.instance(), vulkan_context.device().as_raw());
        let (swapchain, format, extent) =
            create_swapchain(vulkan_context, &loader, desired_extent, None);
        let images = unsafe { loader.get_swapchain_images(swapchain).unwrap() };
        let image_views = create_image_views(vulkan_context.device(), &images, format);

        Self {
            device: vulkan_context.device().clone(),
            loader,
            swapchain,
            images,
            image_views,
            format,
            extent,
        }
    }

    /// Tears down and recreates the swapchain and its views at `desired_extent`, per the
    /// "recreate every low- and high-res image" resize contract (§4.5.3 drives the rest).
    pub fn recreate(&mut self, vulkan_context: &VulkanContext, desired_extent: [u32; 2]) {
        vulkan_context.device().wait_idle();

        unsafe {
            for view in &self.image_views {
                self.device.destroy_image_view(*view, None);
            }
        }

        let (swapchain, format, extent) = create_swapchain(
            vulkan_context,
            &self.loader,
            desired_extent,
            Some(self.swapchain),
        );
        unsafe {
            self.loader.destroy_swapchain(self.swapchain, None);
        }

        let images = unsafe { self.loader.get_swapchain_images(swapchain).unwrap() };
        let image_views = create_image_views(vulkan_context.device(), &images, format);

        self.swapchain = swapchain;
        self.images = images;
        self.image_views = image_views;
        self.format = format;
        self.extent = extent;
    }

    pub fn format(&self) -> vk::Format {
        self.format
    }

    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn image(&self, index: usize) -> vk::Image {
        self.images[index]
    }

    pub fn image_view(&self, index: usize) -> vk::ImageView {
        self.image_views[index]
    }

    /// Returns `None` on `ERROR_OUT_OF_DATE_KHR`, signaling the frame should be dropped.
    pub fn acquire_next_image(&self, signal_semaphore: vk::Semaphore) -> Option<u32> {
        let result = unsafe {
            self.loader.acquire_next_image(
                self.swapchain,
                u64::MAX,
                signal_semaphore,
                vk::Fence::null(),
            )
        };

        match result {
            Ok((index, _suboptimal)) => Some(index),
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => None,
            Err(e) => panic!("vkAcquireNextImageKHR failed: {e:?}"),
        }
    }

    /// Returns `false` on `ERROR_OUT_OF_DATE_KHR`/`SUBOPTIMAL_KHR`, signaling a resize is due.
    pub fn present(
        &self,
        present_queue: vk::Queue,
        wait_semaphore: vk::Semaphore,
        image_index: u32,
    ) -> bool {
        let wait_semaphores = [wait_semaphore];
        let swapchains = [self.swapchain];
        let image_indices = [image_index];
        let present_info = vk::PresentInfoKHR::default()
            .wait_semaphores(&wait_semaphores)
            .swapchains(&swapchains)
            .image_indices(&image_indices);

        match unsafe { self.loader.queue_present(present_queue, &present_info) } {
            Ok(suboptimal) => !suboptimal,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => false,
            Err(e) => panic!("vkQueuePresentKHR failed: {e:?}"),
        }
    }
}

fn create_swapchain(
    vulkan_context: &VulkanContext,
    loader: &swapchain::Device,
    desired_extent: [u32; 2],
    old_swapchain: Option<vk::SwapchainKHR>,
) -> (vk::SwapchainKHR, vk::Format, vk::Extent2D) {
    let surface_loader = vulkan_context.surface_loader();
    let physical_device = vulkan_context.physical_device();
    let surface_khr = vulkan_context.surface_khr();

    let capabilities = unsafe {
        surface_loader
            .get_physical_device_surface_capabilities(physical_device, surface_khr)
            .unwrap()
    };
    let formats = unsafe {
        surface_loader
            .get_physical_device_surface_formats(physical_device, surface_khr)
            .unwrap()
    };
    let present_modes = unsafe {
        surface_loader
            .get_physical_device_surface_present_modes(physical_device, surface_khr)
            .unwrap()
    };

    let surface_format = formats
        .iter()
        .find(|f| {
            f.format == vk::Format::B8G8R8A8_UNORM
                && f.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
        })
        .copied()
        .unwrap_or(formats[0]);

    let present_mode = present_modes
        .iter()
        .copied()
        .find(|m| *m == vk::PresentModeKHR::MAILBOX)
        .unwrap_or(vk::PresentModeKHR::FIFO);

    let extent = if capabilities.current_extent.width != u32::MAX {
        capabilities.current_extent
    } else {
        vk::Extent2D {
            width: desired_extent[0].clamp(
                capabilities.min_image_extent.width,
                capabilities.max_image_extent.width,
            ),
            height: desired_extent[1].clamp(
                capabilities.min_image_extent.height,
                capabilities.max_image_extent.height,
            ),
        }
    };

    let mut image_count = capabilities.min_image_count + 1;
    if capabilities.max_image_count > 0 {
        image_count = image_count.min(capabilities.max_image_count);
    }

    let mut create_info = vk::SwapchainCreateInfoKHR::default()
        .surface(surface_khr)
        .min_image_count(image_count)
        .image_format(surface_format.format)
        .image_color_space(surface_format.color_space)
        .image_extent(extent)
        .image_array_layers(1)
        .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::TRANSFER_DST)
        .image_sharing_mode(vk::SharingMode::EXCLUSIVE)
        .pre_transform(capabilities.current_transform)
        .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
        .present_mode(present_mode)
        .clipped(true);

    if let Some(old) = old_swapchain {
        create_info = create_info.old_swapchain(old);
    }

    let swapchain = unsafe { loader.create_swapchain(&create_info, None).unwrap() };
    (swapchain, surface_format.format, extent)
}

fn create_image_views(
    device: &Device,
    images: &[vk::Image],
    format: vk::Format,
) -> Vec<vk::ImageView> {
    images
        .iter()
        .map(|image| {
            let view_info = vk::ImageViewCreateInfo::default()
                .image(*image)
                .view_type(vk::ImageViewType::TYPE_2D)
                .format(format)
                .subresource_range(vk::ImageSubresourceRange {
                    aspect_mask: vk::ImageAspectFlags::COLOR,
                    base_mip_level: 0,
                    level_count: 1,
                    base_array_layer: 0,
                    layer_count: 1,
                });
            unsafe { device.create_image_view(&view_info, None).unwrap() }
        })
        .collect()
}
