use ash::vk;
use std::ops::Deref;
use std::sync::Arc;

use super::Queue;

struct DeviceInner {
    device: ash::Device,
}

impl Drop for DeviceInner {
    fn drop(&mut self) {
        unsafe { self.device.destroy_device(None) };
    }
}

/// Shared handle to the logical device. Cloning is cheap; the underlying
/// `VkDevice` is destroyed once the last clone drops.
#[derive(Clone)]
pub struct Device(Arc<DeviceInner>);

impl Deref for Device {
    type Target = ash::Device;
    fn deref(&self) -> &Self::Target {
        &self.0.device
    }
}

impl Device {
    pub fn new(device: ash::Device) -> Self {
        Self(Arc::new(DeviceInner { device }))
    }

    pub fn as_raw(&self) -> &ash::Device {
        &self.0.device
    }

    pub fn wait_idle(&self) {
        unsafe {
            self.0
                .device
                .device_wait_idle()
                .expect("vkDeviceWaitIdle failed")
        };
    }

    pub fn wait_queue_idle(&self, queue: &Queue) {
        unsafe {
            self.0
                .device
                .queue_wait_idle(queue.as_raw())
                .expect("vkQueueWaitIdle failed")
        };
    }
}
