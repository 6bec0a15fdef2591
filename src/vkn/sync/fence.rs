use crate::vkn::Device;
use ash::vk;
use std::sync::Arc;

struct FenceInner {
    device: Device,
    fence: vk::Fence,
}

impl Drop for FenceInner {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_fence(self.fence, None);
        }
    }
}

#[derive(Clone)]
pub struct Fence(Arc<FenceInner>);

impl std::ops::Deref for Fence {
    type Target = vk::Fence;
    fn deref(&self) -> &Self::Target {
        &self.0.fence
    }
}

impl Fence {
    pub fn new(device: &Device, signaled: bool) -> Self {
        let fence = Self::create_fence(device, signaled);
        Self(Arc::new(FenceInner {
            device: device.clone(),
            fence,
        }))
    }

    pub fn as_raw(&self) -> vk::Fence {
        self.0.fence
    }

    pub fn wait(&self) {
        unsafe {
            self.0
                .device
                .wait_for_fences(&[self.0.fence], true, u64::MAX)
                .unwrap();
        }
    }

    pub fn reset(&self) {
        unsafe {
            self.0.device.reset_fences(&[self.0.fence]).unwrap();
        }
    }

    fn create_fence(device: &Device, signaled: bool) -> vk::Fence {
        let flags = if signaled {
            vk::FenceCreateFlags::SIGNALED
        } else {
            vk::FenceCreateFlags::empty()
        };
        let fence_info = vk::FenceCreateInfo::default().flags(flags);
        unsafe { device.create_fence(&fence_info, None).unwrap() }
    }
}
