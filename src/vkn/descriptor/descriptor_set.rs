use crate::vkn::{Buffer, DescriptorPool, DescriptorSetLayout, Device, Texture};
use anyhow::Result;
use ash::vk;
use std::sync::Arc;

struct DescriptorSetInner {
    device: Device,
    descriptor_set: vk::DescriptorSet,
}

#[derive(Clone)]
pub struct DescriptorSet(Arc<DescriptorSetInner>);

impl DescriptorSet {
    /// Allocates a new descriptor set of `layout` out of `pool`.
    pub fn new(_device: Device, layout: &DescriptorSetLayout, pool: DescriptorPool) -> Self {
        pool.allocate_set(layout)
            .expect("failed to allocate descriptor set")
    }

    pub fn from_raw(device: Device, descriptor_set: vk::DescriptorSet) -> Self {
        Self(Arc::new(DescriptorSetInner {
            device,
            descriptor_set,
        }))
    }

    pub fn as_raw(&self) -> vk::DescriptorSet {
        self.0.descriptor_set
    }

    pub fn perform_writes(&self, writes: &mut [WriteDescriptorSet]) {
        if writes.is_empty() {
            return;
        }
        let raw_writes: Vec<_> = writes.iter_mut().map(|w| w.make_raw(self)).collect();
        unsafe { self.0.device.update_descriptor_sets(&raw_writes, &[]) }
    }
}

pub struct WriteDescriptorSet<'a> {
    binding: u32,
    descriptor_type: vk::DescriptorType,

    image_infos: Option<Vec<vk::DescriptorImageInfo>>,
    buffer_infos: Option<Vec<vk::DescriptorBufferInfo>>,
    _lifetime: std::marker::PhantomData<&'a ()>,
}

impl<'a> WriteDescriptorSet<'a> {
    pub fn new_texture_write(
        binding: u32,
        descriptor_type: vk::DescriptorType,
        texture: &Texture,
        image_layout: vk::ImageLayout,
    ) -> Self {
        let image_info = vk::DescriptorImageInfo::default()
            .image_layout(image_layout)
            .image_view(texture.get_image_view().as_raw())
            .sampler(texture.get_sampler().as_raw());

        Self {
            binding,
            descriptor_type,
            image_infos: Some(vec![image_info]),
            buffer_infos: None,
            _lifetime: std::marker::PhantomData,
        }
    }

    pub fn new_buffer_write(binding: u32, buffer: &Buffer) -> Self {
        let buffer_info = vk::DescriptorBufferInfo::default()
            .buffer(buffer.as_raw())
            .offset(0)
            .range(buffer.get_size_bytes());

        let descriptor_type =
            Self::descriptor_type_from_usage(buffer.get_usage().as_raw()).unwrap();

        Self {
            binding,
            descriptor_type,
            image_infos: None,
            buffer_infos: Some(vec![buffer_info]),
            _lifetime: std::marker::PhantomData,
        }
    }

    fn descriptor_type_from_usage(usage: vk::BufferUsageFlags) -> Result<vk::DescriptorType> {
        if usage.contains(vk::BufferUsageFlags::STORAGE_BUFFER) {
            Ok(vk::DescriptorType::STORAGE_BUFFER)
        } else if usage.contains(vk::BufferUsageFlags::UNIFORM_BUFFER) {
            Ok(vk::DescriptorType::UNIFORM_BUFFER)
        } else {
            Err(anyhow::anyhow!(
                "Unsupported buffer usage for descriptor type: {:?}",
                usage
            ))
        }
    }

    pub fn make_raw(&mut self, descriptor_set: &DescriptorSet) -> vk::WriteDescriptorSet {
        assert!(
            self.image_infos.is_some() ^ self.buffer_infos.is_some(),
            "A WriteDescriptorSet must contain exactly one of: image_infos, buffer_infos"
        );

        let mut write = vk::WriteDescriptorSet::default()
            .dst_set(descriptor_set.as_raw())
            .dst_binding(self.binding)
            .descriptor_type(self.descriptor_type);

        if let Some(image_info) = &self.image_infos {
            write = write.image_info(image_info);
        }
        if let Some(buffer_info) = &self.buffer_infos {
            write = write.buffer_info(buffer_info);
        }

        write
    }
}
