use std::collections::HashMap;

use ash::vk;

use crate::vkn::{
    Buffer, DescriptorPool, DescriptorSet, DescriptorSetLayout, DescriptorSetLayoutBinding,
    DescriptorSetLayoutBuilder, Device, Texture, WriteDescriptorSet,
};

/// A binding number was bound twice while configuring a [`DescriptorBundleBuilder`].
#[derive(Debug)]
pub struct DuplicateBinding(pub u32);

impl std::fmt::Display for DuplicateBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "binding {} already bound in this bundle", self.0)
    }
}

impl std::error::Error for DuplicateBinding {}

enum Binding {
    UniformBufferBundle(Vec<Buffer>),
    StorageBuffer(Buffer),
    StorageImage(Texture),
    SampledImage(Texture),
}

/// Collects resources by fixed binding number and materializes one descriptor layout, one pool
/// allocation, and `frames_in_flight` descriptor sets sharing that layout (§4.2). Uniform-buffer
/// bundles are per-frame; storage buffers and images are shared across every in-flight frame.
pub struct DescriptorBundleBuilder {
    frames_in_flight: usize,
    bindings: HashMap<u32, Binding>,
}

impl DescriptorBundleBuilder {
    pub fn new(frames_in_flight: usize) -> Self {
        Self {
            frames_in_flight,
            bindings: HashMap::new(),
        }
    }

    fn check_free(&self, binding: u32) -> Result<(), DuplicateBinding> {
        if self.bindings.contains_key(&binding) {
            return Err(DuplicateBinding(binding));
        }
        Ok(())
    }

    pub fn bind_uniform_buffer_bundle(
        &mut self,
        binding: u32,
        per_frame_buffers: Vec<Buffer>,
    ) -> Result<&mut Self, DuplicateBinding> {
        self.check_free(binding)?;
        assert_eq!(
            per_frame_buffers.len(),
            self.frames_in_flight,
            "uniform buffer bundle at binding {binding} must supply one buffer per in-flight frame"
        );
        self.bindings
            .insert(binding, Binding::UniformBufferBundle(per_frame_buffers));
        Ok(self)
    }

    pub fn bind_storage_buffer(
        &mut self,
        binding: u32,
        buffer: Buffer,
    ) -> Result<&mut Self, DuplicateBinding> {
        self.check_free(binding)?;
        self.bindings.insert(binding, Binding::StorageBuffer(buffer));
        Ok(self)
    }

    pub fn bind_storage_image(
        &mut self,
        binding: u32,
        image: Texture,
    ) -> Result<&mut Self, DuplicateBinding> {
        self.check_free(binding)?;
        self.bindings.insert(binding, Binding::StorageImage(image));
        Ok(self)
    }

    pub fn bind_sampled_image(
        &mut self,
        binding: u32,
        image: Texture,
    ) -> Result<&mut Self, DuplicateBinding> {
        self.check_free(binding)?;
        self.bindings.insert(binding, Binding::SampledImage(image));
        Ok(self)
    }

    pub fn build(self, device: &Device, pool: &DescriptorPool) -> Result<DescriptorBundle, String> {
        let mut builder = DescriptorSetLayoutBuilder::new();
        let mut binding_numbers: Vec<u32> = self.bindings.keys().copied().collect();
        binding_numbers.sort_unstable();

        for &no in &binding_numbers {
            let descriptor_type = match &self.bindings[&no] {
                Binding::UniformBufferBundle(_) => vk::DescriptorType::UNIFORM_BUFFER,
                Binding::StorageBuffer(_) => vk::DescriptorType::STORAGE_BUFFER,
                Binding::StorageImage(_) => vk::DescriptorType::STORAGE_IMAGE,
                Binding::SampledImage(_) => vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
            };
            builder.add_binding(DescriptorSetLayoutBinding {
                no,
                name: format!("binding_{no}"),
                descriptor_type,
                descriptor_count: 1,
                stage_flags: vk::ShaderStageFlags::COMPUTE,
            });
        }

        let layout = builder.build(device).map_err(|e| e.to_string())?;

        let mut sets = Vec::with_capacity(self.frames_in_flight);
        for frame_idx in 0..self.frames_in_flight {
            let set = pool.allocate_set(&layout).map_err(|e| e.to_string())?;

            let mut writes = Vec::new();
            for &no in &binding_numbers {
                let write = match &self.bindings[&no] {
                    Binding::UniformBufferBundle(buffers) => {
                        WriteDescriptorSet::new_buffer_write(no, &buffers[frame_idx])
                    }
                    Binding::StorageBuffer(buffer) => {
                        WriteDescriptorSet::new_buffer_write(no, buffer)
                    }
                    Binding::StorageImage(texture) => WriteDescriptorSet::new_texture_write(
                        no,
                        vk::DescriptorType::STORAGE_IMAGE,
                        texture,
                        vk::ImageLayout::GENERAL,
                    ),
                    Binding::SampledImage(texture) => WriteDescriptorSet::new_texture_write(
                        no,
                        vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
                        texture,
                        vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
                    ),
                };
                writes.push(write);
            }
            set.perform_writes(&mut writes);
            sets.push(set);
        }

        Ok(DescriptorBundle { layout, sets })
    }
}

/// One shared descriptor layout plus one descriptor set per in-flight frame, all written at
/// construction time. Every trace pipeline binds `get_set(frame_index)` at set 0.
pub struct DescriptorBundle {
    layout: DescriptorSetLayout,
    sets: Vec<DescriptorSet>,
}

impl DescriptorBundle {
    pub fn layout(&self) -> &DescriptorSetLayout {
        &self.layout
    }

    pub fn get_set(&self, frame_index: usize) -> &DescriptorSet {
        &self.sets[frame_index % self.sets.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_binding_message_names_the_offending_slot() {
        let err = DuplicateBinding(33);
        assert_eq!(err.to_string(), "binding 33 already bound in this bundle");
    }
}
