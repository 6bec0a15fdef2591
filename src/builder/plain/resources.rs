use crate::vkn::{Allocator, Device, Texture, TextureDesc};
use ash::vk;
use glam::UVec3;

/// Density-field scratch images shared by every chunk build. `chunk_atlas` packs the whole
/// visible chunk grid's `(chunkVoxelDim+1)^3` corner field into one image, addressed by
/// chunk-position-scaled offset; `free_atlas` is a single-chunk-sized scratch region used to
/// build or edit a chunk that is streaming in/out at the grid boundary without disturbing the
/// packed atlas until the result is ready to blit in.
pub struct Resources {
    pub chunk_atlas: Texture,
    pub free_atlas: Texture,
}

impl Resources {
    pub fn new(device: Device, allocator: Allocator, voxel_dim: UVec3, visible_chunk_dim: UVec3) -> Self {
        let field_dim = voxel_dim + UVec3::ONE;

        let chunk_atlas_desc = TextureDesc {
            extent: (field_dim * visible_chunk_dim).into(),
            format: vk::Format::R16_SINT,
            usage: vk::ImageUsageFlags::STORAGE | vk::ImageUsageFlags::TRANSFER_DST,
            initial_layout: vk::ImageLayout::UNDEFINED,
            aspect: vk::ImageAspectFlags::COLOR,
            ..Default::default()
        };
        let chunk_atlas = Texture::new(
            device.clone(),
            allocator.clone(),
            &chunk_atlas_desc,
            &Default::default(),
        );

        let free_atlas_desc = TextureDesc {
            extent: field_dim.into(),
            format: vk::Format::R16_SINT,
            usage: vk::ImageUsageFlags::STORAGE | vk::ImageUsageFlags::TRANSFER_DST,
            initial_layout: vk::ImageLayout::UNDEFINED,
            aspect: vk::ImageAspectFlags::COLOR,
            ..Default::default()
        };
        let free_atlas = Texture::new(device, allocator, &free_atlas_desc, &Default::default());

        Self {
            chunk_atlas,
            free_atlas,
        }
    }
}
