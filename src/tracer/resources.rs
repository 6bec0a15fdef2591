use ash::vk;
use glam::UVec2;

use crate::vkn::{Allocator, Device, SamplerDesc, Texture, TextureDesc};

fn storage_2d(extent: UVec2, format: vk::Format) -> TextureDesc {
    TextureDesc {
        extent: [extent.x, extent.y, 1].into(),
        format,
        usage: vk::ImageUsageFlags::STORAGE | vk::ImageUsageFlags::SAMPLED,
        initial_layout: vk::ImageLayout::UNDEFINED,
        aspect: vk::ImageAspectFlags::COLOR,
        ..Default::default()
    }
}

/// Every image the command-buffer program in §4.5.2 reads from or writes to, split by
/// resolution: atmosphere LUTs, the shadow map, the `lowRes` G-buffer/accumulation set
/// (with its previous-frame history twins), and the `highRes` TAA/post-process output.
pub struct TracerResources {
    pub transmittance_lut: Texture,
    pub multi_scattering_lut: Texture,
    pub sky_view_lut: Texture,
    pub shadow_map: Texture,

    pub position: Texture,
    pub last_position: Texture,
    pub normal: Texture,
    pub last_normal: Texture,
    pub vox_hash: Texture,
    pub last_vox_hash: Texture,
    pub motion: Texture,
    pub depth: Texture,
    pub coarse_beam_depth: Texture,

    pub accumed: Texture,
    pub last_accumed: Texture,
    pub god_ray_accumed: Texture,
    pub last_god_ray_accumed: Texture,

    pub a_trous_ping: Texture,
    pub a_trous_pong: Texture,
    pub background: Texture,

    pub taa: Texture,
    pub last_taa: Texture,
    pub render_target: Texture,
}

impl TracerResources {
    pub fn new(
        device: &Device,
        allocator: &Allocator,
        low_res: UVec2,
        high_res: UVec2,
        shadow_map_resolution: u32,
    ) -> Self {
        let shadow_res = UVec2::splat(shadow_map_resolution);
        let new_texture = |extent: UVec2, format: vk::Format| {
            Texture::new(
                device.clone(),
                allocator.clone(),
                &storage_2d(extent, format),
                &SamplerDesc::default(),
            )
        };

        Self {
            transmittance_lut: new_texture(UVec2::new(256, 64), vk::Format::R16G16B16A16_SFLOAT),
            multi_scattering_lut: new_texture(UVec2::new(32, 32), vk::Format::R16G16B16A16_SFLOAT),
            sky_view_lut: new_texture(UVec2::new(200, 200), vk::Format::R16G16B16A16_SFLOAT),
            shadow_map: new_texture(shadow_res, vk::Format::R32_SFLOAT),

            position: new_texture(low_res, vk::Format::R32G32B32A32_SFLOAT),
            last_position: new_texture(low_res, vk::Format::R32G32B32A32_SFLOAT),
            normal: new_texture(low_res, vk::Format::R16G16B16A16_SFLOAT),
            last_normal: new_texture(low_res, vk::Format::R16G16B16A16_SFLOAT),
            vox_hash: new_texture(low_res, vk::Format::R32_UINT),
            last_vox_hash: new_texture(low_res, vk::Format::R32_UINT),
            motion: new_texture(low_res, vk::Format::R16G16_SFLOAT),
            depth: new_texture(low_res, vk::Format::R32_SFLOAT),
            coarse_beam_depth: new_texture(low_res, vk::Format::R32_SFLOAT),

            accumed: new_texture(low_res, vk::Format::R16G16B16A16_SFLOAT),
            last_accumed: new_texture(low_res, vk::Format::R16G16B16A16_SFLOAT),
            god_ray_accumed: new_texture(low_res, vk::Format::R16_SFLOAT),
            last_god_ray_accumed: new_texture(low_res, vk::Format::R16_SFLOAT),

            a_trous_ping: new_texture(low_res, vk::Format::R16G16B16A16_SFLOAT),
            a_trous_pong: new_texture(low_res, vk::Format::R16G16B16A16_SFLOAT),
            background: new_texture(low_res, vk::Format::R16G16B16A16_SFLOAT),

            taa: new_texture(high_res, vk::Format::R16G16B16A16_SFLOAT),
            last_taa: new_texture(high_res, vk::Format::R16G16B16A16_SFLOAT),
            render_target: new_texture(high_res, vk::Format::R8G8B8A8_UNORM),
        }
    }
}
