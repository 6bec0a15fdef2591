use super::Resources;
use crate::builder::octree::FragListBuildType;
use crate::util::ShaderCompiler;
use crate::vkn::{
    execute_one_time_command, ComputePipeline, DescriptorPool, DescriptorSet, Extent3D,
    ShaderModule, VulkanContext, WriteDescriptorSet,
};
use ash::vk;
use glam::IVec3;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct FieldConstructionPushConstants {
    chunk_world_offset: IVec3,
    chunk_voxel_dim: u32,
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct FieldModificationPushConstants {
    center: IVec3,
    radius: f32,
    op_sign: f32,
    _pad: [f32; 2],
}

/// Writes/edits the 16-bit signed-distance corner field that voxelization reads, per spec
/// §4.4.1 step 2 (field construction from procedural noise) and §4.4.2 (carve/paint editing).
pub struct FieldBuilder {
    construction_ppl: ComputePipeline,
    modification_ppl: ComputePipeline,
    chunk_atlas_ds: DescriptorSet,
    free_atlas_ds: DescriptorSet,
}

impl FieldBuilder {
    pub fn new(
        vulkan_ctx: &VulkanContext,
        shader_compiler: &ShaderCompiler,
        descriptor_pool: DescriptorPool,
        resources: &Resources,
    ) -> Self {
        let construction_sm = ShaderModule::from_glsl(
            vulkan_ctx.device(),
            shader_compiler,
            "shader/builder/plain/field_construction.comp",
            "main",
        )
        .unwrap();
        let construction_ppl =
            ComputePipeline::from_shader_module(vulkan_ctx.device(), &construction_sm);

        let modification_sm = ShaderModule::from_glsl(
            vulkan_ctx.device(),
            shader_compiler,
            "shader/builder/plain/field_modification.comp",
            "main",
        )
        .unwrap();
        let modification_ppl =
            ComputePipeline::from_shader_module(vulkan_ctx.device(), &modification_sm);

        let chunk_atlas_ds = DescriptorSet::new(
            vulkan_ctx.device().clone(),
            &construction_ppl.get_layout().get_descriptor_set_layouts()[0],
            descriptor_pool.clone(),
        );
        chunk_atlas_ds.perform_writes(&mut [WriteDescriptorSet::new_texture_write(
            0,
            vk::DescriptorType::STORAGE_IMAGE,
            &resources.chunk_atlas,
            vk::ImageLayout::GENERAL,
        )]);

        let free_atlas_ds = DescriptorSet::new(
            vulkan_ctx.device().clone(),
            &construction_ppl.get_layout().get_descriptor_set_layouts()[0],
            descriptor_pool,
        );
        free_atlas_ds.perform_writes(&mut [WriteDescriptorSet::new_texture_write(
            0,
            vk::DescriptorType::STORAGE_IMAGE,
            &resources.free_atlas,
            vk::ImageLayout::GENERAL,
        )]);

        Self {
            construction_ppl,
            modification_ppl,
            chunk_atlas_ds,
            free_atlas_ds,
        }
    }

    fn descriptor_set(&self, build_type: FragListBuildType) -> &DescriptorSet {
        match build_type {
            FragListBuildType::ChunkAtlas => &self.chunk_atlas_ds,
            FragListBuildType::FreeAtlas => &self.free_atlas_ds,
        }
    }

    /// Evaluates the density function at every corner of the chunk's field region.
    pub fn construct(
        &self,
        build_type: FragListBuildType,
        vulkan_ctx: &VulkanContext,
        chunk_voxel_dim: u32,
        chunk_world_offset: IVec3,
    ) {
        self.construction_ppl
            .set_descriptor_sets(vec![self.descriptor_set(build_type).clone()]);

        let push_constants = FieldConstructionPushConstants {
            chunk_world_offset,
            chunk_voxel_dim,
        };
        let field_dim = chunk_voxel_dim + 1;

        execute_one_time_command(
            vulkan_ctx.device(),
            vulkan_ctx.command_pool(),
            &vulkan_ctx.get_general_queue(),
            |cmdbuf| {
                self.construction_ppl.record(
                    cmdbuf,
                    Extent3D::from([field_dim, field_dim, field_dim]),
                    Some(bytemuck::bytes_of(&push_constants)),
                );
            },
        );
    }

    /// Applies a carve (`op_sign < 0`) or paint (`op_sign > 0`) edit centered at `center`.
    pub fn modify(
        &self,
        build_type: FragListBuildType,
        vulkan_ctx: &VulkanContext,
        chunk_voxel_dim: u32,
        center: IVec3,
        radius: f32,
        op_sign: f32,
    ) {
        self.modification_ppl
            .set_descriptor_sets(vec![self.descriptor_set(build_type).clone()]);

        let push_constants = FieldModificationPushConstants {
            center,
            radius,
            op_sign,
            _pad: [0.0; 2],
        };
        let field_dim = chunk_voxel_dim + 1;

        execute_one_time_command(
            vulkan_ctx.device(),
            vulkan_ctx.command_pool(),
            &vulkan_ctx.get_general_queue(),
            |cmdbuf| {
                self.modification_ppl.record(
                    cmdbuf,
                    Extent3D::from([field_dim, field_dim, field_dim]),
                    Some(bytemuck::bytes_of(&push_constants)),
                );
            },
        );
    }
}
