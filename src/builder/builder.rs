use std::collections::HashSet;

use glam::{IVec3, UVec3, Vec3};

use super::octree::{FragListBuilder, FragListBuildType, OctreeBuilder, Resources as OctreeResources};
use super::plain::{FieldBuilder, Resources as PlainResources};
use crate::util::ShaderCompiler;
use crate::vkn::{Allocator, DescriptorPool, ShaderModule, VulkanContext};

/// Orchestrates per-chunk octree construction and editing, per
/// "Initial build of a chunk" / "Editing an existing chunk".
pub struct Builder {
    vulkan_context: VulkanContext,
    allocator: Allocator,

    plain_resources: PlainResources,
    octree_resources: OctreeResources,

    field_builder: FieldBuilder,
    frag_list_builder: FragListBuilder,
    octree_builder: OctreeBuilder,

    voxel_dim: UVec3,
    visible_chunk_dim: UVec3,

    /// Chunks whose density field has already been constructed at least once; used to decide
    /// between re-running field construction from noise and reusing the cached field.
    field_cache: HashSet<UVec3>,
}

impl Builder {
    fn validate(resolution: u32) -> Result<(), String> {
        if resolution & (resolution - 1) != 0 {
            return Err("Resolution must be a power of 2".to_string());
        }
        Ok(())
    }

    pub fn new(
        vulkan_context: VulkanContext,
        shader_compiler: &ShaderCompiler,
        descriptor_pool: DescriptorPool,
        allocator: Allocator,
        voxel_dim: UVec3,
        visible_chunk_dim: UVec3,
        octree_buffer_size: u64,
    ) -> Self {
        Self::validate(voxel_dim.x).unwrap();

        let plain_resources = PlainResources::new(
            vulkan_context.device().clone(),
            allocator.clone(),
            voxel_dim,
            visible_chunk_dim,
        );

        let frag_init_buffers_sm = ShaderModule::from_glsl(
            vulkan_context.device(),
            shader_compiler,
            "shader/builder/frag_list_builder/init_buffers.comp",
            "main",
        )
        .unwrap();
        let frag_list_maker_sm = ShaderModule::from_glsl(
            vulkan_context.device(),
            shader_compiler,
            "shader/builder/frag_list_builder/frag_list_maker.comp",
            "main",
        )
        .unwrap();
        let octree_init_buffers_sm = ShaderModule::from_glsl(
            vulkan_context.device(),
            shader_compiler,
            "shader/builder/octree_builder/init_buffers.comp",
            "main",
        )
        .unwrap();
        let octree_resources = OctreeResources::new(
            vulkan_context.device().clone(),
            allocator.clone(),
            voxel_dim,
            visible_chunk_dim,
            octree_buffer_size,
            &frag_init_buffers_sm,
            &frag_list_maker_sm,
            &octree_init_buffers_sm,
        );

        let field_builder = FieldBuilder::new(
            &vulkan_context,
            shader_compiler,
            descriptor_pool.clone(),
            &plain_resources,
        );

        let frag_list_builder = FragListBuilder::new(
            &vulkan_context,
            shader_compiler,
            descriptor_pool.clone(),
            &plain_resources,
            &allocator,
            voxel_dim,
            visible_chunk_dim,
            octree_buffer_size,
        );

        let octree_builder = OctreeBuilder::new(
            &vulkan_context,
            shader_compiler,
            descriptor_pool,
            &octree_resources,
            octree_buffer_size,
        );

        Self {
            vulkan_context,
            allocator,
            plain_resources,
            octree_resources,
            field_builder,
            frag_list_builder,
            octree_builder,
            voxel_dim,
            visible_chunk_dim,
            field_cache: HashSet::new(),
        }
    }

    pub fn vulkan_context(&self) -> &VulkanContext {
        &self.vulkan_context
    }

    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    pub fn octree_resources(&self) -> &OctreeResources {
        &self.octree_resources
    }

    fn atlas_offset_for_chunk(&self, chunk_pos: UVec3) -> UVec3 {
        chunk_pos * self.voxel_dim
    }

    /// Runs the full field-construction -> voxelization -> octree-construction pipeline for a
    /// chunk that has never been built (or is being rebuilt from scratch).
    pub fn build_chunk(&mut self, chunk_pos: UVec3) -> Result<(), String> {
        let atlas_offset = self.atlas_offset_for_chunk(chunk_pos);

        self.field_builder.construct(
            FragListBuildType::ChunkAtlas,
            &self.vulkan_context,
            self.voxel_dim.x,
            atlas_offset.as_ivec3(),
        );
        self.field_cache.insert(chunk_pos);

        self.finish_chunk_from_field(chunk_pos, atlas_offset, FragListBuildType::ChunkAtlas)
    }

    /// Runs voxelization + octree construction against whatever is already in the field atlas
    /// at `atlas_offset`, publishing the result for `chunk_pos`. Shared by initial build (4.4.1
    /// steps 3-6) and editing (4.4.2's re-voxelize + steps 4-6 of 4.4.1).
    fn finish_chunk_from_field(
        &mut self,
        chunk_pos: UVec3,
        atlas_offset: UVec3,
        build_type: FragListBuildType,
    ) -> Result<(), String> {
        self.frag_list_builder.build(
            build_type,
            &self.vulkan_context,
            &self.octree_resources,
            atlas_offset,
            self.voxel_dim,
            false,
        );

        let fragment_list_len = self
            .frag_list_builder
            .get_fraglist_length(&self.octree_resources);

        if fragment_list_len == 0 {
            // Early-out: the chunk is empty. `chunkIndices[C]` is left at 0 by the caller, which
            // owns the chunk-index directory this orchestrator feeds offsets into.
            return Ok(());
        }

        self.octree_builder.build_and_alloc(
            build_type,
            &self.vulkan_context,
            &self.octree_resources,
            fragment_list_len,
            atlas_offset,
            self.voxel_dim,
        )?;

        self.octree_builder.update_octree_offset_atlas_tex(
            &self.vulkan_context,
            &self.octree_resources,
            self.voxel_dim,
            self.visible_chunk_dim,
        );

        Ok(())
    }

    /// Enumerates chunks whose AABB intersects the edit sphere `(pos, radius)` and applies the
    /// carve (`op_sign < 0`) or paint (`op_sign > 0`) edit to each.
    pub fn edit(&mut self, pos: Vec3, radius: f32, op_sign: f32) -> Result<(), String> {
        let chunk_size = self.voxel_dim.x as f32;
        let min_chunk = ((pos - Vec3::splat(radius)) / chunk_size)
            .floor()
            .as_ivec3();
        let max_chunk = ((pos + Vec3::splat(radius)) / chunk_size)
            .floor()
            .as_ivec3();

        for cz in min_chunk.z..=max_chunk.z {
            for cy in min_chunk.y..=max_chunk.y {
                for cx in min_chunk.x..=max_chunk.x {
                    let chunk = IVec3::new(cx, cy, cz);
                    if chunk.cmplt(IVec3::ZERO).any()
                        || chunk.as_uvec3().cmpge(self.visible_chunk_dim).any()
                    {
                        continue;
                    }
                    self.edit_chunk(chunk.as_uvec3(), pos, radius, op_sign)?;
                }
            }
        }
        Ok(())
    }

    fn edit_chunk(
        &mut self,
        chunk_pos: UVec3,
        center: Vec3,
        radius: f32,
        op_sign: f32,
    ) -> Result<(), String> {
        let atlas_offset = self.atlas_offset_for_chunk(chunk_pos);

        if !self.field_cache.contains(&chunk_pos) {
            self.field_builder.construct(
                FragListBuildType::ChunkAtlas,
                &self.vulkan_context,
                self.voxel_dim.x,
                atlas_offset.as_ivec3(),
            );
            self.field_cache.insert(chunk_pos);
        }

        let local_center = (center - (chunk_pos * self.voxel_dim).as_vec3()).as_ivec3();
        self.field_builder.modify(
            FragListBuildType::ChunkAtlas,
            &self.vulkan_context,
            self.voxel_dim.x,
            local_center,
            radius,
            op_sign,
        );

        self.finish_chunk_from_field(chunk_pos, atlas_offset, FragListBuildType::ChunkAtlas)
    }
}
