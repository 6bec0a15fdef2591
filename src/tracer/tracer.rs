use ash::vk;
use glam::UVec2;

use super::descriptor_bundle::{DescriptorBundle, DescriptorBundleBuilder};
use super::resources::TracerResources;
use super::ubo::{EnvironmentInfo, RenderInfo, SpatialFilterInfo, TemporalFilterInfo, TweakableParameters};
use crate::builder::octree::Resources as OctreeResources;
use crate::gameplay::{Camera, ShadowCamera};
use crate::util::subpixel_jitter_sequence;
use crate::util::ShaderCompiler;
use crate::vkn::{
    Allocator, Buffer, BufferUsage, CommandBuffer, CommandPool, ComputePipeline, DescriptorPool,
    Device, Extent3D, MemoryBarrier, PipelineBarrier, PipelineLayout, Queue, ShaderModule,
    VulkanContext,
};

const PASS_NAMES: [&str; 11] = [
    "transmittance_lut",
    "multi_scattering_lut",
    "sky_view_lut",
    "shadow_map",
    "svo_coarse_beam",
    "svo_tracing",
    "temporal_filter",
    "a_trous",
    "background_blit",
    "taa_upscaling",
    "post_processing",
];

struct Pipelines {
    transmittance_lut: ComputePipeline,
    multi_scattering_lut: ComputePipeline,
    sky_view_lut: ComputePipeline,
    shadow_map: ComputePipeline,
    svo_coarse_beam: ComputePipeline,
    svo_tracing: ComputePipeline,
    temporal_filter: ComputePipeline,
    a_trous: ComputePipeline,
    background_blit: ComputePipeline,
    taa_upscaling: ComputePipeline,
    post_processing: ComputePipeline,
}

impl Pipelines {
    fn load(device: &Device, compiler: &ShaderCompiler, layout: &PipelineLayout) -> Self {
        let build = |name: &str| {
            let sm = ShaderModule::from_glsl(
                device,
                compiler,
                &format!("shader/tracer/{name}.comp"),
                "main",
            )
            .unwrap_or_else(|e| panic!("failed to load tracer shader '{name}': {e}"));
            ComputePipeline::from_shader_module_with_layout(device, &sm, layout.clone())
        };

        Self {
            transmittance_lut: build("transmittance_lut"),
            multi_scattering_lut: build("multi_scattering_lut"),
            sky_view_lut: build("sky_view_lut"),
            shadow_map: build("shadow_map"),
            svo_coarse_beam: build("svo_coarse_beam"),
            svo_tracing: build("svo_tracing"),
            temporal_filter: build("temporal_filter"),
            a_trous: build("a_trous"),
            background_blit: build("background_blit"),
            taa_upscaling: build("taa_upscaling"),
            post_processing: build("post_processing"),
        }
    }
}

/// Per-frame values the command buffer needs baked in at dispatch time but that don't
/// belong in a UBO (dispatch extents, à-trous iteration count).
pub struct TraceParams {
    pub low_res: UVec2,
    pub high_res: UVec2,
    pub beam_resolution: u32,
    pub shadow_map_resolution: u32,
}

/// Owns every render-target image, the shared per-frame descriptor bundle, the UBO ring,
/// the 12 ordered compute pipelines of §4.5.2, and the per-frame trace + per-swapchain-image
/// delivery command buffers.
pub struct Tracer {
    device: Device,
    allocator: Allocator,
    frames_in_flight: usize,

    resources: TracerResources,
    bundle: DescriptorBundle,
    pipeline_layout: PipelineLayout,
    pipelines: Pipelines,

    render_info_buffers: Vec<Buffer>,
    environment_info_buffers: Vec<Buffer>,
    tweakable_params_buffers: Vec<Buffer>,
    temporal_filter_buffers: Vec<Buffer>,
    spatial_filter_buffers: Vec<Buffer>,

    a_trous_iteration_buffer: Buffer,
    a_trous_staging_buffer: Buffer,

    trace_command_buffers: Vec<CommandBuffer>,
    delivery_command_buffers: Vec<CommandBuffer>,

    jitter_sequence: Vec<[f32; 2]>,
    params: TraceParams,
}

impl Tracer {
    pub fn new(
        vulkan_context: &VulkanContext,
        shader_compiler: &ShaderCompiler,
        allocator: Allocator,
        command_pool: &CommandPool,
        descriptor_pool: DescriptorPool,
        octree_resources: &OctreeResources,
        frames_in_flight: usize,
        swapchain_image_count: usize,
        params: TraceParams,
    ) -> Self {
        let device = vulkan_context.device().clone();

        let resources = TracerResources::new(
            &device,
            &allocator,
            params.low_res,
            params.high_res,
            params.shadow_map_resolution,
        );

        let render_info_buffers = (0..frames_in_flight)
            .map(|_| new_ubo::<RenderInfo>(&device, &allocator))
            .collect::<Vec<_>>();
        let environment_info_buffers = (0..frames_in_flight)
            .map(|_| new_ubo::<EnvironmentInfo>(&device, &allocator))
            .collect::<Vec<_>>();
        let tweakable_params_buffers = (0..frames_in_flight)
            .map(|_| new_ubo::<TweakableParameters>(&device, &allocator))
            .collect::<Vec<_>>();
        let temporal_filter_buffers = (0..frames_in_flight)
            .map(|_| new_ubo::<TemporalFilterInfo>(&device, &allocator))
            .collect::<Vec<_>>();
        let spatial_filter_buffers = (0..frames_in_flight)
            .map(|_| new_ubo::<SpatialFilterInfo>(&device, &allocator))
            .collect::<Vec<_>>();

        let a_trous_iteration_buffer = Buffer::new_sized(
            device.clone(),
            allocator.clone(),
            BufferUsage::from_flags(
                vk::BufferUsageFlags::STORAGE_BUFFER | vk::BufferUsageFlags::TRANSFER_DST,
            ),
            gpu_allocator::MemoryLocation::GpuOnly,
            std::mem::size_of::<u32>() as u64,
        );
        let a_trous_staging_buffer = Buffer::new_sized(
            device.clone(),
            allocator.clone(),
            BufferUsage::from_flags(vk::BufferUsageFlags::TRANSFER_SRC),
            gpu_allocator::MemoryLocation::CpuToGpu,
            std::mem::size_of::<u32>() as u64,
        );

        let bundle = Self::build_bundle(
            &device,
            &descriptor_pool,
            &resources,
            octree_resources,
            &render_info_buffers,
            &environment_info_buffers,
            &tweakable_params_buffers,
            &temporal_filter_buffers,
            &spatial_filter_buffers,
            &a_trous_iteration_buffer,
        );

        let pipeline_layout = PipelineLayout::from_descriptor_set_layout(&device, bundle.layout(), None);
        let pipelines = Pipelines::load(&device, shader_compiler, &pipeline_layout);

        let trace_command_buffers = (0..frames_in_flight)
            .map(|_| CommandBuffer::new(&device, command_pool))
            .collect::<Vec<_>>();
        let delivery_command_buffers = (0..swapchain_image_count)
            .map(|_| CommandBuffer::new(&device, command_pool))
            .collect::<Vec<_>>();

        let jitter_sequence = subpixel_jitter_sequence(16);

        Self {
            device,
            allocator,
            frames_in_flight,
            resources,
            bundle,
            pipeline_layout,
            pipelines,
            render_info_buffers,
            environment_info_buffers,
            tweakable_params_buffers,
            temporal_filter_buffers,
            spatial_filter_buffers,
            a_trous_iteration_buffer,
            a_trous_staging_buffer,
            trace_command_buffers,
            delivery_command_buffers,
            jitter_sequence,
            params,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build_bundle(
        device: &Device,
        descriptor_pool: &DescriptorPool,
        resources: &TracerResources,
        octree_resources: &OctreeResources,
        render_info_buffers: &[Buffer],
        environment_info_buffers: &[Buffer],
        tweakable_params_buffers: &[Buffer],
        temporal_filter_buffers: &[Buffer],
        spatial_filter_buffers: &[Buffer],
        a_trous_iteration_buffer: &Buffer,
    ) -> DescriptorBundle {
        let mut b = DescriptorBundleBuilder::new(render_info_buffers.len());

        b.bind_uniform_buffer_bundle(0, render_info_buffers.to_vec()).unwrap();
        b.bind_uniform_buffer_bundle(1, environment_info_buffers.to_vec()).unwrap();
        b.bind_uniform_buffer_bundle(2, tweakable_params_buffers.to_vec()).unwrap();
        b.bind_uniform_buffer_bundle(3, temporal_filter_buffers.to_vec()).unwrap();
        b.bind_uniform_buffer_bundle(4, spatial_filter_buffers.to_vec()).unwrap();

        b.bind_storage_image(10, resources.transmittance_lut.clone()).unwrap();
        b.bind_storage_image(11, resources.multi_scattering_lut.clone()).unwrap();
        b.bind_storage_image(12, resources.sky_view_lut.clone()).unwrap();
        b.bind_storage_image(13, resources.shadow_map.clone()).unwrap();

        b.bind_storage_image(14, resources.position.clone()).unwrap();
        b.bind_sampled_image(15, resources.last_position.clone()).unwrap();
        b.bind_storage_image(16, resources.normal.clone()).unwrap();
        b.bind_sampled_image(17, resources.last_normal.clone()).unwrap();
        b.bind_storage_image(18, resources.vox_hash.clone()).unwrap();
        b.bind_sampled_image(19, resources.last_vox_hash.clone()).unwrap();
        b.bind_storage_image(20, resources.motion.clone()).unwrap();
        b.bind_storage_image(21, resources.depth.clone()).unwrap();
        b.bind_storage_image(22, resources.coarse_beam_depth.clone()).unwrap();

        b.bind_storage_image(23, resources.accumed.clone()).unwrap();
        b.bind_sampled_image(24, resources.last_accumed.clone()).unwrap();
        b.bind_storage_image(25, resources.god_ray_accumed.clone()).unwrap();
        b.bind_sampled_image(26, resources.last_god_ray_accumed.clone()).unwrap();

        b.bind_storage_image(27, resources.a_trous_ping.clone()).unwrap();
        b.bind_storage_image(28, resources.a_trous_pong.clone()).unwrap();
        b.bind_storage_image(29, resources.background.clone()).unwrap();

        b.bind_storage_image(30, resources.taa.clone()).unwrap();
        b.bind_sampled_image(31, resources.last_taa.clone()).unwrap();
        b.bind_storage_image(32, resources.render_target.clone()).unwrap();

        // Binding 33 is the SVO Builder's appended octree buffer, shared read-only with the
        // tracer per spec §6 (the builder writes it; the tracer only ever reads it here).
        b.bind_storage_buffer(33, octree_resources.octree_data.clone()).unwrap();
        b.bind_sampled_image(34, octree_resources.octree_offset_atlas_tex.clone()).unwrap();
        b.bind_storage_buffer(35, a_trous_iteration_buffer.clone()).unwrap();

        b.build(device, descriptor_pool).expect("failed to build tracer descriptor bundle")
    }

    /// Writes this frame's UBOs from the current camera/shadow-camera/environment state.
    /// `sample_index` selects the jitter offset and feeds `RenderInfo::current_sample`.
    #[allow(clippy::too_many_arguments)]
    pub fn update_uniforms(
        &self,
        frame_index: usize,
        camera: &Camera,
        shadow_camera: &ShadowCamera,
        environment: &EnvironmentInfo,
        tweakables: &TweakableParameters,
        temporal: &TemporalFilterInfo,
        spatial: &SpatialFilterInfo,
        sample_index: u32,
        time: f32,
    ) {
        let jitter = self.jitter_sequence[sample_index as usize % self.jitter_sequence.len()];

        let v = camera.get_view_mat();
        let p = camera.get_proj_mat();
        let render_info = RenderInfo {
            cam_pos: camera.position_vec4(),
            shadow_cam_pos: shadow_camera.get_view_mat().inverse().w_axis,
            subpixel_jitter: glam::Vec4::new(jitter[0], jitter[1], 0.0, 0.0),
            v,
            v_inv: v.inverse(),
            p,
            p_inv: p.inverse(),
            vp: p * v,
            vp_inv: (p * v).inverse(),
            vp_shadow: shadow_camera.get_proj_mat() * shadow_camera.get_view_mat(),
            vp_shadow_inv: (shadow_camera.get_proj_mat() * shadow_camera.get_view_mat()).inverse(),
            low_res: self.params.low_res.as_vec2().extend(0.0).extend(0.0),
            inv_low_res: (1.0 / self.params.low_res.as_vec2()).extend(0.0).extend(0.0),
            high_res: self.params.high_res.as_vec2().extend(0.0).extend(0.0),
            inv_high_res: (1.0 / self.params.high_res.as_vec2()).extend(0.0).extend(0.0),
            current_sample: sample_index,
            time,
            ..Default::default()
        };

        self.render_info_buffers[frame_index].fill(&[render_info]).unwrap();
        self.environment_info_buffers[frame_index].fill(&[*environment]).unwrap();
        self.tweakable_params_buffers[frame_index].fill(&[*tweakables]).unwrap();
        self.temporal_filter_buffers[frame_index].fill(&[*temporal]).unwrap();
        self.spatial_filter_buffers[frame_index].fill(&[*spatial]).unwrap();
    }

    /// Records the ordered §4.5.2 command-buffer program into slot `frame_index`'s trace
    /// command buffer and returns it ready for submission.
    pub fn record_frame(&self, frame_index: usize, iteration_count: u32) -> &CommandBuffer {
        let cmdbuf = &self.trace_command_buffers[frame_index];
        let set = self.bundle.get_set(frame_index).clone();

        cmdbuf.begin_onetime();

        // Host writes to this frame's UBOs become visible before any shader reads them.
        PipelineBarrier::new(
            vk::PipelineStageFlags::HOST,
            vk::PipelineStageFlags::COMPUTE_SHADER,
            vec![MemoryBarrier::new(
                vk::AccessFlags::HOST_WRITE,
                vk::AccessFlags::SHADER_READ,
            )],
        )
        .record_insert(&self.device, cmdbuf);

        let shader_barrier = || {
            PipelineBarrier::new(
                vk::PipelineStageFlags::COMPUTE_SHADER,
                vk::PipelineStageFlags::COMPUTE_SHADER,
                vec![MemoryBarrier::new_shader_access()],
            )
        };

        let low_res_extent = Extent3D::from([self.params.low_res.x, self.params.low_res.y, 1]);
        let high_res_extent = Extent3D::from([self.params.high_res.x, self.params.high_res.y, 1]);
        let shadow_extent = Extent3D::from([
            self.params.shadow_map_resolution,
            self.params.shadow_map_resolution,
            1,
        ]);
        let beam_tiles = self.params.low_res / self.params.beam_resolution + UVec2::ONE;
        let beam_extent = Extent3D::from([beam_tiles.x, beam_tiles.y, 1]);

        self.pipelines.transmittance_lut.set_descriptor_sets(vec![set.clone()]);
        self.pipelines.transmittance_lut.record(cmdbuf, Extent3D::from([256, 64, 1]), None);
        shader_barrier().record_insert(&self.device, cmdbuf);

        self.pipelines.multi_scattering_lut.set_descriptor_sets(vec![set.clone()]);
        self.pipelines.multi_scattering_lut.record(cmdbuf, Extent3D::from([32, 32, 1]), None);
        shader_barrier().record_insert(&self.device, cmdbuf);

        self.pipelines.sky_view_lut.set_descriptor_sets(vec![set.clone()]);
        self.pipelines.sky_view_lut.record(cmdbuf, Extent3D::from([200, 200, 1]), None);
        shader_barrier().record_insert(&self.device, cmdbuf);

        self.pipelines.shadow_map.set_descriptor_sets(vec![set.clone()]);
        self.pipelines.shadow_map.record(cmdbuf, shadow_extent, None);
        shader_barrier().record_insert(&self.device, cmdbuf);

        self.pipelines.svo_coarse_beam.set_descriptor_sets(vec![set.clone()]);
        self.pipelines.svo_coarse_beam.record(cmdbuf, beam_extent, None);
        shader_barrier().record_insert(&self.device, cmdbuf);

        self.pipelines.svo_tracing.set_descriptor_sets(vec![set.clone()]);
        self.pipelines.svo_tracing.record(cmdbuf, low_res_extent, None);
        shader_barrier().record_insert(&self.device, cmdbuf);

        self.pipelines.temporal_filter.set_descriptor_sets(vec![set.clone()]);
        self.pipelines.temporal_filter.record(cmdbuf, low_res_extent, None);
        shader_barrier().record_insert(&self.device, cmdbuf);

        for i in 0..iteration_count {
            self.a_trous_staging_buffer.fill(&[i]).unwrap();
            self.a_trous_staging_buffer.record_copy_to_buffer(
                cmdbuf,
                &self.a_trous_iteration_buffer,
                std::mem::size_of::<u32>() as u64,
                0,
                0,
            );
            PipelineBarrier::new(
                vk::PipelineStageFlags::TRANSFER,
                vk::PipelineStageFlags::COMPUTE_SHADER,
                vec![MemoryBarrier::new(
                    vk::AccessFlags::TRANSFER_WRITE,
                    vk::AccessFlags::SHADER_READ,
                )],
            )
            .record_insert(&self.device, cmdbuf);

            self.pipelines.a_trous.set_descriptor_sets(vec![set.clone()]);
            self.pipelines.a_trous.record(cmdbuf, low_res_extent, None);
            shader_barrier().record_insert(&self.device, cmdbuf);
        }

        self.pipelines.background_blit.set_descriptor_sets(vec![set.clone()]);
        self.pipelines.background_blit.record(cmdbuf, low_res_extent, None);
        shader_barrier().record_insert(&self.device, cmdbuf);

        self.pipelines.taa_upscaling.set_descriptor_sets(vec![set.clone()]);
        self.pipelines.taa_upscaling.record(cmdbuf, high_res_extent, None);
        shader_barrier().record_insert(&self.device, cmdbuf);

        self.pipelines.post_processing.set_descriptor_sets(vec![set.clone()]);
        self.pipelines.post_processing.record(cmdbuf, high_res_extent, None);
        shader_barrier().record_insert(&self.device, cmdbuf);

        // Forward copies (§4.5.2 step 12): this frame's results become next frame's history.
        self.record_forward_copy(cmdbuf, &self.resources.normal, &self.resources.last_normal);
        self.record_forward_copy(cmdbuf, &self.resources.position, &self.resources.last_position);
        self.record_forward_copy(cmdbuf, &self.resources.vox_hash, &self.resources.last_vox_hash);
        self.record_forward_copy(cmdbuf, &self.resources.accumed, &self.resources.last_accumed);
        self.record_forward_copy(
            cmdbuf,
            &self.resources.god_ray_accumed,
            &self.resources.last_god_ray_accumed,
        );
        self.record_forward_copy(cmdbuf, &self.resources.taa, &self.resources.last_taa);

        cmdbuf.end();
        cmdbuf
    }

    fn record_forward_copy(
        &self,
        cmdbuf: &CommandBuffer,
        src: &crate::vkn::Texture,
        dst: &crate::vkn::Texture,
    ) {
        src.get_image().record_copy_to(cmdbuf, dst.get_image());
    }

    /// Records and returns the delivery command buffer that blits `renderTarget` into
    /// `swapchain_image` at `image_index`.
    pub fn record_delivery(
        &self,
        image_index: usize,
        swapchain_image: vk::Image,
        swapchain_extent: vk::Extent2D,
    ) -> &CommandBuffer {
        let cmdbuf = &self.delivery_command_buffers[image_index];
        cmdbuf.begin_onetime();
        self.resources
            .render_target
            .get_image()
            .record_blit_to_raw(cmdbuf, swapchain_image, swapchain_extent);
        cmdbuf.end();
        cmdbuf
    }

    pub fn submit_delivery(
        &self,
        queue: &Queue,
        image_index: usize,
        waits: &[(vk::Semaphore, vk::PipelineStageFlags)],
        signal: vk::Semaphore,
        fence: vk::Fence,
    ) {
        self.delivery_command_buffers[image_index].submit_with_syncs(queue, waits, &[signal], fence);
    }

    pub fn trace_command_buffer(&self, frame_index: usize) -> &CommandBuffer {
        &self.trace_command_buffers[frame_index]
    }

    pub fn submit_trace(&self, queue: &Queue, frame_index: usize, signal: vk::Semaphore) {
        self.trace_command_buffers[frame_index].submit_signaling(queue, signal);
    }

    /// §4.5.3: recreate every low/high-res image at the new resolution, rebuild the
    /// descriptor bundle against the fresh handles, and re-point every pipeline's bound set.
    pub fn resize(
        &mut self,
        descriptor_pool: DescriptorPool,
        octree_resources: &OctreeResources,
        low_res: UVec2,
        high_res: UVec2,
    ) {
        self.params.low_res = low_res;
        self.params.high_res = high_res;

        self.resources = TracerResources::new(
            &self.device,
            &self.allocator,
            low_res,
            high_res,
            self.params.shadow_map_resolution,
        );

        self.bundle = Self::build_bundle(
            &self.device,
            &descriptor_pool,
            &self.resources,
            octree_resources,
            &self.render_info_buffers,
            &self.environment_info_buffers,
            &self.tweakable_params_buffers,
            &self.temporal_filter_buffers,
            &self.spatial_filter_buffers,
            &self.a_trous_iteration_buffer,
        );
    }

    pub fn render_target(&self) -> &crate::vkn::Texture {
        &self.resources.render_target
    }

    pub fn frames_in_flight(&self) -> usize {
        self.frames_in_flight
    }

    /// Recompiles every compute shader and rebuilds the pipelines against the unchanged
    /// descriptor set layout, per the scheduler's pipeline-rebuild contract (§5).
    pub fn reload_pipelines(&mut self, shader_compiler: &ShaderCompiler) {
        self.pipelines = Pipelines::load(&self.device, shader_compiler, &self.pipeline_layout);
    }
}

fn new_ubo<T: Copy>(device: &Device, allocator: &Allocator) -> Buffer {
    Buffer::new_sized(
        device.clone(),
        allocator.clone(),
        BufferUsage::from_flags(vk::BufferUsageFlags::UNIFORM_BUFFER),
        gpu_allocator::MemoryLocation::CpuToGpu,
        std::mem::size_of::<T>() as u64,
    )
}

pub fn pass_names() -> &'static [&'static str] {
    &PASS_NAMES
}
