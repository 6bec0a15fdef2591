use std::sync::{Arc, Mutex};

use anyhow::{Context as _, Result};
use ash::vk;
use glam::{UVec2, UVec3, Vec2};
use gpu_allocator::vulkan::AllocatorCreateDesc;
use winit::{
    event::{DeviceEvent, ElementState, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::KeyCode,
    window::WindowId,
};

use crate::builder::Builder;
use crate::config::Config;
use crate::gameplay::{Camera, CameraDesc, CameraMovementDesc, CameraProjectionDesc, LightType, ShadowCamera};
use crate::scheduler::Scheduler;
use crate::tracer::{EnvironmentInfo, SpatialFilterInfo, TemporalFilterInfo, TraceParams, Tracer, TweakableParameters};
use crate::util::{full_path_from_relative, get_sun_dir, ShaderCompiler, TimeInfo};
use crate::vkn::{Allocator, DescriptorPool, Fence, Semaphore, Swapchain, VulkanContext, VulkanContextDesc};
use crate::window::{WindowMode, WindowState, WindowStateDesc};

/// Owns the whole render pipeline: window, device, SVO builder, SVO tracer, and the
/// per-frame-in-flight sync objects that drive the render loop (§5).
pub struct App {
    window_state: WindowState,
    time_info: TimeInfo,
    accumulated_mouse_delta: Vec2,
    smoothed_mouse_delta: Vec2,
    is_resize_pending: bool,

    camera: Camera,
    shadow_camera: ShadowCamera,
    environment_info: EnvironmentInfo,
    tweakable_parameters: TweakableParameters,
    temporal_filter_info: TemporalFilterInfo,
    spatial_filter_info: SpatialFilterInfo,
    shadow_half_extent: f32,
    sample_index: u32,

    config: Config,
    scheduler: Scheduler,
    shader_compiler: ShaderCompiler<'static>,

    allocator: Allocator,
    descriptor_pool: DescriptorPool,

    frame_index: usize,
    image_available_semaphores: Vec<Semaphore>,
    trace_finished_semaphores: Vec<Semaphore>,
    render_finished_semaphores: Vec<Semaphore>,
    in_flight_fences: Vec<Fence>,

    tracer: Tracer,

    // the swapchain is built against `builder`'s VulkanContext's surface, so it must be
    // dropped before `builder` is.
    swapchain: Swapchain,

    // `builder` owns the VulkanContext; keep it last so the instance/device/surface outlive
    // everything built on top of them.
    builder: Builder,
}

const VOXEL_DIM_MAX: u32 = 256;

impl App {
    pub fn new(event_loop: &ActiveEventLoop) -> Result<Self> {
        let config = Config::load(
            std::path::Path::new(&full_path_from_relative("configs/DefaultConfig.toml")),
            std::path::Path::new(&full_path_from_relative("configs/CustomConfig.toml")),
        )?;

        let window_state = Self::create_window_state(event_loop);
        let vulkan_context = Self::create_vulkan_context(&window_state);

        let shader_compiler: ShaderCompiler<'static> =
            ShaderCompiler::new().map_err(|e| anyhow::anyhow!(e))?;

        let allocator = {
            let device = vulkan_context.device();
            let allocator_create_info = AllocatorCreateDesc {
                instance: vulkan_context.instance().clone(),
                device: device.as_raw().clone(),
                physical_device: vulkan_context.physical_device(),
                debug_settings: Default::default(),
                buffer_device_address: true,
                allocation_sizes: Default::default(),
            };
            let gpu_allocator = gpu_allocator::vulkan::Allocator::new(&allocator_create_info)
                .context("failed to create gpu allocator")?;
            Allocator::new(device, Arc::new(Mutex::new(gpu_allocator)))
        };

        let descriptor_pool = DescriptorPool::new(vulkan_context.device())?;

        let screen_extent = window_state.window_size();
        let swapchain = Swapchain::new(&vulkan_context, screen_extent);

        let voxel_dim = UVec3::splat(config.svo_builder.chunk_voxel_dim.min(VOXEL_DIM_MAX));
        let visible_chunk_dim = UVec3::from_array(config.svo_builder.chunk_dim);

        let mut builder = Builder::new(
            vulkan_context,
            &shader_compiler,
            descriptor_pool.clone(),
            allocator.clone(),
            voxel_dim,
            visible_chunk_dim,
            config.svo_builder.octree_buffer_size,
        );

        for z in 0..visible_chunk_dim.z {
            for y in 0..visible_chunk_dim.y {
                for x in 0..visible_chunk_dim.x {
                    builder
                        .build_chunk(UVec3::new(x, y, z))
                        .map_err(|e| anyhow::anyhow!(e))
                        .context("failed to build a chunk at startup")?;
                }
            }
        }

        let frames_in_flight = config.application.frames_in_flight;
        let high_res = UVec2::new(screen_extent[0], screen_extent[1]);
        let low_res = (high_res.as_vec2() / config.svo_tracer.upscale_ratio)
            .max(Vec2::ONE)
            .as_uvec2();

        let tracer = Tracer::new(
            builder.vulkan_context(),
            &shader_compiler,
            allocator.clone(),
            builder.vulkan_context().command_pool(),
            descriptor_pool.clone(),
            builder.octree_resources(),
            frames_in_flight,
            swapchain.image_count(),
            TraceParams {
                low_res,
                high_res,
                beam_resolution: config.svo_tracer.beam_resolution,
                shadow_map_resolution: config.svo_tracer.shadow_map_resolution,
            },
        );

        let device = builder.vulkan_context().device();
        let image_available_semaphores = (0..frames_in_flight).map(|_| Semaphore::new(device)).collect();
        let trace_finished_semaphores = (0..frames_in_flight).map(|_| Semaphore::new(device)).collect();
        let render_finished_semaphores = (0..frames_in_flight).map(|_| Semaphore::new(device)).collect();
        let in_flight_fences = (0..frames_in_flight).map(|_| Fence::new(device, true)).collect();

        let camera_desc = CameraDesc {
            movement: CameraMovementDesc {
                normal_speed: config.camera.movement_speed,
                boosted_speed_mul: config.camera.movement_speed_boost,
                mouse_sensitivity: config.camera.mouse_sensitivity,
            },
            projection: CameraProjectionDesc {
                v_fov: config.camera.v_fov,
                ..Default::default()
            },
            aspect_ratio: window_state.aspect_ratio(),
        };
        let camera = Camera::new(
            glam::Vec3::from(config.camera.init_position),
            config.camera.init_yaw,
            config.camera.init_pitch,
            camera_desc,
        );

        let mut scheduler = Scheduler::new();
        for pass_name in crate::tracer::pass_names() {
            scheduler.watch(full_path_from_relative(&format!("shader/tracer/{pass_name}.comp")));
        }

        Ok(Self {
            window_state,
            time_info: TimeInfo::default(),
            accumulated_mouse_delta: Vec2::ZERO,
            smoothed_mouse_delta: Vec2::ZERO,
            is_resize_pending: false,

            camera,
            shadow_camera: ShadowCamera::new(),
            environment_info: EnvironmentInfo::from_config(&config.atmos),
            tweakable_parameters: TweakableParameters::from_config(
                &config.svo_tracer_tweaking,
                &config.post_processing,
            ),
            temporal_filter_info: TemporalFilterInfo::from_config(&config.post_processing),
            spatial_filter_info: SpatialFilterInfo::from_config(&config.post_processing),
            shadow_half_extent: (visible_chunk_dim.max_element() * voxel_dim.x) as f32,
            sample_index: 0,

            config,
            scheduler,
            shader_compiler,

            allocator,
            descriptor_pool,

            frame_index: 0,
            image_available_semaphores,
            trace_finished_semaphores,
            render_finished_semaphores,
            in_flight_fences,

            tracer,
            swapchain,
            builder,
        })
    }

    fn create_window_state(event_loop: &ActiveEventLoop) -> WindowState {
        let desc = WindowStateDesc {
            title: "voxel path tracer".to_owned(),
            window_mode: WindowMode::Windowed,
            cursor_locked: true,
            cursor_visible: false,
            ..Default::default()
        };
        WindowState::new(event_loop, &desc)
    }

    fn create_vulkan_context(window_state: &WindowState) -> VulkanContext {
        VulkanContext::new(
            &window_state.window(),
            VulkanContextDesc {
                name: "voxel path tracer",
            },
        )
    }

    fn device(&self) -> &crate::vkn::Device {
        self.builder.vulkan_context().device()
    }

    pub fn on_terminate(&mut self, event_loop: &ActiveEventLoop) {
        self.device().wait_idle();
        event_loop.exit();
    }

    pub fn on_window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.on_terminate(event_loop),

            WindowEvent::ScaleFactorChanged { .. } | WindowEvent::Resized(_) => {
                self.is_resize_pending = true;
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && event.physical_key == KeyCode::Escape {
                    self.on_terminate(event_loop);
                    return;
                }

                if event.state == ElementState::Pressed && event.physical_key == KeyCode::Tab {
                    self.window_state.toggle_cursor_visibility();
                    self.window_state.toggle_cursor_grab();
                }

                if !self.window_state.is_cursor_visible() {
                    self.camera.handle_keyboard(&event);
                }
            }

            WindowEvent::RedrawRequested => self.on_redraw(),

            _ => {}
        }
    }

    pub fn on_device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if !self.window_state.is_cursor_visible() {
                self.accumulated_mouse_delta += Vec2::new(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    pub fn on_about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if !self.window_state.is_minimized() {
            self.window_state.window().request_redraw();
        }
    }

    /// The render loop of §5: wait for this frame slot's GPU work to retire, poll for shader
    /// edits, acquire a swapchain image, record and submit the trace + delivery command
    /// buffers, then present.
    fn on_redraw(&mut self) {
        if self.window_state.is_minimized() {
            return;
        }

        if self.is_resize_pending {
            self.on_resize();
        }

        self.time_info.update();
        let dt = self.time_info.delta_time();

        if !self.window_state.is_cursor_visible() {
            let mouse_delta = std::mem::take(&mut self.accumulated_mouse_delta);
            const SMOOTHING: f32 = 0.4;
            self.smoothed_mouse_delta = self.smoothed_mouse_delta * SMOOTHING + mouse_delta * (1.0 - SMOOTHING);
            self.camera.handle_mouse(self.smoothed_mouse_delta);
        }
        self.camera.update_transform(dt);

        if self.scheduler.poll() {
            log::info!("shader source changed, rebuilding tracer pipelines");
            self.device().wait_idle();
            self.tracer.reload_pipelines(&self.shader_compiler);
        }

        let frame_index = self.frame_index;
        let fence = self.in_flight_fences[frame_index].clone();
        fence.wait();

        let image_available = self.image_available_semaphores[frame_index].clone();
        let Some(image_index) = self.swapchain.acquire_next_image(image_available.as_raw()) else {
            self.is_resize_pending = true;
            return;
        };
        let image_index = image_index as usize;

        fence.reset();

        let sun_dir = get_sun_dir(self.config.atmos.sun_altitude, self.config.atmos.sun_azimuth);
        self.shadow_camera
            .update(&LightType { direction: sun_dir }, self.shadow_half_extent);

        self.tracer.update_uniforms(
            frame_index,
            &self.camera,
            &self.shadow_camera,
            &self.environment_info,
            &self.tweakable_parameters,
            &self.temporal_filter_info,
            &self.spatial_filter_info,
            self.sample_index,
            self.time_info.display_fps(),
        );
        self.sample_index = self.sample_index.wrapping_add(1);

        self.tracer.record_frame(frame_index, self.spatial_filter_info.iteration_count);

        let general_queue = self.builder.vulkan_context().get_general_queue();
        let trace_finished = self.trace_finished_semaphores[frame_index].clone();
        self.tracer.submit_trace(&general_queue, frame_index, trace_finished.as_raw());

        let swapchain_extent = self.swapchain.extent();
        self.tracer
            .record_delivery(image_index, self.swapchain.image(image_index), swapchain_extent);

        let render_finished = self.render_finished_semaphores[frame_index].clone();
        self.tracer.submit_delivery(
            &general_queue,
            image_index,
            &[
                (image_available.as_raw(), vk::PipelineStageFlags::TRANSFER),
                (trace_finished.as_raw(), vk::PipelineStageFlags::TRANSFER),
            ],
            render_finished.as_raw(),
            fence.as_raw(),
        );

        if !self
            .swapchain
            .present(general_queue.as_raw(), render_finished.as_raw(), image_index as u32)
        {
            self.is_resize_pending = true;
        }

        self.frame_index = (self.frame_index + 1) % self.tracer.frames_in_flight();
    }

    /// §4.5.3: wait for the device to go idle, recreate the swapchain at the new extent, and
    /// have the camera and tracer follow along.
    fn on_resize(&mut self) {
        self.device().wait_idle();

        let screen_extent = self.window_state.window_size();
        self.swapchain.recreate(self.builder.vulkan_context(), screen_extent);

        self.camera.on_resize(crate::vkn::Extent2D::from(screen_extent));

        let high_res = UVec2::new(screen_extent[0], screen_extent[1]);
        let low_res = (high_res.as_vec2() / self.config.svo_tracer.upscale_ratio)
            .max(Vec2::ONE)
            .as_uvec2();
        self.tracer.resize(
            self.descriptor_pool.clone(),
            self.builder.octree_resources(),
            low_res,
            high_res,
        );

        self.is_resize_pending = false;
    }
}
