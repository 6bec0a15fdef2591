use ash::vk;

use super::{CommandPool, Device, Queue};

#[derive(Clone)]
pub struct CommandBuffer {
    device: Device,
    command_buffer: vk::CommandBuffer,
}

// no need to manually drop here as it is handled by the command pool

impl CommandBuffer {
    pub fn new(device: &Device, command_pool: &CommandPool) -> Self {
        let command_buffer = create_cmdbuf(device, command_pool.as_raw());
        Self {
            device: device.clone(),
            command_buffer,
        }
    }

    pub fn as_raw(&self) -> vk::CommandBuffer {
        self.command_buffer
    }

    pub fn begin_onetime(&self) {
        self.begin(true);
    }

    pub fn begin(&self, one_time: bool) {
        let mut begin_info = vk::CommandBufferBeginInfo::default();
        if one_time {
            begin_info = begin_info.flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);
        }
        unsafe {
            self.device
                .begin_command_buffer(self.command_buffer, &begin_info)
                .unwrap()
        };
    }

    pub fn end(&self) {
        unsafe { self.device.end_command_buffer(self.command_buffer).unwrap() };
    }

    pub fn submit(&self, queue: &Queue, fence: Option<vk::Fence>) {
        let command_buffers = [self.command_buffer];
        let submit_info = vk::SubmitInfo::default().command_buffers(&command_buffers);
        let submit_infos = [submit_info];
        unsafe {
            self.device
                .queue_submit(queue.as_raw(), &submit_infos, fence.unwrap_or(vk::Fence::null()))
                .unwrap();
        };
    }

    /// Submits waiting on `wait_semaphore` at `wait_stage` and signaling `signal_semaphore`,
    /// fencing `fence` once the GPU work completes. Used by the per-frame render loop, which
    /// needs to order acquire -> render -> present via semaphores rather than just a fence.
    pub fn submit_with_sync(
        &self,
        queue: &Queue,
        wait_semaphore: vk::Semaphore,
        wait_stage: vk::PipelineStageFlags,
        signal_semaphore: vk::Semaphore,
        fence: vk::Fence,
    ) {
        self.submit_with_syncs(queue, &[(wait_semaphore, wait_stage)], &[signal_semaphore], fence);
    }

    /// Generalization of [`Self::submit_with_sync`] for the delivery submission, which must
    /// wait on both swapchain-image-acquired and trace-finished before blitting.
    pub fn submit_with_syncs(
        &self,
        queue: &Queue,
        waits: &[(vk::Semaphore, vk::PipelineStageFlags)],
        signal_semaphores: &[vk::Semaphore],
        fence: vk::Fence,
    ) {
        let command_buffers = [self.command_buffer];
        let wait_semaphores: Vec<vk::Semaphore> = waits.iter().map(|(s, _)| *s).collect();
        let wait_stages: Vec<vk::PipelineStageFlags> = waits.iter().map(|(_, s)| *s).collect();
        let submit_info = vk::SubmitInfo::default()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(signal_semaphores);
        let submit_infos = [submit_info];
        unsafe {
            self.device
                .queue_submit(queue.as_raw(), &submit_infos, fence)
                .unwrap();
        };
    }

    /// Submits with no wait, signaling `signal_semaphore` once the GPU work completes. Used
    /// for the trace pass, which touches no swapchain resource and so has nothing to wait on.
    pub fn submit_signaling(&self, queue: &Queue, signal_semaphore: vk::Semaphore) {
        let command_buffers = [self.command_buffer];
        let signal_semaphores = [signal_semaphore];
        let submit_info = vk::SubmitInfo::default()
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores);
        let submit_infos = [submit_info];
        unsafe {
            self.device
                .queue_submit(queue.as_raw(), &submit_infos, vk::Fence::null())
                .unwrap();
        };
    }
}

fn create_cmdbuf(device: &Device, command_pool: vk::CommandPool) -> vk::CommandBuffer {
    let allocate_info = vk::CommandBufferAllocateInfo::default()
        .level(vk::CommandBufferLevel::PRIMARY)
        .command_pool(command_pool)
        .command_buffer_count(1);
    unsafe { device.allocate_command_buffers(&allocate_info).unwrap()[0] }
}

pub fn execute_one_time_command<R, F: FnOnce(&CommandBuffer) -> R>(
    device: &Device,
    pool: &CommandPool,
    queue: &Queue,
    executor: F,
) -> R {
    let command_buffer = CommandBuffer::new(device, pool);

    command_buffer.begin_onetime();
    let result = executor(&command_buffer);
    command_buffer.end();
    command_buffer.submit(queue, None);
    device.wait_queue_idle(queue);

    let command_buffers = [command_buffer.as_raw()];
    unsafe { device.free_command_buffers(pool.as_raw(), &command_buffers) };

    result
}
