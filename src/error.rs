use thiserror::Error;

/// The five error kinds of the render loop and asset pipeline (§7). Recoverable kinds
/// (`SwapchainOutOfDate`, `AllocFailed`, hot-reload `CompileError`) are handled locally by
/// their callers; everything else propagates to `main` via `?` and is fatal.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("required config key missing from both DefaultConfig.toml and CustomConfig.toml: {0}")]
    ConfigMissing(String),

    #[error("shader compilation failed for {path}: {message}")]
    CompileError { path: String, message: String },

    #[error("chunk buffer allocator could not satisfy a request for {0} bytes")]
    AllocFailed(u64),

    #[error("swapchain out of date")]
    SwapchainOutOfDate,

    #[error("GPU submission failed: {0}")]
    GpuSubmitError(String),
}
