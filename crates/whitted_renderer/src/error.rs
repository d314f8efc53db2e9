//! Error type for scene building and rendering.

use thiserror::Error;

/// Errors that can occur while building a scene or rendering it.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("cannot build a BVH over an empty scene")]
    EmptyScene,

    #[error("failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
