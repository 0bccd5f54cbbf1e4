use thiserror::Error;

/// Errors surfaced by the core API.
///
/// Library code never panics on bad input; precondition violations that the
/// C-style original would have "handled" with a debug-only assertion are
/// reported here instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("no active page loaded")]
    NoActivePage,

    #[error("node no longer exists")]
    DeadNode,

    #[error("node has no parent")]
    NoParent,

    #[error("invalid framebuffer configuration: {0}")]
    InvalidFramebuffer(&'static str),

    #[error("event queue capacity must be a nonzero power of two, got {0}")]
    BadQueueCapacity(usize),

    #[error("grid layout is not implemented")]
    UnsupportedLayout,

    #[error("surface buffer too small: need {need} bytes, have {have}")]
    SurfaceTooSmall { need: usize, have: usize },
}
