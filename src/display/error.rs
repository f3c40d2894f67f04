//! Display surface error types.

use thiserror::Error;

/// Errors a display surface can report while rendering.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The surface was closed or destroyed.
    #[error("display surface is no longer available")]
    Detached,

    /// Rendering failed for another reason.
    #[error("display surface failed to render: {0}")]
    Render(String),
}

impl SurfaceError {
    /// Returns true if the surface is gone for good.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        matches!(self, Self::Detached)
    }
}
