use thiserror::Error;

/// Failure raised inside the surface's script context.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("scripting is not enabled on this surface")]
    ScriptingDisabled,

    #[error("no document has finished loading")]
    NoDocument,

    #[error("script threw: {message}")]
    Exception { message: String },
}

/// Errors reported by the surface itself.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("navigation to '{url}' is not supported")]
    UnsupportedUrl { url: String },

    #[error("script engine error: {message}")]
    Engine { message: String },
}

impl From<rquickjs::Error> for SurfaceError {
    fn from(err: rquickjs::Error) -> Self {
        SurfaceError::Engine {
            message: err.to_string(),
        }
    }
}

/// Errors from driving the injection sequence.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("placeholder navigation was already requested")]
    AlreadyStarted,

    #[error("placeholder navigation failed")]
    Navigation(#[from] SurfaceError),
}
