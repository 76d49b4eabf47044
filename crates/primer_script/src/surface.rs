//! Rendering surface contract
//!
//! What a host platform has to provide for script injection. Everything
//! here is driven from the single thread that owns the surface.

use crate::{EvaluationError, SurfaceError};

/// Empty document used to give the script engine an execution context.
pub const PLACEHOLDER_URL: &str = "about:blank";

/// Lifecycle of a surface as seen by the injection sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceState {
    #[default]
    Uninitialized,
    Navigating,
    Ready,
}

/// Fired once when a requested navigation finishes loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    url: String,
}

impl NavigationEvent {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Navigation-complete callback. Receives the surface as its script context.
pub type NavigationHandler = Box<dyn FnMut(&mut dyn ScriptContext, &NavigationEvent)>;

/// A document context scripts can be evaluated in.
pub trait ScriptContext {
    /// Evaluate `source` in the current document.
    ///
    /// The result may be ignored by callers that do not observe outcomes.
    fn evaluate_script(&mut self, source: &str) -> Result<(), EvaluationError>;
}

/// Embedded rendering/scripting surface supplied by the host platform.
pub trait RenderingSurface: ScriptContext {
    fn enable_scripting(&mut self);

    /// Replace the navigation-complete handler.
    fn set_navigation_handler(&mut self, handler: NavigationHandler);

    /// Request a navigation. Completion is reported through the handler.
    fn navigate(&mut self, url: &str) -> Result<(), SurfaceError>;

    fn state(&self) -> SurfaceState;
}
