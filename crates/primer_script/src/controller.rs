//! Injection controller
//!
//! Owns one surface, navigates it to the placeholder document and evaluates
//! the payload every time the surface reports a finished navigation.
//!
//! ```text
//! new()    -> Uninitialized  (scripting enabled, handler registered)
//! start()  -> Navigating     (navigate to about:blank)
//! notified -> Ready          (payload evaluated)
//! ```
//!
//! Notifications that arrive before `start()` are ignored.

use crate::surface::{NavigationEvent, RenderingSurface, ScriptContext, SurfaceState, PLACEHOLDER_URL};
use crate::ControllerError;
use primer_asset::ScriptPayload;
use std::cell::Cell;
use std::rc::Rc;

/// How the controller treats the outcome of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluationMode {
    /// Discard the outcome.
    #[default]
    FireAndForget,
    /// Log failed evaluations. Never retried.
    Observed,
}

#[derive(Debug, Clone, Default)]
pub struct InjectionOptions {
    pub evaluation: EvaluationMode,
}

/// Shared between the controller and the handler it registers.
#[derive(Debug, Default)]
struct Progress {
    state: Cell<SurfaceState>,
    injections: Cell<usize>,
}

pub struct InjectionController<S: RenderingSurface> {
    surface: S,
    payload: ScriptPayload,
    progress: Rc<Progress>,
}

impl<S: RenderingSurface> InjectionController<S> {
    /// Take ownership of `surface`, enable scripting and wire the handler.
    ///
    /// The payload is moved in here, so it is always loaded before any
    /// navigation can complete.
    pub fn new(mut surface: S, payload: ScriptPayload, options: InjectionOptions) -> Self {
        let progress = Rc::new(Progress::default());

        surface.enable_scripting();
        surface.set_navigation_handler(Box::new({
            let payload = payload.clone();
            let progress = Rc::clone(&progress);
            let mode = options.evaluation;
            move |context: &mut dyn ScriptContext, event: &NavigationEvent| {
                // Only navigations requested after start() lead to injection.
                if progress.state.get() == SurfaceState::Uninitialized {
                    tracing::debug!(url = event.url(), "navigation completed before start, ignored");
                    return;
                }
                progress.state.set(SurfaceState::Ready);
                let outcome = context.evaluate_script(payload.source());
                progress.injections.set(progress.injections.get() + 1);

                match (mode, outcome) {
                    (EvaluationMode::Observed, Err(err)) => {
                        tracing::warn!(asset = payload.name(), url = event.url(), error = %err, "script evaluation failed");
                    }
                    (EvaluationMode::Observed, Ok(())) => {
                        tracing::debug!(asset = payload.name(), url = event.url(), "script evaluated");
                    }
                    (EvaluationMode::FireAndForget, _) => {}
                }
            }
        }));

        tracing::debug!(asset = payload.name(), bytes = payload.len(), "injection controller ready");
        Self {
            surface,
            payload,
            progress,
        }
    }

    /// Request the placeholder navigation.
    pub fn start(&mut self) -> Result<(), ControllerError> {
        if self.progress.state.get() != SurfaceState::Uninitialized {
            return Err(ControllerError::AlreadyStarted);
        }

        // Set first: a surface may report completion from inside navigate().
        self.progress.state.set(SurfaceState::Navigating);
        if let Err(err) = self.surface.navigate(PLACEHOLDER_URL) {
            self.progress.state.set(SurfaceState::Uninitialized);
            return Err(err.into());
        }

        tracing::debug!(url = PLACEHOLDER_URL, "placeholder navigation requested");
        Ok(())
    }

    pub fn state(&self) -> SurfaceState {
        self.progress.state.get()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == SurfaceState::Ready
    }

    /// Number of evaluations issued so far.
    pub fn injections(&self) -> usize {
        self.progress.injections.get()
    }

    pub fn payload(&self) -> &ScriptPayload {
        &self.payload
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for pumping platform events.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}
