//! Primer Script Injection
//!
//! Drives a rendering surface to a ready state and evaluates a script
//! payload inside it.
//!
//! ## Architecture
//!
//! - **Surface contract:** [`RenderingSurface`] is what a host platform
//!   provides (enable scripting, navigate, notify, evaluate)
//! - **Controller:** [`InjectionController`] navigates to `about:blank` and
//!   injects the payload on each navigation-complete notification
//! - **Headless surface:** [`QuickJsSurface`] implements the contract on
//!   QuickJS so the host runs without a GUI platform

pub mod controller;
pub mod error;
pub mod quickjs;
pub mod surface;

pub use controller::{EvaluationMode, InjectionController, InjectionOptions};
pub use error::{ControllerError, EvaluationError, SurfaceError};
pub use quickjs::QuickJsSurface;
pub use surface::{
    NavigationEvent, NavigationHandler, RenderingSurface, ScriptContext, SurfaceState,
    PLACEHOLDER_URL,
};
