//! Headless QuickJS surface
//!
//! A [`RenderingSurface`] with no rendering: each completed navigation to the
//! placeholder gets a fresh QuickJS context with a small `console` that
//! forwards to `tracing`. Completions are queued by `navigate` and delivered
//! by [`QuickJsSurface::process_events`] on the owning thread.

use crate::surface::{
    NavigationEvent, NavigationHandler, RenderingSurface, ScriptContext, SurfaceState,
    PLACEHOLDER_URL,
};
use crate::{EvaluationError, SurfaceError};
use rquickjs::convert::Coerced;
use rquickjs::{CatchResultExt, Context, Ctx, FromJs, Function, Runtime, Value};
use std::collections::VecDeque;

/// Installs `console` on top of the native `__primer_log(level, message)`.
const CONSOLE_PRELUDE: &str = r#"
(function (log) {
    const render = (args) => Array.prototype.map.call(args, (arg) => {
        if (typeof arg === "string") return arg;
        try {
            const json = JSON.stringify(arg);
            return json === undefined ? String(arg) : json;
        } catch (_e) {
            return String(arg);
        }
    }).join(" ");
    const method = (level) => function () { log(level, render(arguments)); };
    globalThis.console = {
        log: method("info"),
        info: method("info"),
        debug: method("debug"),
        warn: method("warn"),
        error: method("error"),
    };
    delete globalThis.__primer_log;
})(globalThis.__primer_log);
"#;

/// Evaluate `source` at global scope through the document's `eval`.
///
/// The source travels as a JS string, so embedded NUL bytes are kept.
fn eval_source<'js, T: FromJs<'js>>(ctx: &Ctx<'js>, source: &str) -> rquickjs::Result<T> {
    let eval: Function = ctx.globals().get("eval")?;
    let source = rquickjs::String::from_str(ctx.clone(), source)?;
    eval.call((source,))
}

/// Headless rendering surface backed by its own QuickJS runtime.
pub struct QuickJsSurface {
    // Declared before `runtime` so the document is dropped first.
    document: Option<Context>,
    runtime: Runtime,
    scripting_enabled: bool,
    state: SurfaceState,
    pending: VecDeque<NavigationEvent>,
    handler: Option<NavigationHandler>,
}

impl QuickJsSurface {
    pub fn new() -> Result<Self, SurfaceError> {
        let runtime = Runtime::new()?;

        Ok(Self {
            document: None,
            runtime,
            scripting_enabled: false,
            state: SurfaceState::Uninitialized,
            pending: VecDeque::new(),
            handler: None,
        })
    }

    /// Deliver queued navigation completions, returning how many ran.
    pub fn process_events(&mut self) -> Result<usize, SurfaceError> {
        let mut delivered = 0;
        while let Some(event) = self.pending.pop_front() {
            self.document = Some(self.blank_document()?);
            self.state = SurfaceState::Ready;
            tracing::debug!(url = event.url(), "navigation complete");

            if let Some(mut handler) = self.handler.take() {
                let context: &mut dyn ScriptContext = &mut *self;
                handler(context, &event);
                // Keep a handler installed from inside the callback.
                if self.handler.is_none() {
                    self.handler = Some(handler);
                }
            }
            self.run_jobs();
            delivered += 1;
        }
        Ok(delivered)
    }

    /// Drain the promise job queue. Returns the number of jobs run.
    pub fn run_jobs(&self) -> usize {
        let mut ran = 0;
        while self.runtime.is_job_pending() {
            match self.runtime.execute_pending_job() {
                Ok(true) => ran += 1,
                Ok(false) => break,
                Err(_) => {
                    ran += 1;
                    tracing::trace!("pending job raised an exception");
                }
            }
        }
        ran
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn scripting_enabled(&self) -> bool {
        self.scripting_enabled
    }

    /// Evaluate `source` and coerce the completion value to a string.
    pub fn evaluate_to_string(&mut self, source: &str) -> Result<String, EvaluationError> {
        let document = self.live_document()?;
        document.with(|ctx| {
            eval_source::<Coerced<String>>(&ctx, source)
                .catch(&ctx)
                .map(|value| value.0)
                .map_err(|err| EvaluationError::Exception {
                    message: err.to_string(),
                })
        })
    }

    fn live_document(&self) -> Result<&Context, EvaluationError> {
        if !self.scripting_enabled {
            return Err(EvaluationError::ScriptingDisabled);
        }
        self.document.as_ref().ok_or(EvaluationError::NoDocument)
    }

    fn blank_document(&self) -> Result<Context, SurfaceError> {
        let context = Context::full(&self.runtime)?;
        context.with(|ctx| {
            let log = Function::new(ctx.clone(), |level: String, message: String| {
                match level.as_str() {
                    "error" => tracing::error!(target: "primer::console", "{message}"),
                    "warn" => tracing::warn!(target: "primer::console", "{message}"),
                    "debug" => tracing::debug!(target: "primer::console", "{message}"),
                    _ => tracing::info!(target: "primer::console", "{message}"),
                }
            })?;
            ctx.globals().set("__primer_log", log)?;
            ctx.eval::<(), _>(CONSOLE_PRELUDE)?;
            Ok::<_, rquickjs::Error>(())
        })?;
        Ok(context)
    }
}

impl ScriptContext for QuickJsSurface {
    fn evaluate_script(&mut self, source: &str) -> Result<(), EvaluationError> {
        let document = self.live_document()?;
        document.with(|ctx| {
            eval_source::<Value>(&ctx, source)
                .catch(&ctx)
                .map(|_| ())
                .map_err(|err| EvaluationError::Exception {
                    message: err.to_string(),
                })
        })
    }
}

impl RenderingSurface for QuickJsSurface {
    fn enable_scripting(&mut self) {
        self.scripting_enabled = true;
    }

    fn set_navigation_handler(&mut self, handler: NavigationHandler) {
        self.handler = Some(handler);
    }

    fn navigate(&mut self, url: &str) -> Result<(), SurfaceError> {
        if url != PLACEHOLDER_URL {
            return Err(SurfaceError::UnsupportedUrl {
                url: url.to_string(),
            });
        }

        self.document = None;
        self.state = SurfaceState::Navigating;
        self.pending.push_back(NavigationEvent::new(url));
        Ok(())
    }

    fn state(&self) -> SurfaceState {
        self.state
    }
}
