//! Host bootstrap
//!
//! Load the payload under the configured failure policy, then drive the
//! surface until the controller has injected it.

use anyhow::{Context as _, Result};
use primer_asset::{AssetLoader, AssetSource, DirAssetStore, ScriptPayload};
use primer_script::{EvaluationMode, InjectionController, InjectionOptions, QuickJsSurface, SurfaceState};
use primer_services::{EvaluationSetting, LoadFailurePolicy, Settings};
use std::path::Path;

/// Outcome of one activation.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub asset: String,
    pub payload_bytes: usize,
    pub injections: usize,
    pub state: SurfaceState,
}

pub fn load_payload<S: AssetSource>(
    loader: &AssetLoader<S>,
    name: &str,
    policy: LoadFailurePolicy,
) -> Result<ScriptPayload> {
    match policy {
        LoadFailurePolicy::Continue => Ok(loader.load_or_empty(name)),
        LoadFailurePolicy::Abort => loader
            .load(name)
            .with_context(|| format!("loading script asset '{name}'")),
    }
}

pub fn injection_options(settings: &Settings) -> InjectionOptions {
    InjectionOptions {
        evaluation: match settings.injection.evaluation {
            EvaluationSetting::FireAndForget => EvaluationMode::FireAndForget,
            EvaluationSetting::Observed => EvaluationMode::Observed,
        },
    }
}

pub fn run(settings: &Settings, settings_path: Option<&Path>) -> Result<RunReport> {
    let root = settings.resolve_asset_root(settings_path);
    tracing::info!(root = %root.display(), asset = %settings.assets.script, "loading script asset");

    let loader = AssetLoader::new(DirAssetStore::new(root));
    let payload = load_payload(
        &loader,
        &settings.assets.script,
        settings.injection.on_load_failure,
    )?;

    let surface = QuickJsSurface::new()?;
    let mut controller = InjectionController::new(surface, payload, injection_options(settings));
    controller.start()?;
    pump(&mut controller)?;

    Ok(RunReport {
        asset: controller.payload().name().to_string(),
        payload_bytes: controller.payload().len(),
        injections: controller.injections(),
        state: controller.state(),
    })
}

/// Deliver surface events until the payload has been injected.
fn pump(controller: &mut InjectionController<QuickJsSurface>) -> Result<()> {
    while !controller.is_ready() {
        if !controller.surface().has_pending_events() {
            tracing::warn!("surface went idle before the placeholder document loaded");
            break;
        }
        controller.surface_mut().process_events()?;
    }
    Ok(())
}
