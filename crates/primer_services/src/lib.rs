//! Primer Services Layer
//!
//! Host-side configuration for the injection runtime.

pub mod settings;

pub use settings::{
    AssetSettings, EvaluationSetting, InjectionSettings, LoadFailurePolicy, LoggingSettings,
    Settings, SettingsError,
};
