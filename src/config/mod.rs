//! Configuration loading with defaults.

pub mod settings;

pub use settings::Settings;
