//! Application settings consumed by the navigation gate.
//!
//! The gate polls a [`SettingsProvider`] on every evaluation instead of
//! caching values, so toggling a setting takes effect on the next click.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::GeneralConfig;

/// Setting key controlling whether external navigation is confirmed.
pub const JUMP_OUT_LINK_WARN: &str = "jumpOutLinkWarn";

/// Value used when a provider does not know [`JUMP_OUT_LINK_WARN`].
pub const DEFAULT_JUMP_OUT_LINK_WARN: bool = true;

/// Source of reactive boolean settings.
pub trait SettingsProvider: Send + Sync {
    /// Current value of `key`, or `None` if the provider does not know it.
    fn get_bool(&self, key: &str) -> Option<bool>;
}

/// Read the "warn on external jump" flag, falling back to the default.
pub fn jump_out_link_warn(settings: &dyn SettingsProvider) -> bool {
    settings
        .get_bool(JUMP_OUT_LINK_WARN)
        .unwrap_or(DEFAULT_JUMP_OUT_LINK_WARN)
}

/// General settings seeded from config and mutable at runtime.
#[derive(Debug)]
pub struct GeneralSettings {
    jump_out_link_warn: AtomicBool,
}

impl GeneralSettings {
    /// Create settings with an explicit warning flag.
    pub fn new(jump_out_link_warn: bool) -> Self {
        Self {
            jump_out_link_warn: AtomicBool::new(jump_out_link_warn),
        }
    }

    /// Seed settings from the `[general]` config section.
    pub fn from_config(config: &GeneralConfig) -> Self {
        Self::new(config.jump_out_link_warn)
    }

    /// Change the warning flag. Subsequent evaluations see the new value.
    pub fn set_jump_out_link_warn(&self, enabled: bool) {
        self.jump_out_link_warn.store(enabled, Ordering::Relaxed);
    }
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self::new(DEFAULT_JUMP_OUT_LINK_WARN)
    }
}

impl SettingsProvider for GeneralSettings {
    fn get_bool(&self, key: &str) -> Option<bool> {
        match key {
            JUMP_OUT_LINK_WARN => Some(self.jump_out_link_warn.load(Ordering::Relaxed)),
            _ => None,
        }
    }
}
