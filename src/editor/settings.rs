use serde::{Deserialize, Serialize};

/// Editor mode configuration.
///
/// Loaded by the host from its own settings store; missing fields take their
/// defaults.
///
/// # Example
///
/// ```rust,ignore
/// let settings = ModeSettings {
///     use_safe_deselect: false,
///     ..Default::default()
/// };
/// let mode = ManipulatorMode::new(settings);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeSettings {
    /// Require one absorbed empty-space click before a selection clears.
    pub use_safe_deselect: bool,
    /// Ignore host owner selection changes while the mode is active.
    pub lock_actor_selection: bool,
    /// Reference constant for zoom-compensated shape sizes.
    pub zoom_reference: f32,
    /// Mirror manipulator selection to the timeline's track selection.
    pub auto_sync_timeline: bool,
}

impl Default for ModeSettings {
    fn default() -> Self {
        Self {
            use_safe_deselect: true,
            lock_actor_selection: false,
            zoom_reference: 0.0065,
            auto_sync_timeline: true,
        }
    }
}
