//! Bevy UI components for the viewer
//!
//! Pure Bevy UI implementation - works on both web and native.

mod layout;
mod styles;
mod summary;
mod toolbar;
mod tooltip;

pub use layout::*;
pub use styles::*;
pub use summary::*;
pub use toolbar::{ButtonAction, ToolbarButton, ToolbarPlugin};
pub use tooltip::*;

use bevy::prelude::*;

/// Main UI plugin - combines all UI components
pub struct SummaryUiPlugin;

impl Plugin for SummaryUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UiState>().add_plugins((
            LayoutPlugin,
            ToolbarPlugin,
            SummaryPlugin,
            TooltipPlugin,
        ));
    }
}

/// Global UI state
#[derive(Resource)]
pub struct UiState {
    /// Summary panel visible
    pub show_summary: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self { show_summary: true }
    }
}
