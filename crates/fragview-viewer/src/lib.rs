//! Fragview 3D Viewer
//!
//! Bevy-based viewer for IFC models with WebGPU/WebGL2 rendering.
//! Loads a model via the `ModelSource` seam, shows a summary panel, and
//! highlights the object under the cursor with a tooltip.

pub mod camera;
pub mod hover;
pub mod loader;
pub mod scene;
pub mod session;
pub mod ui;

use bevy::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// Global debug mode flag (set from URL parameter ?debug=1)
static DEBUG_MODE: AtomicBool = AtomicBool::new(false);

/// Check if debug mode is enabled
pub fn is_debug() -> bool {
    DEBUG_MODE.load(Ordering::Relaxed)
}

/// Initialize debug mode from URL parameters
#[cfg(target_arch = "wasm32")]
fn init_debug_from_url() {
    if let Some(window) = web_sys::window() {
        if let Ok(search) = window.location().search() {
            let search_str: &str = &search;
            if search_str.contains("debug=1") || search_str.contains("debug=true") {
                DEBUG_MODE.store(true, Ordering::Relaxed);
                web_sys::console::log_1(&"[Viewer] Debug mode enabled".into());
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn init_debug_from_url() {
    // Native: check env var
    if std::env::var("DEBUG").is_ok() {
        DEBUG_MODE.store(true, Ordering::Relaxed);
    }
}

// Re-exports
pub use camera::{CameraController, CameraPlugin};
pub use hover::{HoverPlugin, HoverState};
pub use loader::{LoadModelRequest, LoaderPlugin, OpenFileDialogRequest};
pub use scene::{AutoFitState, SceneObject, ScenePlugin};
pub use ui::SummaryUiPlugin;

/// Main viewer plugin - combines all subsystems
pub struct FragViewerPlugin;

impl Plugin for FragViewerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ModelScene>()
            .init_resource::<ViewerSettings>()
            .add_plugins((
                CameraPlugin,
                ScenePlugin,
                HoverPlugin,
                LoaderPlugin,
                SummaryUiPlugin,
            ));
    }
}

/// Resource holding the currently loaded model, one at a time
#[derive(Resource, Default)]
pub struct ModelScene {
    /// The loaded model, if any
    pub model: Option<fragview_model::LoadedModel>,
    /// Scene bounds (AABB) after coordinate conversion
    pub bounds: Option<SceneBounds>,
    /// Whether the scene needs respawning
    pub dirty: bool,
}

/// Axis-aligned bounding box for scene
#[derive(Clone, Debug, Default)]
pub struct SceneBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl SceneBounds {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }
}

/// Viewer settings and state
#[derive(Resource)]
pub struct ViewerSettings {
    /// Current theme (affects background color)
    pub theme: Theme,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self { theme: Theme::Dark }
    }
}

/// Theme variants
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn background_color(&self) -> Color {
        match self {
            Theme::Light => Color::srgb(0.95, 0.95, 0.95),
            Theme::Dark => Color::srgb(0.12, 0.12, 0.12),
        }
    }
}

/// Log to browser console (WASM) or stdout (native) - only in debug mode
#[cfg(target_arch = "wasm32")]
pub fn log(msg: &str) {
    if is_debug() {
        web_sys::console::log_1(&msg.into());
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log(msg: &str) {
    if is_debug() {
        println!("{}", msg);
    }
}

/// Log info that should always be shown
#[cfg(target_arch = "wasm32")]
pub fn log_info(msg: &str) {
    web_sys::console::info_1(&msg.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log_info(msg: &str) {
    println!("{}", msg);
}

/// Run the viewer on a canvas element (WASM)
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn run_on_canvas(canvas_selector: &str) {
    console_error_panic_hook::set_once();
    init_debug_from_url();
    log(&format!("[Viewer] Starting on canvas: {}", canvas_selector));

    if session::is_logged_in() {
        log("[Viewer] Session token present");
    }

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Fragview".to_string(),
            canvas: Some(canvas_selector.to_string()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            ..default()
        }),
        ..default()
    }));

    app.add_plugins(FragViewerPlugin);
    app.run();
}

/// Run the viewer in a native window (desktop)
#[cfg(not(target_arch = "wasm32"))]
pub fn run_on_canvas(_canvas_selector: &str) {
    run_native();
}

/// Run native desktop viewer
#[cfg(not(target_arch = "wasm32"))]
pub fn run_native() {
    init_debug_from_url();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Fragview".to_string(),
                resolution: (1280u32, 720u32).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.1, 0.1, 0.15)))
        .add_plugins(FragViewerPlugin)
        .run();
}

#[cfg(target_arch = "wasm32")]
pub fn run_native() {
    run_on_canvas("#fragview-canvas");
}

/// WASM entry point
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn wasm_start() {
    log("[Viewer] wasm_start called");
    run_native();
}
