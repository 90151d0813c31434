//! Model loading - file dialog, drag-and-drop, and the swap lifecycle
//!
//! Exactly one model lives in the scene at a time: a successful load
//! replaces the previous model wholesale, a failed load leaves the scene
//! and summary untouched.

use crate::ModelScene;
use bevy::prelude::*;
#[cfg(not(target_arch = "wasm32"))]
use bevy::tasks::IoTaskPool;
use bevy::tasks::Task;
use fragview_model::ModelSource;
use fragview_parser::StepSource;
use std::path::PathBuf;

/// Plugin for file loading functionality
pub struct LoaderPlugin;

impl Plugin for LoaderPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<OpenFileDialogRequest>()
            .add_message::<LoadFileEvent>()
            .add_message::<LoadModelRequest>()
            .add_message::<ModelLoadedEvent>()
            .init_resource::<FileDialogState>()
            .init_resource::<ModelLoader>()
            .add_systems(
                Update,
                (
                    handle_open_dialog_request,
                    poll_file_dialog,
                    handle_file_drop,
                    read_file_system,
                    #[cfg(target_arch = "wasm32")]
                    drain_wasm_file_queue,
                    handle_load_request,
                ),
            );
    }
}

/// The parser backend behind the `ModelSource` seam
#[derive(Resource)]
pub struct ModelLoader(pub Box<dyn ModelSource>);

impl Default for ModelLoader {
    fn default() -> Self {
        Self(Box::new(StepSource::new()))
    }
}

/// Message to request opening a file dialog
#[derive(Message)]
pub struct OpenFileDialogRequest;

/// State for tracking async file dialog
#[derive(Resource, Default)]
pub struct FileDialogState {
    task: Option<Task<Option<PathBuf>>>,
}

/// Message carrying a file path to read (native)
#[derive(Message)]
pub struct LoadFileEvent {
    pub path: PathBuf,
}

/// Message carrying file content to load into the scene
#[derive(Message)]
pub struct LoadModelRequest {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Message emitted when a model finished loading
#[derive(Message)]
pub struct ModelLoadedEvent {
    pub name: String,
    pub object_count: usize,
}

/// System to handle request to open file dialog (spawns async task)
#[cfg(not(target_arch = "wasm32"))]
fn handle_open_dialog_request(
    mut requests: MessageReader<OpenFileDialogRequest>,
    mut state: ResMut<FileDialogState>,
) {
    for _ in requests.read() {
        // Don't spawn another dialog if one is already pending
        if state.task.is_some() {
            crate::log("[Loader] File dialog already open");
            continue;
        }

        crate::log_info("[Loader] Opening file dialog...");

        let task_pool = IoTaskPool::get();
        let task = task_pool.spawn(async {
            use rfd::AsyncFileDialog;

            let file = AsyncFileDialog::new()
                .add_filter("IFC Files", &["ifc", "IFC"])
                .set_title("Open IFC File")
                .pick_file()
                .await;

            file.map(|f| f.path().to_path_buf())
        });

        state.task = Some(task);
    }
}

/// On WASM the host page feeds files in through `queue_model_file`
#[cfg(target_arch = "wasm32")]
fn handle_open_dialog_request(
    mut _requests: MessageReader<OpenFileDialogRequest>,
    mut _state: ResMut<FileDialogState>,
) {
}

/// System to poll async file dialog result
fn poll_file_dialog(
    mut state: ResMut<FileDialogState>,
    mut load_events: MessageWriter<LoadFileEvent>,
) {
    if let Some(ref mut task) = state.task {
        if let Some(result) = bevy::tasks::block_on(bevy::tasks::poll_once(task)) {
            if let Some(path) = result {
                crate::log_info(&format!("[Loader] File selected: {:?}", path));
                load_events.write(LoadFileEvent { path });
            } else {
                crate::log("[Loader] File dialog cancelled");
            }
            state.task = None;
        }
    }
}

/// System to handle drag-and-drop files
fn handle_file_drop(
    mut file_drag_drop_events: MessageReader<bevy::window::FileDragAndDrop>,
    mut load_events: MessageWriter<LoadFileEvent>,
) {
    for event in file_drag_drop_events.read() {
        if let bevy::window::FileDragAndDrop::DroppedFile { path_buf, .. } = event {
            if let Some(ext) = path_buf.extension() {
                if ext.eq_ignore_ascii_case("ifc") {
                    crate::log_info(&format!("[Loader] File dropped: {:?}", path_buf));
                    load_events.write(LoadFileEvent {
                        path: path_buf.clone(),
                    });
                }
            }
        }
    }
}

/// System to read selected files into byte buffers
fn read_file_system(
    mut events: MessageReader<LoadFileEvent>,
    mut requests: MessageWriter<LoadModelRequest>,
) {
    for event in events.read() {
        let name = event
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "model.ifc".to_string());

        match std::fs::read(&event.path) {
            Ok(bytes) => {
                requests.write(LoadModelRequest { name, bytes });
            }
            Err(e) => {
                crate::log_info(&format!("[Loader] Failed to read {:?}: {}", event.path, e));
            }
        }
    }
}

/// System to parse file content and swap the loaded model.
///
/// On failure the previous model stays in place untouched.
fn handle_load_request(
    mut requests: MessageReader<LoadModelRequest>,
    loader: Res<ModelLoader>,
    mut scene: ResMut<ModelScene>,
    mut loaded_events: MessageWriter<ModelLoadedEvent>,
) {
    for request in requests.read() {
        crate::log_info(&format!(
            "[Loader] Loading '{}' ({} bytes)",
            request.name,
            request.bytes.len()
        ));

        let content = match std::str::from_utf8(&request.bytes) {
            Ok(c) => c,
            Err(e) => {
                crate::log_info(&format!("[Loader] '{}' is not UTF-8: {}", request.name, e));
                continue;
            }
        };

        match loader.0.load(&request.name, content) {
            Ok(model) => {
                let object_count = model.object_count();
                crate::log_info(&format!(
                    "[Loader] Loaded '{}': {} objects, {} categories",
                    model.name,
                    object_count,
                    model.categories().len()
                ));

                scene.model = Some(model);
                scene.dirty = true;

                loaded_events.write(ModelLoadedEvent {
                    name: request.name.clone(),
                    object_count,
                });
            }
            Err(e) => {
                crate::log_info(&format!("[Loader] Error loading '{}': {}", request.name, e));
            }
        }
    }
}

// ============================================================================
// WASM file input bridge
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod wasm_files {
    use std::sync::Mutex;

    static PENDING_FILES: Mutex<Vec<(String, Vec<u8>)>> = Mutex::new(Vec::new());

    /// Called from JS with the bytes of a user-selected file
    #[wasm_bindgen::prelude::wasm_bindgen]
    pub fn queue_model_file(name: &str, bytes: &[u8]) {
        if let Ok(mut pending) = PENDING_FILES.lock() {
            pending.push((name.to_string(), bytes.to_vec()));
        }
    }

    pub fn drain() -> Vec<(String, Vec<u8>)> {
        PENDING_FILES
            .lock()
            .map(|mut p| std::mem::take(&mut *p))
            .unwrap_or_default()
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_files::queue_model_file;

/// System draining files queued by the host page
#[cfg(target_arch = "wasm32")]
fn drain_wasm_file_queue(mut requests: MessageWriter<LoadModelRequest>) {
    for (name, bytes) in wasm_files::drain() {
        crate::log_info(&format!("[Loader] File received from page: {}", name));
        requests.write(LoadModelRequest { name, bytes });
    }
}
