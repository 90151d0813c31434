//! Fragview desktop viewer
//!
//! Opens a native window; drop an IFC file onto it or use the Open
//! button. The web build enters through `wasm_start` instead.

fn main() {
    fragview_viewer::run_native();
}
