/// Group Organizer - Chrome Extension for archiving tab groups
/// Built with Rust + WASM + Yew

mod browser;
mod group_data;
mod group_key;
mod sync;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export core domain functions for JavaScript access
#[wasm_bindgen]
pub fn folder_color(folder_title: &str) -> String {
    group_key::GroupKey::decode(folder_title).color.to_string()
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
