mod app;
mod calendar;
mod csv_import;
mod deeplink;
mod pages;
mod selection;
mod supabase;
mod types;
mod units;

use leptos::*;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    mount_to_body(app::App);
}
