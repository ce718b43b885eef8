use briefify_frontend::App;
use briefify_frontend::config::AppConfig;
use briefify_frontend::logging;
use leptos::prelude::*;

// Use lol_alloc as the global allocator for smaller WASM size
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

pub fn main() {
    console_error_panic_hook::set_once();
    logging::init(AppConfig::from_build_env().log_level);
    log::info!("[App] Starting Briefify");
    mount_to_body(App);
}
