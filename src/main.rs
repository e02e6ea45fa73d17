// Keep the console window out of release builds on Windows.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_logic;
mod core;
mod platform_layer;
mod ui_description_layer;

use std::process::ExitCode;
use std::sync::Once;

const APP_NAME: &str = "QuickNote";

static INIT_LOGGING: Once = Once::new();

/*
 * Initializes the `simplelog` backend for the `log` facade. Guarded by a
 * `Once` so tests that call it repeatedly do not trip the double-init error.
 */
fn initialize_logging() {
    INIT_LOGGING.call_once(|| {
        let log_level = if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        let config = simplelog::ConfigBuilder::new()
            .set_time_format_rfc3339()
            .build();
        if let Err(e) = simplelog::TermLogger::init(
            log_level,
            config,
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        ) {
            eprintln!("Logger initialization failed: {e}");
        }
    });
}

#[cfg(target_os = "windows")]
fn run_app() -> ExitCode {
    use crate::app_logic::MyAppLogic;
    use crate::core::CoreNoteStore;
    use crate::platform_layer::{PlatformInterface, WindowConfig};
    use std::sync::{Arc, Mutex};

    let note_store = match CoreNoteStore::new(APP_NAME) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::error!("Failed to open the note store: {e}");
            return ExitCode::FAILURE;
        }
    };
    let app_logic = Arc::new(Mutex::new(MyAppLogic::new(note_store)));

    let platform = match PlatformInterface::new(APP_NAME.to_string()) {
        Ok(p) => p,
        Err(e) => {
            log::error!("Failed to initialize the platform layer: {e}");
            return ExitCode::FAILURE;
        }
    };
    let window_id = match platform.create_window(WindowConfig {
        width: 900,
        height: 600,
    }) {
        Ok(id) => id,
        Err(e) => {
            log::error!("Failed to create the main window: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Ok(mut logic) = app_logic.lock() {
        logic.on_main_window_created(window_id);
    }

    match platform.run(app_logic) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("The main event loop failed: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(target_os = "windows"))]
fn run_app() -> ExitCode {
    log::error!("{APP_NAME} has no UI backend for this platform; only Windows is supported");
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    initialize_logging();
    log::info!("{APP_NAME} starting");
    run_app()
}
