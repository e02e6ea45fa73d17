/*
 * The platform layer encapsulates all direct interaction with the native UI
 * toolkit. The rest of the application communicates with it exclusively
 * through the platform-agnostic types in `types` (`AppEvent` in,
 * `PlatformCommand` out) so the application logic stays testable without a
 * display.
 *
 * The native Win32 modules are only compiled on Windows; the type and error
 * definitions build everywhere.
 */
pub mod error;
pub mod types;

#[cfg(target_os = "windows")]
mod app;
#[cfg(target_os = "windows")]
mod command_executor;
#[cfg(target_os = "windows")]
mod controls;
#[cfg(target_os = "windows")]
mod window_common;

pub use error::{PlatformError, Result};
pub use types::{
    AppEvent, ListItemDescriptor, ListItemId, PlatformCommand, PlatformEventHandler, WindowConfig,
    WindowId,
};

#[cfg(target_os = "windows")]
pub use app::PlatformInterface;
