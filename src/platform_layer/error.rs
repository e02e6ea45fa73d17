use std::fmt;

/*
 * This module defines the error types and `Result` alias used by the
 * platform layer.
 */

// Constructed only by the Windows platform modules, so everything here is
// unused when those are compiled out.
#[derive(Debug)]
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
pub enum PlatformError {
    // An error originating from a native Win32 API call.
    #[cfg(target_os = "windows")]
    Win32(windows::core::Error),
    // Failure during window class registration or window creation.
    WindowCreationFailed(String),
    // Failure during native control creation or manipulation.
    ControlCreationFailed(String),
    // A command referenced a window or control the platform does not know.
    InvalidHandle(String),
    // A general operation failure not covered by other variants.
    OperationFailed(String),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(target_os = "windows")]
            PlatformError::Win32(e) => write!(f, "Win32 API error: {e}"),
            PlatformError::WindowCreationFailed(s) => write!(f, "Window creation failed: {s}"),
            PlatformError::ControlCreationFailed(s) => write!(f, "Control creation failed: {s}"),
            PlatformError::InvalidHandle(s) => write!(f, "Invalid handle: {s}"),
            PlatformError::OperationFailed(s) => write!(f, "Operation failed: {s}"),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(target_os = "windows")]
            PlatformError::Win32(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(target_os = "windows")]
impl From<windows::core::Error> for PlatformError {
    fn from(err: windows::core::Error) -> Self {
        PlatformError::Win32(err)
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;
