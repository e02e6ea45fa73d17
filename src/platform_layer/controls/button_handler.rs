/*
 * Encapsulates Win32 operations for push button controls.
 */

use crate::platform_layer::app::Win32ApiInternalState;
use crate::platform_layer::error::{PlatformError, Result as PlatformResult};
use crate::platform_layer::types::WindowId;
use crate::platform_layer::window_common::WC_BUTTON;

use std::sync::Arc;
use windows::Win32::{
    Foundation::HWND,
    UI::WindowsAndMessaging::{
        BS_PUSHBUTTON, CreateWindowExW, DestroyWindow, HMENU, WINDOW_EX_STYLE, WINDOW_STYLE,
        WS_CHILD, WS_TABSTOP, WS_VISIBLE,
    },
};
use windows::core::HSTRING;

/*
 * Creates a native push button and registers its HWND in the window's
 * `NativeWindowData`. Position and size are assigned by the layout pass.
 */
pub(crate) fn handle_create_button_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    control_id: i32,
    text: String,
) -> PlatformResult<()> {
    log::debug!(
        "ButtonHandler: creating button '{text}' (id {control_id}) in {window_id:?}"
    );

    let hwnd_parent = internal_state.with_window_data_read(window_id, |window_data| {
        if window_data.control_hwnd_map.contains_key(&control_id) {
            return Err(PlatformError::ControlCreationFailed(format!(
                "Control id {control_id} already exists in {window_id:?}"
            )));
        }
        if window_data.this_window_hwnd.is_invalid() {
            return Err(PlatformError::InvalidHandle(format!(
                "Parent HWND invalid for CreateButton in {window_id:?}"
            )));
        }
        Ok(window_data.this_window_hwnd)
    })?;

    let hwnd_button: HWND = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            WC_BUTTON,
            &HSTRING::from(text.as_str()),
            WS_CHILD | WS_VISIBLE | WS_TABSTOP | WINDOW_STYLE(BS_PUSHBUTTON as u32),
            0,
            0,
            10,
            10,
            Some(hwnd_parent),
            Some(HMENU(control_id as *mut _)),
            Some(internal_state.h_instance()),
            None,
        )?
    };

    let insert_result = internal_state.with_window_data_write(window_id, |window_data| {
        window_data.control_hwnd_map.insert(control_id, hwnd_button);
        Ok(())
    });
    if insert_result.is_err() {
        // Window vanished between the two locks; do not leak the control.
        unsafe {
            let _ = DestroyWindow(hwnd_button);
        }
    }
    insert_result
}
