/*
 * Encapsulates Win32 operations for the note content editor, a multiline
 * EDIT control. The control is created hidden; the application logic shows
 * it while a note is selected.
 */

use crate::platform_layer::app::Win32ApiInternalState;
use crate::platform_layer::error::{PlatformError, Result as PlatformResult};
use crate::platform_layer::types::{AppEvent, WindowId};
use crate::platform_layer::window_common::WC_EDIT;

use std::sync::Arc;
use windows::Win32::{
    Foundation::HWND,
    UI::WindowsAndMessaging::{
        CreateWindowExW, DestroyWindow, ES_AUTOVSCROLL, ES_MULTILINE, ES_WANTRETURN,
        GetWindowTextLengthW, GetWindowTextW, HMENU, SW_HIDE, SW_SHOW, SetWindowTextW, ShowWindow,
        WINDOW_EX_STYLE, WINDOW_STYLE, WS_BORDER, WS_CHILD, WS_TABSTOP, WS_VSCROLL,
    },
};
use windows::core::HSTRING;

pub(crate) fn handle_create_editor_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    control_id: i32,
) -> PlatformResult<()> {
    log::debug!("EditorHandler: creating editor (id {control_id}) in {window_id:?}");

    let hwnd_parent = internal_state.with_window_data_read(window_id, |window_data| {
        if window_data.control_hwnd_map.contains_key(&control_id) {
            return Err(PlatformError::ControlCreationFailed(format!(
                "Control id {control_id} already exists in {window_id:?}"
            )));
        }
        Ok(window_data.this_window_hwnd)
    })?;

    // No WS_VISIBLE: the editor only appears once a note is selected.
    let style = WS_CHILD
        | WS_BORDER
        | WS_VSCROLL
        | WS_TABSTOP
        | WINDOW_STYLE((ES_MULTILINE | ES_AUTOVSCROLL | ES_WANTRETURN) as u32);
    let hwnd_edit: HWND = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            WC_EDIT,
            &HSTRING::new(),
            style,
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
        window_data.control_hwnd_map.insert(control_id, hwnd_edit);
        window_data.editor_control_id = Some(control_id);
        Ok(())
    });
    if insert_result.is_err() {
        unsafe {
            let _ = DestroyWindow(hwnd_edit);
        }
    }
    insert_result
}

fn editor_hwnd(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
) -> PlatformResult<HWND> {
    internal_state.with_window_data_read(window_id, |window_data| {
        window_data
            .editor_control_id
            .and_then(|id| window_data.get_control_hwnd(id))
            .ok_or_else(|| {
                PlatformError::InvalidHandle(format!("No editor control in {window_id:?}"))
            })
    })
}

pub(crate) fn handle_set_visible_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    visible: bool,
) -> PlatformResult<()> {
    let hwnd_edit = editor_hwnd(internal_state, window_id)?;
    let cmd = if visible { SW_SHOW } else { SW_HIDE };
    unsafe {
        let _ = ShowWindow(hwnd_edit, cmd);
    }
    Ok(())
}

/*
 * Replaces the editor text. The control answers with an EN_CHANGE
 * notification of its own, which the application logic treats as a
 * redundant save of unchanged content.
 */
pub(crate) fn handle_set_text_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    text: String,
) -> PlatformResult<()> {
    let hwnd_edit = editor_hwnd(internal_state, window_id)?;
    unsafe { SetWindowTextW(hwnd_edit, &HSTRING::from(text.as_str()))? };
    Ok(())
}

/*
 * Translates an EN_CHANGE notification into a content-changed event
 * carrying the full editor text.
 */
pub(crate) fn handle_en_change(window_id: WindowId, hwnd_edit: HWND) -> AppEvent {
    let length = unsafe { GetWindowTextLengthW(hwnd_edit) };
    let text = if length > 0 {
        let mut buffer: Vec<u16> = vec![0; length as usize + 1];
        let copied = unsafe { GetWindowTextW(hwnd_edit, &mut buffer) };
        String::from_utf16_lossy(&buffer[..copied.max(0) as usize])
    } else {
        String::new()
    };
    AppEvent::EditorContentChanged { window_id, text }
}
