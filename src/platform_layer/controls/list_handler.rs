/*
 * Encapsulates Win32 operations for the note list, a classic LISTBOX
 * control. Rows carry the logical `ListItemId` as per-item data so the
 * application logic never deals in row indices.
 */

use crate::platform_layer::app::Win32ApiInternalState;
use crate::platform_layer::error::{PlatformError, Result as PlatformResult};
use crate::platform_layer::types::{AppEvent, ListItemDescriptor, ListItemId, WindowId};
use crate::platform_layer::window_common::WC_LISTBOX;

use std::sync::Arc;
use windows::Win32::{
    Foundation::{HWND, LPARAM, WPARAM},
    UI::WindowsAndMessaging::{
        CreateWindowExW, DestroyWindow, HMENU, LB_ADDSTRING, LB_DELETESTRING, LB_ERR, LB_GETCOUNT,
        LB_GETCURSEL, LB_GETITEMDATA, LB_RESETCONTENT, LB_SETITEMDATA, LBS_NOINTEGRALHEIGHT,
        LBS_NOTIFY, LBS_WANTKEYBOARDINPUT, SendMessageW, WINDOW_EX_STYLE, WINDOW_STYLE, WS_BORDER,
        WS_CHILD, WS_TABSTOP, WS_VISIBLE, WS_VSCROLL,
    },
};
use windows::core::HSTRING;

/*
 * Creates the LISTBOX control. LBS_WANTKEYBOARDINPUT makes the parent
 * receive WM_VKEYTOITEM for key presses, which is how the Delete and
 * Backspace shortcuts reach the application logic.
 */
pub(crate) fn handle_create_note_list_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    control_id: i32,
) -> PlatformResult<()> {
    log::debug!("ListHandler: creating note list (id {control_id}) in {window_id:?}");

    let hwnd_parent = internal_state.with_window_data_read(window_id, |window_data| {
        if window_data.control_hwnd_map.contains_key(&control_id) {
            return Err(PlatformError::ControlCreationFailed(format!(
                "Control id {control_id} already exists in {window_id:?}"
            )));
        }
        Ok(window_data.this_window_hwnd)
    })?;

    let style = WS_CHILD
        | WS_VISIBLE
        | WS_BORDER
        | WS_VSCROLL
        | WS_TABSTOP
        | WINDOW_STYLE((LBS_NOTIFY | LBS_WANTKEYBOARDINPUT | LBS_NOINTEGRALHEIGHT) as u32);
    let hwnd_list: HWND = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            WC_LISTBOX,
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
        window_data.control_hwnd_map.insert(control_id, hwnd_list);
        window_data.list_control_id = Some(control_id);
        Ok(())
    });
    if insert_result.is_err() {
        unsafe {
            let _ = DestroyWindow(hwnd_list);
        }
    }
    insert_result
}

fn list_hwnd(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
) -> PlatformResult<HWND> {
    internal_state.with_window_data_read(window_id, |window_data| {
        window_data
            .list_control_id
            .and_then(|id| window_data.get_control_hwnd(id))
            .ok_or_else(|| {
                PlatformError::InvalidHandle(format!("No note list control in {window_id:?}"))
            })
    })
}

fn append_item(hwnd_list: HWND, item: &ListItemDescriptor) -> PlatformResult<()> {
    let text_wide: Vec<u16> = item.text.encode_utf16().chain(std::iter::once(0)).collect();
    let index = unsafe {
        SendMessageW(
            hwnd_list,
            LB_ADDSTRING,
            Some(WPARAM(0)),
            Some(LPARAM(text_wide.as_ptr() as isize)),
        )
    };
    if index.0 == LB_ERR as isize {
        return Err(PlatformError::OperationFailed(format!(
            "LB_ADDSTRING failed for item '{}'",
            item.text
        )));
    }
    unsafe {
        SendMessageW(
            hwnd_list,
            LB_SETITEMDATA,
            Some(WPARAM(index.0 as usize)),
            Some(LPARAM(item.id.0 as isize)),
        );
    }
    Ok(())
}

pub(crate) fn handle_populate_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    items: Vec<ListItemDescriptor>,
) -> PlatformResult<()> {
    let hwnd_list = list_hwnd(internal_state, window_id)?;
    unsafe {
        SendMessageW(hwnd_list, LB_RESETCONTENT, Some(WPARAM(0)), Some(LPARAM(0)));
    }
    for item in &items {
        append_item(hwnd_list, item)?;
    }
    log::debug!(
        "ListHandler: populated note list in {window_id:?} with {} item(s)",
        items.len()
    );
    Ok(())
}

pub(crate) fn handle_add_item_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    item: ListItemDescriptor,
) -> PlatformResult<()> {
    let hwnd_list = list_hwnd(internal_state, window_id)?;
    append_item(hwnd_list, &item)
}

fn find_item_index(hwnd_list: HWND, item_id: ListItemId) -> Option<usize> {
    let count = unsafe { SendMessageW(hwnd_list, LB_GETCOUNT, Some(WPARAM(0)), Some(LPARAM(0))) };
    if count.0 < 0 {
        return None;
    }
    for index in 0..count.0 as usize {
        let data = unsafe {
            SendMessageW(
                hwnd_list,
                LB_GETITEMDATA,
                Some(WPARAM(index)),
                Some(LPARAM(0)),
            )
        };
        if data.0 as u64 == item_id.0 {
            return Some(index);
        }
    }
    None
}

pub(crate) fn handle_remove_item_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    item_id: ListItemId,
) -> PlatformResult<()> {
    let hwnd_list = list_hwnd(internal_state, window_id)?;
    let index = find_item_index(hwnd_list, item_id).ok_or_else(|| {
        PlatformError::OperationFailed(format!(
            "List item {item_id:?} not found in {window_id:?}"
        ))
    })?;
    unsafe {
        SendMessageW(
            hwnd_list,
            LB_DELETESTRING,
            Some(WPARAM(index)),
            Some(LPARAM(0)),
        );
    }
    log::debug!("ListHandler: removed item {item_id:?} (row {index}) in {window_id:?}");
    Ok(())
}

/*
 * Translates an LBN_SELCHANGE notification into a selection event. LB_ERR
 * from LB_GETCURSEL means no row is selected.
 */
pub(crate) fn handle_lbn_selchange(window_id: WindowId, hwnd_list: HWND) -> AppEvent {
    let current = unsafe { SendMessageW(hwnd_list, LB_GETCURSEL, Some(WPARAM(0)), Some(LPARAM(0))) };
    let item_id = if current.0 == LB_ERR as isize {
        None
    } else {
        let data = unsafe {
            SendMessageW(
                hwnd_list,
                LB_GETITEMDATA,
                Some(WPARAM(current.0 as usize)),
                Some(LPARAM(0)),
            )
        };
        Some(ListItemId(data.0 as u64))
    };
    AppEvent::NoteListSelectionChanged { window_id, item_id }
}
