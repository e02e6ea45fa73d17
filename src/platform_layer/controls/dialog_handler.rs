/*
 * Implements the modal title input dialog. The dialog template is built in
 * memory (no resource file), shown with `DialogBoxIndirectParamW`, and the
 * outcome is reported back to the application logic as an
 * `AppEvent::InputDialogCompleted`.
 */

use crate::platform_layer::app::Win32ApiInternalState;
use crate::platform_layer::error::{PlatformError, Result as PlatformResult};
use crate::platform_layer::types::{AppEvent, WindowId};
use crate::platform_layer::window_common;

use std::mem::{align_of, size_of};
use std::sync::Arc;

use windows::{
    Win32::{
        Foundation::{FALSE, HWND, LPARAM, TRUE, WPARAM},
        UI::WindowsAndMessaging::*,
    },
    core::HSTRING,
};

/*
 * State shared with the dialog procedure through `dwInitParam`. The proc
 * fills in `input_text` and `confirmed` before the dialog ends.
 */
struct InputDialogData {
    prompt_text: String,
    input_text: String,
    confirmed: bool,
}

fn loword_from_wparam(wparam: WPARAM) -> u16 {
    (wparam.0 & 0xFFFF) as u16
}

/*
 * Dialog procedure: sets the prompt text on WM_INITDIALOG, and captures the
 * edit control's text when OK is pressed.
 */
unsafe extern "system" fn input_dialog_proc(
    hdlg: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> isize {
    match msg {
        WM_INITDIALOG => {
            unsafe {
                SetWindowLongPtrW(hdlg, GWLP_USERDATA, lparam.0);
            }
            let dialog_data = unsafe { &*(lparam.0 as *const InputDialogData) };
            let h_prompt = HSTRING::from(dialog_data.prompt_text.as_str());
            unsafe {
                SetDlgItemTextW(
                    hdlg,
                    window_common::ID_DIALOG_INPUT_PROMPT_STATIC,
                    &h_prompt,
                )
                .unwrap_or_default();
            }
            TRUE.0 as isize
        }
        WM_COMMAND => {
            let command_id = loword_from_wparam(wparam);
            match command_id {
                x if x == IDOK.0 as u16 => {
                    let dialog_data_ptr =
                        unsafe { GetWindowLongPtrW(hdlg, GWLP_USERDATA) } as *mut InputDialogData;
                    if !dialog_data_ptr.is_null() {
                        let dialog_data = unsafe { &mut *dialog_data_ptr };
                        if let Ok(hwnd_edit) =
                            unsafe { GetDlgItem(Some(hdlg), window_common::ID_DIALOG_INPUT_EDIT) }
                        {
                            let mut buffer: [u16; 256] = [0; 256];
                            let len = unsafe { GetWindowTextW(hwnd_edit, &mut buffer) };
                            dialog_data.input_text = if len > 0 {
                                String::from_utf16_lossy(&buffer[..len as usize])
                            } else {
                                String::new()
                            };
                        }
                        dialog_data.confirmed = true;
                    }
                    unsafe {
                        EndDialog(hdlg, IDOK.0 as isize).unwrap_or_default();
                    }
                    TRUE.0 as isize
                }
                x if x == IDCANCEL.0 as u16 => {
                    let dialog_data_ptr =
                        unsafe { GetWindowLongPtrW(hdlg, GWLP_USERDATA) } as *mut InputDialogData;
                    if !dialog_data_ptr.is_null() {
                        unsafe { (*dialog_data_ptr).confirmed = false };
                    }
                    unsafe { EndDialog(hdlg, IDCANCEL.0 as isize).unwrap_or_default() };
                    TRUE.0 as isize
                }
                _ => FALSE.0 as isize,
            }
        }
        _ => FALSE.0 as isize,
    }
}

fn push_word(vec: &mut Vec<u8>, word: u16) {
    vec.extend_from_slice(&word.to_le_bytes());
}

fn push_str_utf16(vec: &mut Vec<u8>, s: &str) {
    for c in s.encode_utf16() {
        push_word(vec, c);
    }
    push_word(vec, 0);
}

fn align_to_dword(vec: &mut Vec<u8>) {
    while vec.len() % align_of::<u32>() != 0 {
        vec.push(0);
    }
}

/*
 * Builds the binary DLGTEMPLATE for the input dialog: a prompt label, a
 * single edit box, and OK and Cancel buttons. Coordinates are dialog units.
 */
fn build_input_dialog_template(template_bytes: &mut Vec<u8>, title_str: &str) {
    let style = DS_CENTER | DS_MODALFRAME | DS_SETFONT;
    let dlg_template = DLGTEMPLATE {
        style: style as u32 | WS_CAPTION.0 | WS_SYSMENU.0 | WS_POPUP.0,
        dwExtendedStyle: 0,
        cdit: 4,
        x: 0,
        y: 0,
        cx: 200,
        cy: 80,
    };
    template_bytes.extend_from_slice(unsafe {
        &*(std::ptr::addr_of!(dlg_template) as *const [u8; size_of::<DLGTEMPLATE>()])
    });

    // Menu (none), class (default), title.
    push_word(template_bytes, 0);
    push_word(template_bytes, 0);
    push_str_utf16(template_bytes, title_str);

    // Font, required by DS_SETFONT.
    push_word(template_bytes, 8);
    push_str_utf16(template_bytes, "MS Shell Dlg");

    align_to_dword(template_bytes);
    let prompt_item = DLGITEMTEMPLATE {
        style: WS_CHILD.0 | WS_VISIBLE.0 | window_common::SS_LEFT.0,
        dwExtendedStyle: 0,
        x: 10,
        y: 10,
        cx: 180,
        cy: 10,
        id: window_common::ID_DIALOG_INPUT_PROMPT_STATIC as u16,
    };
    template_bytes.extend_from_slice(unsafe {
        &*(std::ptr::addr_of!(prompt_item) as *const [u8; size_of::<DLGITEMTEMPLATE>()])
    });
    push_str_utf16(template_bytes, "Static");
    // Actual prompt text is set in WM_INITDIALOG.
    push_str_utf16(template_bytes, "");
    push_word(template_bytes, 0);

    align_to_dword(template_bytes);
    let edit_item = DLGITEMTEMPLATE {
        style: WS_CHILD.0 | WS_VISIBLE.0 | WS_BORDER.0 | ES_AUTOHSCROLL as u32,
        dwExtendedStyle: 0,
        x: 10,
        y: 25,
        cx: 180,
        cy: 12,
        id: window_common::ID_DIALOG_INPUT_EDIT as u16,
    };
    template_bytes.extend_from_slice(unsafe {
        &*(std::ptr::addr_of!(edit_item) as *const [u8; size_of::<DLGITEMTEMPLATE>()])
    });
    push_str_utf16(template_bytes, "Edit");
    push_word(template_bytes, 0);
    push_word(template_bytes, 0);

    align_to_dword(template_bytes);
    let ok_button_item = DLGITEMTEMPLATE {
        style: WS_CHILD.0 | WS_VISIBLE.0 | BS_DEFPUSHBUTTON as u32,
        dwExtendedStyle: 0,
        x: 40,
        y: 50,
        cx: 50,
        cy: 14,
        id: IDOK.0 as u16,
    };
    template_bytes.extend_from_slice(unsafe {
        &*(std::ptr::addr_of!(ok_button_item) as *const [u8; size_of::<DLGITEMTEMPLATE>()])
    });
    push_str_utf16(template_bytes, "Button");
    push_str_utf16(template_bytes, "OK");
    push_word(template_bytes, 0);

    align_to_dword(template_bytes);
    let cancel_button_item = DLGITEMTEMPLATE {
        style: WS_CHILD.0 | WS_VISIBLE.0 | BS_PUSHBUTTON as u32,
        dwExtendedStyle: 0,
        x: 110,
        y: 50,
        cx: 50,
        cy: 14,
        id: IDCANCEL.0 as u16,
    };
    template_bytes.extend_from_slice(unsafe {
        &*(std::ptr::addr_of!(cancel_button_item) as *const [u8; size_of::<DLGITEMTEMPLATE>()])
    });
    push_str_utf16(template_bytes, "Button");
    push_str_utf16(template_bytes, "Cancel");
    push_word(template_bytes, 0);
}

/*
 * Handles the `ShowInputDialog` command. Blocks in the modal dialog, then
 * sends the completion event with the entered text, or `None` if the user
 * cancelled.
 */
pub(crate) fn handle_show_input_dialog_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    title: String,
    prompt: String,
) -> PlatformResult<()> {
    log::debug!("DialogHandler: showing input dialog '{title}'");
    let hwnd_owner = internal_state.with_window_data_read(window_id, |window_data| {
        let hwnd = window_data.this_window_hwnd;
        if hwnd.is_invalid() {
            return Err(PlatformError::InvalidHandle(format!(
                "HWND for {window_id:?} is invalid"
            )));
        }
        Ok(hwnd)
    })?;

    let mut dialog_data = InputDialogData {
        prompt_text: prompt,
        input_text: String::new(),
        confirmed: false,
    };

    let mut template_bytes = Vec::<u8>::new();
    build_input_dialog_template(&mut template_bytes, &title);

    let dialog_result = unsafe {
        DialogBoxIndirectParamW(
            Some(internal_state.h_instance()),
            template_bytes.as_ptr() as *const DLGTEMPLATE,
            Some(hwnd_owner),
            Some(input_dialog_proc),
            LPARAM(&mut dialog_data as *mut _ as isize),
        )
    };

    let text = if dialog_result == IDOK.0 as isize && dialog_data.confirmed {
        Some(dialog_data.input_text)
    } else {
        log::debug!("DialogHandler: input dialog cancelled (result {dialog_result})");
        None
    };

    internal_state.send_event(AppEvent::InputDialogCompleted { window_id, text });
    Ok(())
}
