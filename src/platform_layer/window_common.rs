use super::app::Win32ApiInternalState;
use super::controls::{editor_handler, list_handler};
use super::error::{PlatformError, Result as PlatformResult};
use super::types::{AppEvent, WindowId};

use windows::{
    Win32::{
        Foundation::{ERROR_INVALID_WINDOW_HANDLE, GetLastError, HWND, LPARAM, LRESULT, WPARAM},
        Graphics::Gdi::HBRUSH,
        UI::{
            Input::KeyboardAndMouse::{VK_BACK, VK_DELETE},
            WindowsAndMessaging::*,
        },
    },
    core::{HSTRING, PCWSTR, w},
};

use std::collections::HashMap;
use std::ffi::c_void;
use std::sync::Arc;

// Classic USER control class names.
pub(crate) const WC_BUTTON: PCWSTR = w!("BUTTON");
pub(crate) const WC_LISTBOX: PCWSTR = w!("LISTBOX");
pub(crate) const WC_EDIT: PCWSTR = w!("EDIT");

// Control IDs used inside the modal input dialog template.
pub(crate) const ID_DIALOG_INPUT_PROMPT_STATIC: i32 = 3001;
pub(crate) const ID_DIALOG_INPUT_EDIT: i32 = 3002;

pub(crate) const SS_LEFT: WINDOW_STYLE = WINDOW_STYLE(0);

// Fixed two-column layout: button above the note list on the left,
// the content editor filling the right side.
const LAYOUT_MARGIN: i32 = 10;
const BUTTON_HEIGHT: i32 = 30;
const LIST_COLUMN_WIDTH: i32 = 220;

/*
 * Holds native data associated with a specific window managed by the platform
 * layer: the window handle, the handles of its child controls, and which of
 * those controls play the list and editor roles.
 */
#[derive(Debug)]
pub(crate) struct NativeWindowData {
    pub(crate) this_window_hwnd: HWND,
    pub(crate) logical_window_id: WindowId,
    pub(crate) control_hwnd_map: HashMap<i32, HWND>,
    pub(crate) list_control_id: Option<i32>,
    pub(crate) editor_control_id: Option<i32>,
}

impl NativeWindowData {
    pub(crate) fn new(logical_window_id: WindowId) -> Self {
        NativeWindowData {
            this_window_hwnd: HWND(std::ptr::null_mut()),
            logical_window_id,
            control_hwnd_map: HashMap::new(),
            list_control_id: None,
            editor_control_id: None,
        }
    }

    pub(crate) fn get_control_hwnd(&self, control_id: i32) -> Option<HWND> {
        self.control_hwnd_map.get(&control_id).copied()
    }
}

/*
 * Context passed to `CreateWindowExW` via `lpCreateParams` so the static
 * WndProc can recover the per-window state.
 */
struct WindowCreationContext {
    internal_state_arc: Arc<Win32ApiInternalState>,
    window_id: WindowId,
}

pub(crate) fn window_class_name(internal_state: &Win32ApiInternalState) -> HSTRING {
    HSTRING::from(format!(
        "{}_MainWindowClass",
        internal_state.app_name_for_class()
    ))
}

/*
 * Loads the application icon from the `image` folder next to the working
 * directory. A missing or unreadable file falls back to the stock
 * application icon; the icon is not load-bearing.
 */
fn load_application_icon() -> PlatformResult<HICON> {
    let icon_path = HSTRING::from("image/icon.ico");
    match unsafe {
        LoadImageW(
            None,
            PCWSTR(icon_path.as_ptr()),
            IMAGE_ICON,
            0,
            0,
            LR_LOADFROMFILE | LR_DEFAULTSIZE,
        )
    } {
        Ok(handle) => Ok(HICON(handle.0)),
        Err(e) => {
            log::warn!("Platform: could not load image/icon.ico ({e}), using stock icon");
            Ok(unsafe { LoadIconW(None, IDI_APPLICATION)? })
        }
    }
}

/*
 * Registers the main window class. Called once during platform
 * initialization, before any windows are created.
 */
pub(crate) fn register_window_class(
    internal_state: &Arc<Win32ApiInternalState>,
) -> PlatformResult<()> {
    let class_name_hstring = window_class_name(internal_state);
    let class_name_pcwstr = PCWSTR(class_name_hstring.as_ptr());

    unsafe {
        let mut wc_existing = WNDCLASSEXW::default();
        if GetClassInfoExW(
            Some(internal_state.h_instance()),
            class_name_pcwstr,
            &mut wc_existing,
        )
        .is_ok()
        {
            // Already registered.
            return Ok(());
        }

        let app_icon = load_application_icon()?;
        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(main_wnd_proc_router),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: internal_state.h_instance(),
            hIcon: app_icon,
            hCursor: LoadCursorW(None, IDC_ARROW)?,
            hbrBackground: HBRUSH((COLOR_WINDOW.0 + 1) as *mut c_void),
            lpszMenuName: PCWSTR::null(),
            lpszClassName: class_name_pcwstr,
            hIconSm: app_icon,
        };

        if RegisterClassExW(&wc) == 0 {
            Err(PlatformError::WindowCreationFailed(format!(
                "RegisterClassExW failed: {:?}",
                GetLastError()
            )))
        } else {
            Ok(())
        }
    }
}

/*
 * Creates the native top-level window. The boxed creation context handed to
 * `lpCreateParams` is claimed by the WndProc in WM_NCCREATE and released in
 * WM_NCDESTROY.
 */
pub(crate) fn create_native_window(
    internal_state_arc: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    width: i32,
    height: i32,
) -> PlatformResult<HWND> {
    let class_name_hstring = window_class_name(internal_state_arc);

    let creation_context = Box::new(WindowCreationContext {
        internal_state_arc: Arc::clone(internal_state_arc),
        window_id,
    });

    unsafe {
        // Untitled at creation; a SetWindowTitle command names the window
        // before it is shown.
        let hwnd = CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            &class_name_hstring,
            PCWSTR::null(),
            WS_OVERLAPPEDWINDOW,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            width,
            height,
            None,
            None,
            Some(internal_state_arc.h_instance()),
            Some(Box::into_raw(creation_context) as *mut c_void),
        )?;
        Ok(hwnd)
    }
}

/*
 * The window procedure router shared by all windows of the registered class.
 * Recovers the `WindowCreationContext` from GWLP_USERDATA and delegates to
 * `Win32ApiInternalState::handle_window_message`.
 */
unsafe extern "system" fn main_wnd_proc_router(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let context_ptr = if msg == WM_NCCREATE {
        let create_struct = unsafe { &*(lparam.0 as *const CREATESTRUCTW) };
        let context_raw_ptr = create_struct.lpCreateParams as *mut WindowCreationContext;
        unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, context_raw_ptr as isize) };
        context_raw_ptr
    } else {
        unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut WindowCreationContext }
    };

    if context_ptr.is_null() {
        // Messages before WM_NCCREATE or after WM_NCDESTROY cleanup.
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    }

    let context = unsafe { &*context_ptr };
    let internal_state_arc = Arc::clone(&context.internal_state_arc);
    let window_id = context.window_id;

    let result = internal_state_arc.handle_window_message(hwnd, msg, wparam, lparam, window_id);

    if msg == WM_NCDESTROY {
        // Final message for this window; reclaim and drop the context.
        let _ = unsafe { Box::from_raw(context_ptr) };
        unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) };
    }

    result
}

#[inline]
pub(crate) fn loword_from_lparam(lparam: LPARAM) -> i32 {
    (lparam.0 & 0xFFFF) as i32
}

#[inline]
pub(crate) fn hiword_from_lparam(lparam: LPARAM) -> i32 {
    ((lparam.0 >> 16) & 0xFFFF) as i32
}

#[inline]
pub(crate) fn loword_from_wparam(wparam: WPARAM) -> u16 {
    (wparam.0 & 0xFFFF) as u16
}

#[inline]
pub(crate) fn hiword_from_wparam(wparam: WPARAM) -> u16 {
    ((wparam.0 >> 16) & 0xFFFF) as u16
}

impl Win32ApiInternalState {
    fn handle_window_message(
        self: &Arc<Self>,
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
        window_id: WindowId,
    ) -> LRESULT {
        match msg {
            WM_SIZE => {
                let width = loword_from_lparam(lparam);
                let height = hiword_from_lparam(lparam);
                if let Err(e) = layout_window_controls(self, window_id, width, height) {
                    log::warn!("Platform: control layout failed on WM_SIZE: {e}");
                }
                self.send_event(AppEvent::WindowResized {
                    window_id,
                    width,
                    height,
                });
            }
            WM_COMMAND => {
                self.handle_wm_command(window_id, wparam, lparam);
            }
            WM_VKEYTOITEM => {
                // Sent by the LBS_WANTKEYBOARDINPUT note list on key presses.
                let vkey = loword_from_wparam(wparam);
                if vkey == VK_DELETE.0 || vkey == VK_BACK.0 {
                    self.send_event(AppEvent::NoteListDeleteKeyPressed { window_id });
                    // -2: no further default processing for this key.
                    return LRESULT(-2);
                }
                return LRESULT(-1);
            }
            WM_CLOSE => {
                log::debug!("Platform: WM_CLOSE for WindowId {window_id:?}");
                // The application logic decides whether the window actually
                // closes, by enqueueing CloseWindow (or not).
                self.send_event(AppEvent::WindowCloseRequestedByUser { window_id });
                return LRESULT(0);
            }
            WM_DESTROY => {
                log::debug!("Platform: WM_DESTROY for WindowId {window_id:?}");
                if let Ok(mut windows_map_guard) = self.active_windows.write() {
                    windows_map_guard.remove(&window_id);
                }
                self.send_event(AppEvent::WindowDestroyed { window_id });
                self.decrement_active_windows();
            }
            _ => {
                return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
            }
        }

        unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
    }

    /*
     * Routes WM_COMMAND notifications from child controls. The control id is
     * in the low word of wparam and the notification code in the high word.
     */
    fn handle_wm_command(self: &Arc<Self>, window_id: WindowId, wparam: WPARAM, lparam: LPARAM) {
        let control_id = loword_from_wparam(wparam) as i32;
        let notification_code = hiword_from_wparam(wparam) as u32;
        let hwnd_control = HWND(lparam.0 as *mut c_void);

        let (list_id, editor_id) = match self.with_window_data_read(window_id, |window_data| {
            Ok((window_data.list_control_id, window_data.editor_control_id))
        }) {
            Ok(ids) => ids,
            Err(_) => return,
        };

        if Some(control_id) == list_id && notification_code == LBN_SELCHANGE {
            let event = list_handler::handle_lbn_selchange(window_id, hwnd_control);
            self.send_event(event);
        } else if Some(control_id) == editor_id && notification_code == EN_CHANGE {
            let event = editor_handler::handle_en_change(window_id, hwnd_control);
            self.send_event(event);
        } else if notification_code == BN_CLICKED {
            self.send_event(AppEvent::ButtonClicked {
                window_id,
                control_id,
            });
        }
    }
}

/*
 * Positions the child controls for the current client size. Handles are
 * collected under the lock, the SetWindowPos calls happen after it is
 * released.
 */
pub(crate) fn layout_window_controls(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    client_width: i32,
    client_height: i32,
) -> PlatformResult<()> {
    struct ControlPlacement {
        hwnd: HWND,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    }

    let mut placements: Vec<ControlPlacement> = Vec::new();

    internal_state.with_window_data_read(window_id, |window_data| {
        let list_x = LAYOUT_MARGIN;
        let list_y = LAYOUT_MARGIN + BUTTON_HEIGHT + LAYOUT_MARGIN;
        let editor_x = LAYOUT_MARGIN + LIST_COLUMN_WIDTH + LAYOUT_MARGIN;

        for (&control_id, &hwnd) in &window_data.control_hwnd_map {
            let placement = if Some(control_id) == window_data.list_control_id {
                ControlPlacement {
                    hwnd,
                    x: list_x,
                    y: list_y,
                    width: LIST_COLUMN_WIDTH,
                    height: (client_height - list_y - LAYOUT_MARGIN).max(0),
                }
            } else if Some(control_id) == window_data.editor_control_id {
                ControlPlacement {
                    hwnd,
                    x: editor_x,
                    y: LAYOUT_MARGIN,
                    width: (client_width - editor_x - LAYOUT_MARGIN).max(0),
                    height: (client_height - 2 * LAYOUT_MARGIN).max(0),
                }
            } else {
                // The create button sits above the list column.
                ControlPlacement {
                    hwnd,
                    x: LAYOUT_MARGIN,
                    y: LAYOUT_MARGIN,
                    width: LIST_COLUMN_WIDTH,
                    height: BUTTON_HEIGHT,
                }
            };
            placements.push(placement);
        }
        Ok(())
    })?;

    for p in placements {
        if let Err(e) = unsafe {
            SetWindowPos(
                p.hwnd,
                None,
                p.x,
                p.y,
                p.width,
                p.height,
                SWP_NOZORDER | SWP_NOACTIVATE,
            )
        } {
            log::warn!("Platform: SetWindowPos failed for control HWND {:?}: {e}", p.hwnd);
        }
    }
    Ok(())
}

/*
 * Applies the layout for the window's current client area. Used after the
 * initial control creation, before the window is shown.
 */
pub(crate) fn layout_window_for_current_size(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
) -> PlatformResult<()> {
    let hwnd = internal_state
        .with_window_data_read(window_id, |window_data| Ok(window_data.this_window_hwnd))?;
    let mut client_rect = windows::Win32::Foundation::RECT::default();
    unsafe { GetClientRect(hwnd, &mut client_rect)? };
    layout_window_controls(
        internal_state,
        window_id,
        client_rect.right - client_rect.left,
        client_rect.bottom - client_rect.top,
    )
}

// --- Helpers called by the command executor ---

pub(crate) fn set_window_title(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    title: &str,
) -> PlatformResult<()> {
    let hwnd = internal_state
        .with_window_data_read(window_id, |window_data| Ok(window_data.this_window_hwnd))?;
    unsafe { SetWindowTextW(hwnd, &HSTRING::from(title))? };
    Ok(())
}

pub(crate) fn show_window(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    show: bool,
) -> PlatformResult<()> {
    let hwnd = internal_state
        .with_window_data_read(window_id, |window_data| Ok(window_data.this_window_hwnd))?;
    let cmd = if show { SW_SHOW } else { SW_HIDE };
    unsafe {
        let _ = ShowWindow(hwnd, cmd);
    }
    Ok(())
}

/*
 * Destroys a native window. Called when the application logic has confirmed
 * a close request. WM_DESTROY then removes the window from the state map and
 * may end the message loop.
 */
pub(crate) fn destroy_native_window(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
) -> PlatformResult<()> {
    let hwnd_to_destroy = internal_state
        .with_window_data_read(window_id, |window_data| Ok(window_data.this_window_hwnd));

    match hwnd_to_destroy {
        Ok(hwnd) if !hwnd.is_invalid() => unsafe {
            if let Err(e) = DestroyWindow(hwnd) {
                let err = GetLastError();
                if err.0 != ERROR_INVALID_WINDOW_HANDLE.0 {
                    log::error!("Platform: DestroyWindow failed for {window_id:?}: {e}");
                }
            }
            Ok(())
        },
        // Already gone, nothing left to do.
        _ => Ok(()),
    }
}
