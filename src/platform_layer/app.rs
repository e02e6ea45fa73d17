use super::command_executor;
use super::error::{PlatformError, Result as PlatformResult};
use super::types::{AppEvent, PlatformCommand, PlatformEventHandler, WindowConfig, WindowId};
use super::window_common;

use windows::{
    Win32::{
        Foundation::{GetLastError, HINSTANCE},
        System::LibraryLoader::GetModuleHandleW,
        UI::WindowsAndMessaging::{
            DispatchMessageW, GetMessageW, MSG, PostQuitMessage, TranslateMessage,
        },
    },
    core::PCWSTR,
};

use std::collections::HashMap;
use std::sync::{
    Arc, Mutex, RwLock, Weak,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

/*
 * Internal state for the Win32 platform layer.
 *
 * Holds the Win32 handles and mappings required to manage the application's
 * lifecycle and UI elements. It is shared with the WndProc through the
 * per-window creation context.
 */
pub(crate) struct Win32ApiInternalState {
    h_instance: HINSTANCE,
    next_window_id_counter: AtomicUsize,
    // Maps platform-agnostic `WindowId` to native window data.
    pub(crate) active_windows: RwLock<HashMap<WindowId, window_common::NativeWindowData>>,
    // Weak so the handler can own other references to the platform without a
    // cycle.
    event_handler: Mutex<Option<Weak<Mutex<dyn PlatformEventHandler>>>>,
    app_name_for_class: String,
    active_windows_count: AtomicUsize,
    is_quitting: AtomicBool,
}

impl Win32ApiInternalState {
    fn new(app_name_for_class: String) -> PlatformResult<Arc<Self>> {
        let h_instance = HINSTANCE(unsafe { GetModuleHandleW(PCWSTR::null())? }.0);
        Ok(Arc::new(Self {
            h_instance,
            next_window_id_counter: AtomicUsize::new(1),
            active_windows: RwLock::new(HashMap::new()),
            event_handler: Mutex::new(None),
            app_name_for_class,
            active_windows_count: AtomicUsize::new(0),
            is_quitting: AtomicBool::new(false),
        }))
    }

    pub(crate) fn h_instance(&self) -> HINSTANCE {
        self.h_instance
    }

    pub(crate) fn app_name_for_class(&self) -> &str {
        &self.app_name_for_class
    }

    pub(crate) fn generate_window_id(&self) -> WindowId {
        WindowId(self.next_window_id_counter.fetch_add(1, Ordering::Relaxed))
    }

    /*
     * Runs a closure against the `NativeWindowData` of a window under the
     * read lock. Callers that need to make Win32 calls which can re-enter
     * the WndProc should extract the handles they need and return, so the
     * lock is not held across the API call.
     */
    pub(crate) fn with_window_data_read<F, R>(&self, window_id: WindowId, f: F) -> PlatformResult<R>
    where
        F: FnOnce(&window_common::NativeWindowData) -> PlatformResult<R>,
    {
        let windows_guard = self.active_windows.read().map_err(|_| {
            PlatformError::OperationFailed("Failed to acquire read lock on windows map".into())
        })?;
        let window_data = windows_guard.get(&window_id).ok_or_else(|| {
            PlatformError::InvalidHandle(format!("WindowId {window_id:?} not found"))
        })?;
        f(window_data)
    }

    pub(crate) fn with_window_data_write<F, R>(
        &self,
        window_id: WindowId,
        f: F,
    ) -> PlatformResult<R>
    where
        F: FnOnce(&mut window_common::NativeWindowData) -> PlatformResult<R>,
    {
        let mut windows_guard = self.active_windows.write().map_err(|_| {
            PlatformError::OperationFailed("Failed to acquire write lock on windows map".into())
        })?;
        let window_data = windows_guard.get_mut(&window_id).ok_or_else(|| {
            PlatformError::InvalidHandle(format!("WindowId {window_id:?} not found"))
        })?;
        f(window_data)
    }

    /*
     * Delivers an event to the application logic and then executes every
     * command it enqueued in response. The handler lock is released before
     * command execution: executing a command can make Win32 calls that
     * re-enter the WndProc synchronously, which would call back into here.
     */
    pub(crate) fn send_event(self: &Arc<Self>, event: AppEvent) {
        let handler_arc = match self
            .event_handler
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().and_then(|weak| weak.upgrade()))
        {
            Some(h) => h,
            None => {
                log::warn!("Platform: event handler unavailable, dropping {event:?}");
                return;
            }
        };

        let mut commands = Vec::new();
        match handler_arc.lock() {
            Ok(mut handler_guard) => {
                handler_guard.handle_event(event);
                while let Some(cmd) = handler_guard.try_dequeue_command() {
                    commands.push(cmd);
                }
            }
            Err(_) => {
                log::error!("Platform: failed to lock event handler for {event:?}");
                return;
            }
        }

        self.execute_commands(commands);
    }

    pub(crate) fn execute_commands(self: &Arc<Self>, commands: Vec<PlatformCommand>) {
        for command in commands {
            log::trace!("Platform: executing {command:?}");
            if let Err(e) = command_executor::execute_platform_command(self, command) {
                log::error!("Platform: command execution failed: {e}");
            }
        }
    }

    /*
     * Decrements the active window count and posts WM_QUIT when the last
     * window goes away.
     */
    pub(crate) fn decrement_active_windows(&self) {
        let prev_count = self.active_windows_count.fetch_sub(1, Ordering::Relaxed);
        if prev_count == 1 {
            log::debug!("Platform: last active window destroyed, posting WM_QUIT");
            unsafe { PostQuitMessage(0) };
        }
    }

    /*
     * Marks the application as quitting. Posts WM_QUIT immediately if no
     * windows remain.
     */
    pub(crate) fn signal_quit_intent(&self) {
        self.is_quitting.store(true, Ordering::Relaxed);
        if self.active_windows_count.load(Ordering::Relaxed) == 0 {
            unsafe { PostQuitMessage(0) };
        }
    }
}

// The primary interface to the Win32 platform abstraction layer.
pub struct PlatformInterface {
    internal_state: Arc<Win32ApiInternalState>,
}

impl PlatformInterface {
    pub fn new(app_name_for_class: String) -> PlatformResult<Self> {
        let internal_state = Win32ApiInternalState::new(app_name_for_class)?;
        window_common::register_window_class(&internal_state)?;
        Ok(PlatformInterface { internal_state })
    }

    /*
     * Creates a native top-level window, initially hidden. The window data
     * entry is inserted before `CreateWindowExW` so messages arriving during
     * creation find it in the map.
     */
    pub fn create_window(&self, config: WindowConfig) -> PlatformResult<WindowId> {
        let window_id = self.internal_state.generate_window_id();

        {
            let mut windows_guard = self.internal_state.active_windows.write().map_err(|_| {
                PlatformError::OperationFailed(
                    "Failed to lock windows map for preliminary insert".into(),
                )
            })?;
            windows_guard.insert(window_id, window_common::NativeWindowData::new(window_id));
        }

        let hwnd = match window_common::create_native_window(
            &self.internal_state,
            window_id,
            config.width,
            config.height,
        ) {
            Ok(h) => h,
            Err(e) => {
                if let Ok(mut windows_guard) = self.internal_state.active_windows.write() {
                    windows_guard.remove(&window_id);
                }
                return Err(e);
            }
        };

        self.internal_state
            .with_window_data_write(window_id, |window_data| {
                window_data.this_window_hwnd = hwnd;
                Ok(())
            })?;

        self.internal_state
            .active_windows_count
            .fetch_add(1, Ordering::Relaxed);
        log::debug!("Platform: created native window {hwnd:?} for {window_id:?}");
        Ok(window_id)
    }

    /*
     * Enters the message loop. Commands already enqueued by the handler
     * (the initial UI description) are executed before the first
     * `GetMessageW` call.
     */
    pub fn run(&self, event_handler: Arc<Mutex<dyn PlatformEventHandler>>) -> PlatformResult<()> {
        if let Ok(mut handler_slot) = self.internal_state.event_handler.lock() {
            *handler_slot = Some(Arc::downgrade(&event_handler));
        }

        let initial_commands = {
            let mut commands = Vec::new();
            if let Ok(mut handler_guard) = event_handler.lock() {
                while let Some(cmd) = handler_guard.try_dequeue_command() {
                    commands.push(cmd);
                }
            }
            commands
        };
        self.internal_state.execute_commands(initial_commands);

        unsafe {
            let mut msg = MSG::default();
            loop {
                let result = GetMessageW(&mut msg, None, 0, 0);
                if result.0 > 0 {
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                } else if result.0 == 0 {
                    log::debug!("Platform: WM_QUIT received, leaving message loop");
                    break;
                } else {
                    let last_error = GetLastError();
                    return Err(PlatformError::OperationFailed(format!(
                        "GetMessageW failed: {last_error:?}"
                    )));
                }
            }
        }

        if let Ok(mut handler_guard) = event_handler.lock() {
            handler_guard.on_quit();
        }
        if let Ok(mut handler_slot) = self.internal_state.event_handler.lock() {
            *handler_slot = None;
        }
        Ok(())
    }
}
