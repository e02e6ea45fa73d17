/*
 * This module defines the core data types used for communication between the
 * application logic and the platform layer: identifiers for windows and list
 * items, the window configuration, platform-agnostic event types (`AppEvent`),
 * commands for the platform layer (`PlatformCommand`), and the
 * `PlatformEventHandler` trait that the application logic must implement.
 */

// An opaque identifier for a native window, managed by the platform layer.
//
// The application logic layer uses this ID to refer to specific windows
// when sending commands or receiving events, without needing to know about
// native window handles like HWND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub(crate) usize);

// An opaque identifier for an entry in the note list control.
//
// This ID is generated and managed by the application logic layer and used
// to uniquely identify list rows in commands and events. The platform layer
// stores it as per-item data on the native list control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListItemId(pub u64);

// Configuration for creating a new native window.
//
// Provided by the application logic to the platform layer, describing
// the desired properties of a window without specifying native details.
// The window is created untitled and hidden; the logic layer sets the
// title with `PlatformCommand::SetWindowTitle` before showing it.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub width: i32,
    pub height: i32,
}

// Describes a single row to be displayed in the note list control.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItemDescriptor {
    pub id: ListItemId,
    pub text: String,
}

// --- Events from Platform to App Logic ---

/*
 * Represents platform-agnostic UI events generated by the native toolkit.
 *
 * The platform layer translates native OS events into these types and
 * sends them to the application logic layer for handling.
 */
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    WindowCloseRequestedByUser {
        window_id: WindowId,
    },
    // Signals that a window has been resized.
    WindowResized {
        window_id: WindowId,
        width: i32,
        height: i32,
    },
    // Signals that a window and its native resources have been destroyed.
    // The `WindowId` should be considered invalid after this event.
    WindowDestroyed {
        window_id: WindowId,
    },
    // Signals that a button was clicked.
    ButtonClicked {
        window_id: WindowId,
        control_id: i32,
    },
    // Signals that the selection in the note list changed. `None` means the
    // list no longer has a selected row.
    NoteListSelectionChanged {
        window_id: WindowId,
        item_id: Option<ListItemId>,
    },
    // Signals that the content editor's text changed (fired on every edit,
    // including programmatic `SetEditorText`).
    EditorContentChanged {
        window_id: WindowId,
        text: String,
    },
    // Signals that Delete or Backspace was pressed while the note list had
    // keyboard focus.
    NoteListDeleteKeyPressed {
        window_id: WindowId,
    },
    // Signals the result of the modal title input dialog. `None` means the
    // user cancelled.
    InputDialogCompleted {
        window_id: WindowId,
        text: Option<String>,
    },
    // Signals that the initial static UI setup for the main window is
    // complete and the window can be populated and shown.
    MainWindowUISetupComplete {
        window_id: WindowId,
    },
}

// --- Commands from App Logic to Platform ---

// Represents platform-agnostic commands sent from the application logic to
// the platform layer.
//
// These commands instruct the platform layer to perform specific actions on
// native UI elements.
#[derive(Debug, Clone)]
pub enum PlatformCommand {
    SetWindowTitle {
        window_id: WindowId,
        title: String,
    },
    ShowWindow {
        window_id: WindowId,
    },
    CloseWindow {
        window_id: WindowId,
    },
    QuitApplication,

    CreateButton {
        window_id: WindowId,
        control_id: i32,
        text: String,
    },
    CreateNoteList {
        window_id: WindowId,
        control_id: i32,
    },
    // The editor is created hidden; it becomes visible only while a list
    // row is selected.
    CreateEditor {
        window_id: WindowId,
        control_id: i32,
    },

    PopulateNoteList {
        window_id: WindowId,
        items: Vec<ListItemDescriptor>,
    },
    AddNoteListItem {
        window_id: WindowId,
        item: ListItemDescriptor,
    },
    RemoveNoteListItem {
        window_id: WindowId,
        item_id: ListItemId,
    },

    SetEditorVisible {
        window_id: WindowId,
        visible: bool,
    },
    SetEditorText {
        window_id: WindowId,
        text: String,
    },

    ShowInputDialog {
        window_id: WindowId,
        title: String,
        prompt: String,
    },

    // Signals to the platform layer that all initial UI description commands
    // for the main window have been enqueued.
    SignalMainWindowUISetupComplete {
        window_id: WindowId,
    },
}

// --- Trait for App Logic to Handle Events ---

// A trait to be implemented by the application logic layer to handle UI
// events.
//
// The platform layer calls `handle_event` to notify the application logic
// about user interactions or system events; the implementor enqueues
// `PlatformCommand`s which the platform layer then drains via
// `try_dequeue_command`.
pub trait PlatformEventHandler: Send + Sync + 'static {
    // Called by the platform layer when a native UI event has been
    // processed. The implementor should handle the event and enqueue
    // `PlatformCommand`s for the platform layer to execute.
    fn handle_event(&mut self, event: AppEvent);

    // Called by the platform layer when the application is about to exit its
    // main loop.
    fn on_quit(&mut self) {}

    // Attempts to dequeue a single `PlatformCommand` from the internal
    // queue. This is called by the platform layer's run loop after every
    // delivered event.
    fn try_dequeue_command(&mut self) -> Option<PlatformCommand>;
}
