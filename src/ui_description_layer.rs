use crate::app_logic::ui_constants;
use crate::platform_layer::{PlatformCommand, WindowId};

/*
 * This layer is responsible for describing the static structure of the UI
 * declaratively. It generates the `PlatformCommand`s that build the main
 * window's controls, without itself touching any native API.
 */

pub const MAIN_WINDOW_TITLE: &str = "Quick note";

/*
 * Generates the commands that describe the main window's static layout: the
 * window title, the create button, the note list and the (initially hidden)
 * content editor, followed by the signal that the static setup is complete.
 *
 * The commands are executed by the platform layer in order.
 */
pub fn describe_main_window_layout(window_id: WindowId) -> Vec<PlatformCommand> {
    vec![
        PlatformCommand::SetWindowTitle {
            window_id,
            title: MAIN_WINDOW_TITLE.to_string(),
        },
        PlatformCommand::CreateButton {
            window_id,
            control_id: ui_constants::ID_BUTTON_CREATE_NOTE,
            text: "Create a note".to_string(),
        },
        PlatformCommand::CreateNoteList {
            window_id,
            control_id: ui_constants::ID_LISTBOX_NOTES,
        },
        PlatformCommand::CreateEditor {
            window_id,
            control_id: ui_constants::ID_EDIT_CONTENT,
        },
        PlatformCommand::SignalMainWindowUISetupComplete { window_id },
    ]
}
