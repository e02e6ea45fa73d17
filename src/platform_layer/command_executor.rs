/*
 * Executes `PlatformCommand`s against the native UI. Each command is
 * dispatched to the control handler or window helper that owns the
 * corresponding Win32 calls, keeping `app.rs` free of control details.
 */

use super::app::Win32ApiInternalState;
use super::controls::{button_handler, dialog_handler, editor_handler, list_handler};
use super::error::Result as PlatformResult;
use super::types::{AppEvent, PlatformCommand};
use super::window_common;

use std::sync::Arc;

pub(crate) fn execute_platform_command(
    internal_state: &Arc<Win32ApiInternalState>,
    command: PlatformCommand,
) -> PlatformResult<()> {
    match command {
        PlatformCommand::SetWindowTitle { window_id, title } => {
            window_common::set_window_title(internal_state, window_id, &title)
        }
        PlatformCommand::ShowWindow { window_id } => {
            window_common::show_window(internal_state, window_id, true)
        }
        PlatformCommand::CloseWindow { window_id } => {
            // The application logic confirmed the close; destroy for real.
            window_common::destroy_native_window(internal_state, window_id)
        }
        PlatformCommand::QuitApplication => {
            internal_state.signal_quit_intent();
            Ok(())
        }
        PlatformCommand::CreateButton {
            window_id,
            control_id,
            text,
        } => button_handler::handle_create_button_command(internal_state, window_id, control_id, text),
        PlatformCommand::CreateNoteList {
            window_id,
            control_id,
        } => list_handler::handle_create_note_list_command(internal_state, window_id, control_id),
        PlatformCommand::CreateEditor {
            window_id,
            control_id,
        } => editor_handler::handle_create_editor_command(internal_state, window_id, control_id),
        PlatformCommand::PopulateNoteList { window_id, items } => {
            list_handler::handle_populate_command(internal_state, window_id, items)
        }
        PlatformCommand::AddNoteListItem { window_id, item } => {
            list_handler::handle_add_item_command(internal_state, window_id, item)
        }
        PlatformCommand::RemoveNoteListItem { window_id, item_id } => {
            list_handler::handle_remove_item_command(internal_state, window_id, item_id)
        }
        PlatformCommand::SetEditorVisible { window_id, visible } => {
            editor_handler::handle_set_visible_command(internal_state, window_id, visible)
        }
        PlatformCommand::SetEditorText { window_id, text } => {
            editor_handler::handle_set_text_command(internal_state, window_id, text)
        }
        PlatformCommand::ShowInputDialog {
            window_id,
            title,
            prompt,
        } => dialog_handler::handle_show_input_dialog_command(internal_state, window_id, title, prompt),
        PlatformCommand::SignalMainWindowUISetupComplete { window_id } => {
            // Static controls exist now; size them for the current client
            // area, then let the logic populate and show the window.
            window_common::layout_window_for_current_size(internal_state, window_id)?;
            internal_state.send_event(AppEvent::MainWindowUISetupComplete { window_id });
            Ok(())
        }
    }
}
