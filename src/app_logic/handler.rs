use crate::app_logic::ui_constants;
use crate::core::{Note, NoteId, NoteStoreOperations};
use crate::platform_layer::{
    AppEvent, ListItemDescriptor, ListItemId, PlatformCommand, PlatformEventHandler, WindowId,
};
use crate::ui_description_layer;

use std::collections::VecDeque;
use std::sync::Arc;

/*
 * `MyAppLogic` is the central application controller. It owns the in-memory
 * note list, reacts to `AppEvent`s from the platform layer, talks to the
 * note store, and enqueues `PlatformCommand`s that the platform layer drains
 * after each event.
 *
 * It holds no native handles, which keeps the whole controller testable
 * without a display.
 */
pub struct MyAppLogic {
    note_store: Arc<dyn NoteStoreOperations>,
    main_window_id: Option<WindowId>,
    // Notes in creation order; the list control mirrors this ordering.
    notes: Vec<Note>,
    selected_note_id: Option<NoteId>,
    pending_commands: VecDeque<PlatformCommand>,
}

impl MyAppLogic {
    pub fn new(note_store: Arc<dyn NoteStoreOperations>) -> Self {
        MyAppLogic {
            note_store,
            main_window_id: None,
            notes: Vec::new(),
            selected_note_id: None,
            pending_commands: VecDeque::new(),
        }
    }

    fn enqueue_command(&mut self, command: PlatformCommand) {
        self.pending_commands.push_back(command);
    }

    /*
     * Called once after the platform layer has created the (still invisible)
     * main window. Enqueues the static UI description so the platform can
     * build the controls, ending with the setup-complete signal.
     */
    pub fn on_main_window_created(&mut self, window_id: WindowId) {
        log::debug!("AppLogic: main window created, id {window_id:?}");
        self.main_window_id = Some(window_id);
        for command in ui_description_layer::describe_main_window_layout(window_id) {
            self.enqueue_command(command);
        }
    }

    // A note's list item carries the note id, so row lookups never depend on
    // control indices.
    fn item_id_for(note: &Note) -> ListItemId {
        ListItemId(note.id.0)
    }

    fn note_index_for_item(&self, item_id: ListItemId) -> Option<usize> {
        self.notes.iter().position(|n| n.id.0 == item_id.0)
    }

    fn handle_ui_setup_complete(&mut self, window_id: WindowId) {
        match self.note_store.load_notes() {
            Ok(notes) => {
                log::info!("AppLogic: loaded {} note(s) from store", notes.len());
                self.notes = notes;
            }
            Err(e) => {
                log::error!("AppLogic: failed to load notes, starting empty: {e}");
                self.notes = Vec::new();
            }
        }
        let items: Vec<ListItemDescriptor> = self
            .notes
            .iter()
            .map(|n| ListItemDescriptor {
                id: Self::item_id_for(n),
                text: n.title.clone(),
            })
            .collect();
        self.enqueue_command(PlatformCommand::PopulateNoteList { window_id, items });
        // No selection yet, so the editor stays hidden.
        self.enqueue_command(PlatformCommand::SetEditorVisible {
            window_id,
            visible: false,
        });
        self.enqueue_command(PlatformCommand::ShowWindow { window_id });
    }

    fn handle_create_note_button(&mut self, window_id: WindowId) {
        self.enqueue_command(PlatformCommand::ShowInputDialog {
            window_id,
            title: "Add a note".to_string(),
            prompt: "Note title :".to_string(),
        });
    }

    fn handle_input_dialog_completed(&mut self, window_id: WindowId, text: Option<String>) {
        let title = match text {
            Some(t) => t,
            None => {
                log::debug!("AppLogic: note creation cancelled");
                return;
            }
        };
        if title.trim().is_empty() {
            log::debug!("AppLogic: ignoring empty note title");
            return;
        }
        let note = self.note_store.create_note(&title);
        log::info!("AppLogic: created note '{}' ({:?})", note.title, note.id);
        self.enqueue_command(PlatformCommand::AddNoteListItem {
            window_id,
            item: ListItemDescriptor {
                id: Self::item_id_for(&note),
                text: note.title.clone(),
            },
        });
        self.notes.push(note);
    }

    fn handle_selection_changed(&mut self, window_id: WindowId, item_id: Option<ListItemId>) {
        match item_id.and_then(|id| self.note_index_for_item(id)) {
            Some(index) => {
                let note = &self.notes[index];
                self.selected_note_id = Some(note.id);
                let content = note.content.clone();
                // Setting the editor text echoes back as an
                // EditorContentChanged event; the resulting save is a no-op
                // rewrite of unchanged content.
                self.enqueue_command(PlatformCommand::SetEditorText {
                    window_id,
                    text: content,
                });
                self.enqueue_command(PlatformCommand::SetEditorVisible {
                    window_id,
                    visible: true,
                });
            }
            None => {
                self.selected_note_id = None;
                self.enqueue_command(PlatformCommand::SetEditorVisible {
                    window_id,
                    visible: false,
                });
            }
        }
    }

    fn handle_editor_content_changed(&mut self, text: String) {
        let selected_id = match self.selected_note_id {
            Some(id) => id,
            // Editor text can change while nothing is selected (for example
            // a programmatic clear); there is no note to write to.
            None => return,
        };
        let note = match self.notes.iter_mut().find(|n| n.id == selected_id) {
            Some(n) => n,
            None => {
                log::warn!("AppLogic: selected note {selected_id:?} not in note list");
                return;
            }
        };
        note.content = text;
        if let Err(e) = self.note_store.save_note(note) {
            log::error!("AppLogic: failed to save note '{}': {e}", note.title);
        }
    }

    fn handle_delete_key(&mut self, window_id: WindowId) {
        let selected_id = match self.selected_note_id {
            Some(id) => id,
            None => return,
        };
        let index = match self.notes.iter().position(|n| n.id == selected_id) {
            Some(i) => i,
            None => {
                log::warn!("AppLogic: selected note {selected_id:?} not in note list");
                return;
            }
        };
        if !self.note_store.delete_note(selected_id) {
            // The store refused; the row stays and the note remains
            // selected and editable.
            log::warn!(
                "AppLogic: store did not delete note '{}'",
                self.notes[index].title
            );
            return;
        }
        let removed = self.notes.remove(index);
        log::info!("AppLogic: deleted note '{}'", removed.title);
        self.selected_note_id = None;
        self.enqueue_command(PlatformCommand::RemoveNoteListItem {
            window_id,
            item_id: ListItemId(removed.id.0),
        });
        self.enqueue_command(PlatformCommand::SetEditorVisible {
            window_id,
            visible: false,
        });
    }

    fn handle_window_close_requested(&mut self, window_id: WindowId) {
        self.enqueue_command(PlatformCommand::CloseWindow { window_id });
    }

    fn handle_window_destroyed(&mut self, window_id: WindowId) {
        if self.main_window_id == Some(window_id) {
            self.main_window_id = None;
            self.enqueue_command(PlatformCommand::QuitApplication);
        }
    }

    #[cfg(test)]
    pub(crate) fn notes(&self) -> &[Note] {
        &self.notes
    }

    #[cfg(test)]
    pub(crate) fn selected_note_id(&self) -> Option<NoteId> {
        self.selected_note_id
    }
}

impl PlatformEventHandler for MyAppLogic {
    fn handle_event(&mut self, event: AppEvent) {
        log::trace!("AppLogic: handling event {event:?}");
        match event {
            AppEvent::MainWindowUISetupComplete { window_id } => {
                self.handle_ui_setup_complete(window_id);
            }
            AppEvent::ButtonClicked {
                window_id,
                control_id,
            } => {
                if control_id == ui_constants::ID_BUTTON_CREATE_NOTE {
                    self.handle_create_note_button(window_id);
                } else {
                    log::warn!("AppLogic: click from unknown control id {control_id}");
                }
            }
            AppEvent::InputDialogCompleted { window_id, text } => {
                self.handle_input_dialog_completed(window_id, text);
            }
            AppEvent::NoteListSelectionChanged { window_id, item_id } => {
                self.handle_selection_changed(window_id, item_id);
            }
            AppEvent::EditorContentChanged { window_id: _, text } => {
                self.handle_editor_content_changed(text);
            }
            AppEvent::NoteListDeleteKeyPressed { window_id } => {
                self.handle_delete_key(window_id);
            }
            AppEvent::WindowCloseRequestedByUser { window_id } => {
                self.handle_window_close_requested(window_id);
            }
            AppEvent::WindowDestroyed { window_id } => {
                self.handle_window_destroyed(window_id);
            }
            AppEvent::WindowResized {
                window_id,
                width,
                height,
            } => {
                // Control layout on resize is handled natively by the
                // platform layer.
                log::trace!("AppLogic: window {window_id:?} resized to {width}x{height}");
            }
        }
    }

    fn on_quit(&mut self) {
        log::debug!("AppLogic: on_quit received");
    }

    fn try_dequeue_command(&mut self) -> Option<PlatformCommand> {
        self.pending_commands.pop_front()
    }
}
