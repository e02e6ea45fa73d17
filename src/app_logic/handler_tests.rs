use crate::app_logic::handler::MyAppLogic;
use crate::app_logic::ui_constants;
use crate::core::{Note, NoteId, NoteStoreOperations, StoreError};
use crate::platform_layer::{
    AppEvent, ListItemId, PlatformCommand, PlatformEventHandler, WindowId,
};

use std::sync::{Arc, Mutex};

/*
 * Mock note store for controller tests. Interior mutability lets the tests
 * inspect and steer the store through the `Arc<dyn NoteStoreOperations>`
 * handle the logic holds.
 */
struct MockNoteStore {
    notes_to_load: Mutex<Vec<Note>>,
    next_id: Mutex<u64>,
    saved_notes: Mutex<Vec<Note>>,
    deleted_ids: Mutex<Vec<NoteId>>,
    fail_load: Mutex<bool>,
    fail_save: Mutex<bool>,
    refuse_delete: Mutex<bool>,
}

impl MockNoteStore {
    fn new() -> Self {
        MockNoteStore {
            notes_to_load: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
            saved_notes: Mutex::new(Vec::new()),
            deleted_ids: Mutex::new(Vec::new()),
            fail_load: Mutex::new(false),
            fail_save: Mutex::new(false),
            refuse_delete: Mutex::new(false),
        }
    }

    fn set_notes_to_load(&self, notes: Vec<Note>) {
        *self.notes_to_load.lock().unwrap() = notes;
    }

    fn set_fail_load(&self, fail: bool) {
        *self.fail_load.lock().unwrap() = fail;
    }

    fn set_fail_save(&self, fail: bool) {
        *self.fail_save.lock().unwrap() = fail;
    }

    fn set_refuse_delete(&self, refuse: bool) {
        *self.refuse_delete.lock().unwrap() = refuse;
    }

    fn saved_notes(&self) -> Vec<Note> {
        self.saved_notes.lock().unwrap().clone()
    }

    fn deleted_ids(&self) -> Vec<NoteId> {
        self.deleted_ids.lock().unwrap().clone()
    }
}

impl NoteStoreOperations for MockNoteStore {
    fn load_notes(&self) -> Result<Vec<Note>, StoreError> {
        if *self.fail_load.lock().unwrap() {
            return Err(StoreError::NoDataDirectory);
        }
        Ok(self.notes_to_load.lock().unwrap().clone())
    }

    fn create_note(&self, title: &str) -> Note {
        let mut next_id = self.next_id.lock().unwrap();
        let note = Note::new(NoteId(*next_id), title);
        *next_id += 1;
        // Creation persists the empty record at once, like the real store.
        self.saved_notes.lock().unwrap().push(note.clone());
        note
    }

    fn save_note(&self, note: &Note) -> Result<(), StoreError> {
        if *self.fail_save.lock().unwrap() {
            return Err(StoreError::NoDataDirectory);
        }
        self.saved_notes.lock().unwrap().push(note.clone());
        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> bool {
        if *self.refuse_delete.lock().unwrap() {
            return false;
        }
        self.deleted_ids.lock().unwrap().push(id);
        true
    }
}

const WIN_ID: WindowId = WindowId(1);

fn setup_logic() -> (MyAppLogic, Arc<MockNoteStore>) {
    crate::initialize_logging();
    let store = Arc::new(MockNoteStore::new());
    let mut logic = MyAppLogic::new(store.clone());
    logic.on_main_window_created(WIN_ID);
    drain_commands(&mut logic);
    (logic, store)
}

fn drain_commands(logic: &mut MyAppLogic) -> Vec<PlatformCommand> {
    let mut commands = Vec::new();
    while let Some(cmd) = logic.try_dequeue_command() {
        commands.push(cmd);
    }
    commands
}

// Runs the create-note dialog flow through the controller.
fn create_note(logic: &mut MyAppLogic, title: &str) -> Vec<PlatformCommand> {
    logic.handle_event(AppEvent::ButtonClicked {
        window_id: WIN_ID,
        control_id: ui_constants::ID_BUTTON_CREATE_NOTE,
    });
    drain_commands(logic);
    logic.handle_event(AppEvent::InputDialogCompleted {
        window_id: WIN_ID,
        text: Some(title.to_string()),
    });
    drain_commands(logic)
}

fn select_item(logic: &mut MyAppLogic, item_id: Option<ListItemId>) -> Vec<PlatformCommand> {
    logic.handle_event(AppEvent::NoteListSelectionChanged {
        window_id: WIN_ID,
        item_id,
    });
    drain_commands(logic)
}

fn type_content(logic: &mut MyAppLogic, text: &str) {
    logic.handle_event(AppEvent::EditorContentChanged {
        window_id: WIN_ID,
        text: text.to_string(),
    });
    drain_commands(logic);
}

#[test]
fn main_window_created_enqueues_ui_description() {
    let store = Arc::new(MockNoteStore::new());
    let mut logic = MyAppLogic::new(store);
    logic.on_main_window_created(WIN_ID);

    let commands = drain_commands(&mut logic);
    assert!(!commands.is_empty());
    assert!(
        commands
            .iter()
            .any(|c| matches!(c, PlatformCommand::SetWindowTitle { .. }))
    );
    assert!(matches!(
        commands.last(),
        Some(PlatformCommand::SignalMainWindowUISetupComplete { .. })
    ));
}

#[test]
fn ui_setup_complete_populates_list_and_shows_window() {
    let (mut logic, store) = setup_logic();
    store.set_notes_to_load(vec![
        Note::new(NoteId(10), "First"),
        Note::new(NoteId(11), "Second"),
    ]);

    logic.handle_event(AppEvent::MainWindowUISetupComplete { window_id: WIN_ID });
    let commands = drain_commands(&mut logic);

    let populate = commands.iter().find_map(|c| match c {
        PlatformCommand::PopulateNoteList { items, .. } => Some(items.clone()),
        _ => None,
    });
    let items = populate.expect("expected PopulateNoteList command");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].text, "First");
    assert_eq!(items[0].id, ListItemId(10));
    assert_eq!(items[1].text, "Second");
    assert!(
        commands
            .iter()
            .any(|c| matches!(c, PlatformCommand::ShowWindow { .. }))
    );
    // No selection at startup, so the editor is hidden.
    assert!(commands.iter().any(|c| matches!(
        c,
        PlatformCommand::SetEditorVisible { visible: false, .. }
    )));
}

#[test]
fn ui_setup_complete_with_load_failure_starts_empty() {
    let (mut logic, store) = setup_logic();
    store.set_fail_load(true);

    logic.handle_event(AppEvent::MainWindowUISetupComplete { window_id: WIN_ID });
    let commands = drain_commands(&mut logic);

    let populate = commands.iter().find_map(|c| match c {
        PlatformCommand::PopulateNoteList { items, .. } => Some(items.clone()),
        _ => None,
    });
    assert_eq!(populate.expect("expected PopulateNoteList").len(), 0);
    // The window still comes up.
    assert!(
        commands
            .iter()
            .any(|c| matches!(c, PlatformCommand::ShowWindow { .. }))
    );
}

#[test]
fn create_button_opens_input_dialog() {
    let (mut logic, _store) = setup_logic();

    logic.handle_event(AppEvent::ButtonClicked {
        window_id: WIN_ID,
        control_id: ui_constants::ID_BUTTON_CREATE_NOTE,
    });
    let commands = drain_commands(&mut logic);

    match commands.as_slice() {
        [PlatformCommand::ShowInputDialog { title, prompt, .. }] => {
            assert_eq!(title, "Add a note");
            assert_eq!(prompt, "Note title :");
        }
        other => panic!("expected a single ShowInputDialog, got {other:?}"),
    }
}

#[test]
fn dialog_title_creates_note_and_adds_list_item() {
    let (mut logic, _store) = setup_logic();

    let commands = create_note(&mut logic, "Groceries");

    assert_eq!(logic.notes().len(), 1);
    assert_eq!(logic.notes()[0].title, "Groceries");
    assert_eq!(logic.notes()[0].content, "");
    let added = commands.iter().find_map(|c| match c {
        PlatformCommand::AddNoteListItem { item, .. } => Some(item.clone()),
        _ => None,
    });
    let item = added.expect("expected AddNoteListItem command");
    assert_eq!(item.text, "Groceries");
    assert_eq!(item.id, ListItemId(logic.notes()[0].id.0));
}

#[test]
fn created_note_is_persisted_before_any_edit() {
    let (mut logic, store) = setup_logic();

    create_note(&mut logic, "Groceries");

    // The empty record exists in the store straight away, so it survives a
    // restart and can be deleted without ever being edited.
    let saved = store.saved_notes();
    assert!(
        saved
            .iter()
            .any(|n| n.title == "Groceries" && n.content.is_empty())
    );

    let note_id = logic.notes()[0].id;
    select_item(&mut logic, Some(ListItemId(note_id.0)));
    logic.handle_event(AppEvent::NoteListDeleteKeyPressed { window_id: WIN_ID });
    drain_commands(&mut logic);
    assert!(logic.notes().is_empty());
    assert_eq!(store.deleted_ids(), vec![note_id]);
}

#[test]
fn cancelled_dialog_creates_nothing() {
    let (mut logic, _store) = setup_logic();

    logic.handle_event(AppEvent::InputDialogCompleted {
        window_id: WIN_ID,
        text: None,
    });
    let commands = drain_commands(&mut logic);

    assert!(logic.notes().is_empty());
    assert!(commands.is_empty());
}

#[test]
fn blank_title_creates_nothing() {
    let (mut logic, _store) = setup_logic();

    logic.handle_event(AppEvent::InputDialogCompleted {
        window_id: WIN_ID,
        text: Some("   ".to_string()),
    });
    let commands = drain_commands(&mut logic);

    assert!(logic.notes().is_empty());
    assert!(commands.is_empty());
}

#[test]
fn selecting_note_shows_editor_with_its_content() {
    let (mut logic, store) = setup_logic();
    let mut note = Note::new(NoteId(5), "Ideas");
    note.content = "remember the milk".to_string();
    store.set_notes_to_load(vec![note]);
    logic.handle_event(AppEvent::MainWindowUISetupComplete { window_id: WIN_ID });
    drain_commands(&mut logic);

    let commands = select_item(&mut logic, Some(ListItemId(5)));

    assert_eq!(logic.selected_note_id(), Some(NoteId(5)));
    assert!(commands.iter().any(|c| matches!(
        c,
        PlatformCommand::SetEditorText { text, .. } if text == "remember the milk"
    )));
    assert!(commands.iter().any(|c| matches!(
        c,
        PlatformCommand::SetEditorVisible { visible: true, .. }
    )));
}

#[test]
fn clearing_selection_hides_editor() {
    let (mut logic, _store) = setup_logic();
    create_note(&mut logic, "Groceries");
    let item_id = ListItemId(logic.notes()[0].id.0);
    select_item(&mut logic, Some(item_id));

    let commands = select_item(&mut logic, None);

    assert_eq!(logic.selected_note_id(), None);
    assert!(commands.iter().any(|c| matches!(
        c,
        PlatformCommand::SetEditorVisible { visible: false, .. }
    )));
}

#[test]
fn typing_saves_selected_note_content() {
    let (mut logic, store) = setup_logic();
    create_note(&mut logic, "Groceries");
    let item_id = ListItemId(logic.notes()[0].id.0);
    select_item(&mut logic, Some(item_id));

    type_content(&mut logic, "milk");
    type_content(&mut logic, "milk, eggs");

    assert_eq!(logic.notes()[0].content, "milk, eggs");
    let saved = store.saved_notes();
    // Every edit writes through to the store.
    let contents: Vec<&str> = saved.iter().map(|n| n.content.as_str()).collect();
    assert!(contents.contains(&"milk"));
    assert!(contents.contains(&"milk, eggs"));
}

#[test]
fn typing_with_no_selection_saves_nothing() {
    let (mut logic, store) = setup_logic();
    create_note(&mut logic, "Groceries");

    type_content(&mut logic, "orphan text");

    assert_eq!(logic.notes()[0].content, "");
    assert!(
        store
            .saved_notes()
            .iter()
            .all(|n| n.content != "orphan text")
    );
}

#[test]
fn save_failure_is_swallowed() {
    let (mut logic, store) = setup_logic();
    create_note(&mut logic, "Groceries");
    let item_id = ListItemId(logic.notes()[0].id.0);
    select_item(&mut logic, Some(item_id));
    store.set_fail_save(true);

    type_content(&mut logic, "milk");

    // The in-memory note keeps the edit even when persistence fails.
    assert_eq!(logic.notes()[0].content, "milk");
    assert!(store.saved_notes().iter().all(|n| n.content != "milk"));
}

#[test]
fn editor_text_echo_resaves_same_content() {
    let (mut logic, store) = setup_logic();
    create_note(&mut logic, "Groceries");
    let item_id = ListItemId(logic.notes()[0].id.0);
    select_item(&mut logic, Some(item_id));
    type_content(&mut logic, "milk");

    // Re-selecting sets the editor text, which the native control echoes
    // back as a content-changed event with identical text.
    select_item(&mut logic, None);
    select_item(&mut logic, Some(item_id));
    type_content(&mut logic, "milk");

    assert_eq!(logic.notes()[0].content, "milk");
    // Only the empty creation record and "milk" writes, never stale text.
    assert!(
        store
            .saved_notes()
            .iter()
            .all(|n| n.content.is_empty() || n.content == "milk")
    );
}

#[test]
fn delete_key_removes_selected_note() {
    let (mut logic, store) = setup_logic();
    create_note(&mut logic, "Groceries");
    let note_id = logic.notes()[0].id;
    select_item(&mut logic, Some(ListItemId(note_id.0)));

    logic.handle_event(AppEvent::NoteListDeleteKeyPressed { window_id: WIN_ID });
    let commands = drain_commands(&mut logic);

    assert!(logic.notes().is_empty());
    assert_eq!(logic.selected_note_id(), None);
    assert_eq!(store.deleted_ids(), vec![note_id]);
    assert!(commands.iter().any(|c| matches!(
        c,
        PlatformCommand::RemoveNoteListItem { item_id, .. } if *item_id == ListItemId(note_id.0)
    )));
    assert!(commands.iter().any(|c| matches!(
        c,
        PlatformCommand::SetEditorVisible { visible: false, .. }
    )));
}

#[test]
fn refused_delete_keeps_note_and_row() {
    let (mut logic, store) = setup_logic();
    create_note(&mut logic, "Groceries");
    let note_id = logic.notes()[0].id;
    select_item(&mut logic, Some(ListItemId(note_id.0)));
    store.set_refuse_delete(true);

    logic.handle_event(AppEvent::NoteListDeleteKeyPressed { window_id: WIN_ID });
    let commands = drain_commands(&mut logic);

    assert_eq!(logic.notes().len(), 1);
    assert_eq!(logic.selected_note_id(), Some(note_id));
    assert!(
        !commands
            .iter()
            .any(|c| matches!(c, PlatformCommand::RemoveNoteListItem { .. }))
    );
}

#[test]
fn delete_key_with_no_selection_does_nothing() {
    let (mut logic, store) = setup_logic();
    create_note(&mut logic, "Groceries");

    logic.handle_event(AppEvent::NoteListDeleteKeyPressed { window_id: WIN_ID });
    let commands = drain_commands(&mut logic);

    assert_eq!(logic.notes().len(), 1);
    assert!(store.deleted_ids().is_empty());
    assert!(commands.is_empty());
}

#[test]
fn close_request_closes_window_and_destroy_quits() {
    let (mut logic, _store) = setup_logic();

    logic.handle_event(AppEvent::WindowCloseRequestedByUser { window_id: WIN_ID });
    let commands = drain_commands(&mut logic);
    assert!(matches!(
        commands.as_slice(),
        [PlatformCommand::CloseWindow { .. }]
    ));

    logic.handle_event(AppEvent::WindowDestroyed { window_id: WIN_ID });
    let commands = drain_commands(&mut logic);
    assert!(matches!(
        commands.as_slice(),
        [PlatformCommand::QuitApplication]
    ));
}

#[test]
fn two_note_editing_scenario_keeps_contents_separate() {
    let (mut logic, store) = setup_logic();

    create_note(&mut logic, "Groceries");
    let groceries_item = ListItemId(logic.notes()[0].id.0);
    select_item(&mut logic, Some(groceries_item));
    type_content(&mut logic, "milk, eggs");

    create_note(&mut logic, "TODO");
    let todo_item = ListItemId(logic.notes()[1].id.0);
    select_item(&mut logic, Some(todo_item));
    type_content(&mut logic, "call the plumber");

    // Switching back shows the first note's content unchanged.
    let commands = select_item(&mut logic, Some(groceries_item));
    assert!(commands.iter().any(|c| matches!(
        c,
        PlatformCommand::SetEditorText { text, .. } if text == "milk, eggs"
    )));
    assert_eq!(logic.notes()[0].content, "milk, eggs");
    assert_eq!(logic.notes()[1].content, "call the plumber");

    let saved = store.saved_notes();
    assert!(
        saved
            .iter()
            .any(|n| n.title == "Groceries" && n.content == "milk, eggs")
    );
    assert!(
        saved
            .iter()
            .any(|n| n.title == "TODO" && n.content == "call the plumber")
    );
}

/*
 * Full pass over a store preloaded with two notes: select the second, edit
 * it, then delete it with the keyboard shortcut.
 */
#[test]
fn preloaded_notes_can_be_edited_and_deleted() {
    let (mut logic, store) = setup_logic();
    let mut groceries = Note::new(NoteId(1), "Groceries");
    groceries.content = "milk".to_string();
    let mut todo = Note::new(NoteId(2), "TODO");
    todo.content = "call dad".to_string();
    store.set_notes_to_load(vec![groceries, todo]);
    logic.handle_event(AppEvent::MainWindowUISetupComplete { window_id: WIN_ID });
    drain_commands(&mut logic);

    // Selecting TODO brings up its stored content.
    let commands = select_item(&mut logic, Some(ListItemId(2)));
    assert!(commands.iter().any(|c| matches!(
        c,
        PlatformCommand::SetEditorText { text, .. } if text == "call dad"
    )));

    // Editing writes the new content through to the store.
    type_content(&mut logic, "call mom");
    assert!(
        store
            .saved_notes()
            .iter()
            .any(|n| n.title == "TODO" && n.content == "call mom")
    );

    // Delete removes exactly that row and hides the editor.
    logic.handle_event(AppEvent::NoteListDeleteKeyPressed { window_id: WIN_ID });
    let commands = drain_commands(&mut logic);
    assert_eq!(store.deleted_ids(), vec![NoteId(2)]);
    assert!(commands.iter().any(|c| matches!(
        c,
        PlatformCommand::RemoveNoteListItem { item_id, .. } if *item_id == ListItemId(2)
    )));
    assert!(commands.iter().any(|c| matches!(
        c,
        PlatformCommand::SetEditorVisible { visible: false, .. }
    )));
    let titles: Vec<&str> = logic.notes().iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, ["Groceries"]);
    assert_eq!(logic.notes()[0].content, "milk");
    assert_eq!(logic.selected_note_id(), None);
}
