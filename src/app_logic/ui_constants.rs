/*
 * Logical control identifiers for the main window, shared between the
 * application logic and the UI description layer.
 */

pub const ID_BUTTON_CREATE_NOTE: i32 = 1001;
pub const ID_LISTBOX_NOTES: i32 = 1002;
pub const ID_EDIT_CONTENT: i32 = 1003;
