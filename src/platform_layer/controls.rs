pub(crate) mod button_handler;
pub(crate) mod dialog_handler;
pub(crate) mod editor_handler;
pub(crate) mod list_handler;
