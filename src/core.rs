/*
 * This module consolidates the core, platform-agnostic logic of the
 * application: the `Note` model and the note persistence layer (the
 * `NoteStoreOperations` abstraction with its file-backed `CoreNoteStore`
 * implementation), plus shared path utilities.
 */
pub mod note;
pub mod note_store;
pub mod path_utils;

// Re-export key structures and traits
pub use note::{Note, NoteId};
pub use note_store::{CoreNoteStore, NoteStoreOperations};

#[cfg(test)]
pub use note_store::StoreError;
