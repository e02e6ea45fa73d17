/*
 * Defines the core domain model: a note with a title and free-form text
 * content. Notes are identified by a store-assigned `NoteId` rather than by
 * title, so duplicate titles are allowed and renames (should they ever be
 * added) would not change identity.
 */

// An opaque identifier for a persisted note, assigned by the note store.
//
// The id is a runtime handle: it is stable for the lifetime of the store
// instance that produced it, but it is not written to disk. UI layers use it
// to refer to notes without holding a reference to store internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(pub u64);

/*
 * A single note: a display title and its text content. Titles are not
 * enforced unique; identity is the `NoteId` handed out by the store.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
}

impl Note {
    /*
     * Creates an in-memory note with empty content. The note is not
     * persisted until the store's `save_note` is called with it.
     */
    pub fn new(id: NoteId, title: impl Into<String>) -> Self {
        Note {
            id,
            title: title.into(),
            content: String::new(),
        }
    }
}
