/*
 * This module is responsible for loading, saving and deleting notes. Each
 * note is stored as its own JSON file inside a `notes` subfolder of the
 * application's local data directory. File names carry a zero-padded
 * creation sequence number, so listing the directory in file-name order
 * yields notes in creation order across restarts.
 *
 * It includes a trait for store operations (`NoteStoreOperations`) to
 * facilitate testing and dependency injection, and a concrete implementation
 * (`CoreNoteStore`). The observable contract preserved here: `create_note`
 * writes the empty record at once, `save_note`
 * failures are never surfaced to the UI by callers, and `delete_note`
 * reports plain success/failure as a boolean so the UI can leave its state
 * untouched on failure.
 */
use super::note::{Note, NoteId};
use super::path_utils;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const NOTE_FILE_EXTENSION: &str = "json";
const NOTES_SUBFOLDER_NAME: &str = "notes";

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Serde(serde_json::Error),
    NoDataDirectory,
    UnknownNote(NoteId),
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {e}"),
            StoreError::Serde(e) => write!(f, "Serialization/Deserialization error: {e}"),
            StoreError::NoDataDirectory => {
                write!(f, "Could not determine data directory for notes")
            }
            StoreError::UnknownNote(id) => write!(f, "Unknown note id: {id:?}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Serde(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/*
 * Reduces a note title to characters that are safe in a file name. The real
 * title lives in the JSON body; this only shapes the file name. An empty
 * result falls back to "note" so every file keeps a readable stem.
 */
pub fn sanitize_title(title: &str) -> String {
    let sanitized: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if sanitized.is_empty() {
        "note".to_string()
    } else {
        sanitized
    }
}

pub trait NoteStoreOperations: Send + Sync {
    /// Returns all persisted notes in creation order.
    fn load_notes(&self) -> Result<Vec<Note>>;
    /// Creates a new note with empty content and persists it immediately,
    /// so the record is retrievable (and deletable) before any edit. Write
    /// failures are logged; the note stays registered so a later
    /// `save_note` retries the write.
    fn create_note(&self, title: &str) -> Note;
    /// Idempotently persists the note's current title and content.
    fn save_note(&self, note: &Note) -> Result<()>;
    /// Removes the backing record. Returns false on any failure, in which
    /// case callers must leave their UI state unchanged.
    fn delete_note(&self, id: NoteId) -> bool;
}

// On-disk shape of a note. The `NoteId` is a runtime handle and is
// deliberately not persisted.
#[derive(Debug, Serialize, Deserialize)]
struct NoteFileData {
    title: String,
    content: String,
}

struct StoreInner {
    /// Maps runtime note ids to their backing files.
    paths: HashMap<NoteId, PathBuf>,
    next_note_id: u64,
    next_file_seq: u64,
}

pub struct CoreNoteStore {
    notes_dir: PathBuf,
    inner: Mutex<StoreInner>,
}

impl CoreNoteStore {
    /*
     * Opens (or initializes) the note store for the given application name,
     * under `<local data dir>/notes`. Fails if the platform data directory
     * cannot be resolved or the folder cannot be created.
     */
    pub fn new(app_name: &str) -> Result<Self> {
        let base_dir =
            path_utils::resolve_app_data_local_dir(app_name).ok_or(StoreError::NoDataDirectory)?;
        Self::open_at(base_dir.join(NOTES_SUBFOLDER_NAME))
    }

    fn open_at(notes_dir: PathBuf) -> Result<Self> {
        if !notes_dir.exists() {
            // Creates the whole chain, including the per-user data dir.
            fs::create_dir_all(&notes_dir)?;
            log::debug!("CoreNoteStore: Created notes directory: {notes_dir:?}");
        }
        let next_file_seq = Self::scan_note_files(&notes_dir)?
            .iter()
            .filter_map(|path| Self::file_sequence_number(path))
            .max()
            .map_or(1, |max_seq| max_seq + 1);
        Ok(CoreNoteStore {
            notes_dir,
            inner: Mutex::new(StoreInner {
                paths: HashMap::new(),
                next_note_id: 1,
                next_file_seq,
            }),
        })
    }

    /// Test constructor that bypasses the platform data directory.
    #[cfg(test)]
    pub(crate) fn open_in(notes_dir: PathBuf) -> Result<Self> {
        Self::open_at(notes_dir)
    }

    // Note files sorted by file name, which is creation order thanks to the
    // zero-padded sequence prefix.
    fn scan_note_files(notes_dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = fs::read_dir(notes_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext == NOTE_FILE_EXTENSION)
            })
            .collect();
        files.sort();
        Ok(files)
    }

    fn file_sequence_number(path: &Path) -> Option<u64> {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.split('_').next())
            .and_then(|prefix| prefix.parse::<u64>().ok())
    }

    fn write_note_file(path: &Path, note: &Note) -> Result<()> {
        let data = NoteFileData {
            title: note.title.clone(),
            content: note.content.clone(),
        };
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &data)?;
        Ok(())
    }
}

impl NoteStoreOperations for CoreNoteStore {
    /*
     * Loads every note file in creation order and (re)builds the id map.
     * Intended to be called once at startup; runtime ids from earlier calls
     * are invalidated. Files that cannot be read or parsed are skipped with
     * a warning so one corrupt note does not take the whole list down.
     */
    fn load_notes(&self) -> Result<Vec<Note>> {
        let files = Self::scan_note_files(&self.notes_dir)?;
        let mut inner = self.inner.lock().unwrap();
        inner.paths.clear();

        let mut notes = Vec::with_capacity(files.len());
        for path in files {
            let file = match File::open(&path) {
                Ok(f) => f,
                Err(e) => {
                    log::warn!("CoreNoteStore: Skipping unreadable note file {path:?}: {e}");
                    continue;
                }
            };
            let data: NoteFileData = match serde_json::from_reader(BufReader::new(file)) {
                Ok(d) => d,
                Err(e) => {
                    log::warn!("CoreNoteStore: Skipping malformed note file {path:?}: {e}");
                    continue;
                }
            };
            let id = NoteId(inner.next_note_id);
            inner.next_note_id += 1;
            inner.paths.insert(id, path);
            notes.push(Note {
                id,
                title: data.title,
                content: data.content,
            });
        }
        log::debug!(
            "CoreNoteStore: Loaded {} notes from {:?}",
            notes.len(),
            self.notes_dir
        );
        Ok(notes)
    }

    fn create_note(&self, title: &str) -> Note {
        let mut inner = self.inner.lock().unwrap();
        let id = NoteId(inner.next_note_id);
        inner.next_note_id += 1;
        let seq = inner.next_file_seq;
        inner.next_file_seq += 1;

        let file_name = format!(
            "{:05}_{}.{}",
            seq,
            sanitize_title(title),
            NOTE_FILE_EXTENSION
        );
        let path = self.notes_dir.join(file_name);
        let note = Note::new(id, title);
        if let Err(e) = Self::write_note_file(&path, &note) {
            log::error!("CoreNoteStore: Failed to write new note {id:?} ({path:?}): {e}");
        }
        log::debug!("CoreNoteStore: Created note {id:?} at {path:?}");
        inner.paths.insert(id, path);
        note
    }

    fn save_note(&self, note: &Note) -> Result<()> {
        let path = {
            let inner = self.inner.lock().unwrap();
            inner
                .paths
                .get(&note.id)
                .cloned()
                .ok_or(StoreError::UnknownNote(note.id))?
        };
        Self::write_note_file(&path, note)?;
        log::trace!("CoreNoteStore: Saved note {:?} ('{}')", note.id, note.title);
        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> bool {
        let path = {
            let inner = self.inner.lock().unwrap();
            inner.paths.get(&id).cloned()
        };
        let Some(path) = path else {
            log::warn!("CoreNoteStore: delete_note called with unknown id {id:?}");
            return false;
        };
        match fs::remove_file(&path) {
            Ok(()) => {
                self.inner.lock().unwrap().paths.remove(&id);
                log::debug!("CoreNoteStore: Deleted note {id:?} ({path:?})");
                true
            }
            Err(e) => {
                log::warn!("CoreNoteStore: Failed to delete note {id:?} ({path:?}): {e}");
                false
            }
        }
    }
}
