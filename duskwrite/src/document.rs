//! Document model for duskwrite
//!
//! A plain UTF-8 buffer with its file path, a modified flag and snapshot
//! undo history. Styling never reaches the file.

use duskcore::text::{char_len, char_range_to_bytes, char_to_byte, slice_chars};
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;

const UNDO_LIMIT: usize = 100;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot save {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("document has no file path")]
    NoPath,
}

#[derive(Clone, Debug)]
struct UndoState {
    text: String,
    cursor: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Document {
    text: String,
    pub path: Option<PathBuf>,
    pub modified: bool,
    undo_stack: Vec<UndoState>,
    redo_stack: Vec<UndoState>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_string(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    pub fn open(path: &Path) -> Result<Self, DocumentError> {
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut doc = Self::from_string(text);
        doc.path = Some(path.to_path_buf());
        Ok(doc)
    }

    pub fn save(&mut self) -> Result<(), DocumentError> {
        let path = self.path.clone().ok_or(DocumentError::NoPath)?;
        self.write_to(&path)?;
        self.modified = false;
        Ok(())
    }

    pub fn save_as(&mut self, path: &Path) -> Result<(), DocumentError> {
        self.write_to(path)?;
        self.path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    fn write_to(&self, path: &Path) -> Result<(), DocumentError> {
        std::fs::write(path, &self.text).map_err(|source| DocumentError::Save {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Mutable access for the text widget. Callers record the previous text
    /// with [`Document::save_undo_state`] first.
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    /// File name shown in the window title, `untitled` before first save.
    pub fn file_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "untitled".to_string())
    }

    pub fn display_title(&self) -> String {
        if self.modified {
            format!("{}*", self.file_name())
        } else {
            self.file_name()
        }
    }

    /// Push a snapshot of `text` for undo and drop the redo history.
    pub fn save_undo_state(&mut self, text: String, cursor: usize) {
        self.undo_stack.push(UndoState { text, cursor });
        self.redo_stack.clear();
        if self.undo_stack.len() > UNDO_LIMIT {
            self.undo_stack.remove(0);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Restore the last snapshot. Returns the cursor to place.
    pub fn undo(&mut self) -> Option<usize> {
        let state = self.undo_stack.pop()?;
        let current = std::mem::replace(&mut self.text, state.text);
        self.redo_stack.push(UndoState { text: current, cursor: state.cursor });
        self.modified = true;
        Some(state.cursor)
    }

    pub fn redo(&mut self) -> Option<usize> {
        let state = self.redo_stack.pop()?;
        let current = std::mem::replace(&mut self.text, state.text);
        self.undo_stack.push(UndoState { text: current, cursor: state.cursor });
        self.modified = true;
        Some(state.cursor)
    }

    /// Insert at a char index, clamped to the end.
    pub fn insert(&mut self, pos: usize, text: &str) {
        let at = char_to_byte(&self.text, pos);
        self.text.insert_str(at, text);
        self.modified = true;
    }

    pub fn delete_range(&mut self, range: Range<usize>) {
        let bytes = char_range_to_bytes(&self.text, range);
        if bytes.start < bytes.end {
            self.text.replace_range(bytes, "");
            self.modified = true;
        }
    }

    pub fn get_range(&self, range: Range<usize>) -> &str {
        slice_chars(&self.text, range)
    }

    pub fn char_count(&self) -> usize {
        char_len(&self.text)
    }

    /// Line (1-based) and column (0-based, in chars) of a char index.
    pub fn line_col(&self, char_idx: usize) -> (usize, usize) {
        let before = slice_chars(&self.text, 0..char_idx);
        let line = before.matches('\n').count() + 1;
        let col = match before.rfind('\n') {
            Some(nl) => char_len(&before[nl + 1..]),
            None => char_len(before),
        };
        (line, col)
    }
}
