//! Editor session: the document, its tag layer and the style overlay, kept
//! in step with each other.
//!
//! Positions and selections are char indices. Every text mutation goes
//! through [`EditorSession::text_changed`] or a helper built on it, so tags
//! and annotations always follow the text.

use crate::clipboard::Clipboard;
use crate::document::{Document, DocumentError};
use crate::style::{
    ColorChannel, CompactionReport, DefaultStyle, StyleOverlay, TagId, TagLayer, Toggle,
};
use duskcore::text::{char_len, TextChange};
use duskcore::Rgb;
use std::ops::Range;
use std::path::Path;
use tracing::{debug, info};

pub struct EditorSession {
    doc: Document,
    tags: TagLayer,
    overlay: StyleOverlay,
    clipboard: Clipboard,
}

impl EditorSession {
    pub fn new(defaults: DefaultStyle, clipboard: Clipboard) -> Self {
        Self {
            doc: Document::new(),
            tags: TagLayer::new(),
            overlay: StyleOverlay::new(defaults),
            clipboard,
        }
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn tags(&self) -> &TagLayer {
        &self.tags
    }

    pub fn overlay(&self) -> &StyleOverlay {
        &self.overlay
    }

    /// Split borrow for the text widget: the buffer to edit plus what the
    /// layouter needs to draw it.
    pub fn editor_parts(&mut self) -> (&mut String, &TagLayer, &DefaultStyle) {
        (self.doc.text_mut(), &self.tags, self.overlay.defaults())
    }

    pub fn defaults(&self) -> &DefaultStyle {
        self.overlay.defaults()
    }

    pub fn set_defaults(&mut self, defaults: DefaultStyle) {
        self.overlay.set_defaults(defaults);
    }

    /// Start an empty untitled document. All styling is dropped.
    pub fn new_document(&mut self) {
        self.replace_document(Document::new());
        info!("new document");
    }

    /// Load a plain-text file. On failure nothing changes.
    pub fn open(&mut self, path: &Path) -> Result<(), DocumentError> {
        let doc = Document::open(path)?;
        info!("opened {} ({} chars)", path.display(), doc.char_count());
        self.replace_document(doc);
        Ok(())
    }

    /// Write the raw text back to the document's path.
    pub fn save(&mut self) -> Result<(), DocumentError> {
        self.doc.save()?;
        info!("saved {}", self.doc.file_name());
        Ok(())
    }

    pub fn save_as(&mut self, path: &Path) -> Result<(), DocumentError> {
        self.doc.save_as(path)?;
        info!("saved {}", path.display());
        Ok(())
    }

    fn replace_document(&mut self, doc: Document) {
        self.doc = doc;
        self.tags.clear();
        self.overlay.reset();
    }

    /// Reconcile tags and annotations after the text widget changed the
    /// buffer, and record `previous` for undo.
    ///
    /// `anchor` is the leftmost position the edit can have started at: the
    /// start of the selection before the edit or the caret after it,
    /// whichever is smaller.
    pub fn text_changed(&mut self, previous: String, anchor: usize) -> bool {
        let Some(change) = TextChange::between_at(&previous, self.doc.text(), anchor) else {
            return false;
        };
        self.follow_change(&change);
        self.doc.save_undo_state(previous, anchor);
        self.doc.modified = true;
        true
    }

    fn follow_change(&mut self, change: &TextChange) {
        self.tags.apply_change(change);
        self.overlay.apply_change(change);
    }

    /// Replace `range` with `text`; returns the char index after the
    /// inserted text.
    fn replace_range(&mut self, range: Range<usize>, text: &str) -> usize {
        let previous = self.doc.text().to_string();
        let len = self.doc.char_count();
        let range = range.start.min(len)..range.end.min(len);
        self.doc.delete_range(range.clone());
        self.doc.insert(range.start, text);
        self.text_changed(previous, range.start);
        range.start + char_len(text)
    }

    pub fn toggle(&mut self, selection: Range<usize>, toggle: Toggle) -> Option<TagId> {
        self.overlay.apply_toggle(&mut self.tags, selection, toggle)
    }

    pub fn color(&mut self, selection: Range<usize>, channel: ColorChannel, color: Rgb) -> Option<TagId> {
        self.overlay.apply_color(&mut self.tags, selection, channel, color)
    }

    pub fn clear_formatting(&mut self, selection: Range<usize>) -> usize {
        self.overlay.clear_formatting(&mut self.tags, selection)
    }

    pub fn compact_styles(&mut self) -> CompactionReport {
        self.overlay.compact(&mut self.tags)
    }

    pub fn select_all(&self) -> Range<usize> {
        0..self.doc.char_count()
    }

    /// Copy the selected text. Returns false for an empty selection.
    pub fn copy(&mut self, selection: Range<usize>) -> bool {
        if selection.is_empty() {
            return false;
        }
        let text = self.doc.get_range(selection).to_string();
        self.clipboard.set_text(&text);
        true
    }

    /// Copy then delete the selection. Returns the new cursor.
    pub fn cut(&mut self, selection: Range<usize>) -> Option<usize> {
        if !self.copy(selection.clone()) {
            return None;
        }
        Some(self.replace_range(selection, ""))
    }

    /// Insert clipboard text over the selection, or at the cursor when the
    /// selection is empty. Returns the new cursor.
    pub fn paste(&mut self, selection: Range<usize>) -> Option<usize> {
        let text = self.clipboard.get_text()?;
        debug!("pasting {} chars at {}", char_len(&text), selection.start);
        Some(self.replace_range(selection, &text))
    }

    pub fn delete_selection(&mut self, selection: Range<usize>) -> Option<usize> {
        if selection.is_empty() {
            return None;
        }
        Some(self.replace_range(selection, ""))
    }

    /// Step back in the text history. Tags follow the restored text.
    pub fn undo(&mut self) -> Option<usize> {
        let previous = self.doc.text().to_string();
        let cursor = self.doc.undo()?;
        if let Some(change) = TextChange::between(&previous, self.doc.text()) {
            self.follow_change(&change);
        }
        Some(cursor.min(self.doc.char_count()))
    }

    pub fn redo(&mut self) -> Option<usize> {
        let previous = self.doc.text().to_string();
        let cursor = self.doc.redo()?;
        if let Some(change) = TextChange::between(&previous, self.doc.text()) {
            self.follow_change(&change);
        }
        Some(cursor.min(self.doc.char_count()))
    }

    /// `line: L, column: C | chars: N`, with the selection size when there
    /// is one.
    pub fn status_line(&self, cursor: usize, selection: Option<Range<usize>>) -> String {
        let (line, col) = self.doc.line_col(cursor);
        let mut status = format!("line: {}, column: {} | chars: {}", line, col, self.doc.char_count());
        if let Some(sel) = selection.filter(|s| !s.is_empty()) {
            status.push_str(&format!(" | selected: {}", sel.len()));
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::record::Weight;
    use crate::style::tags::TagTarget;

    fn session(text: &str) -> EditorSession {
        let mut s = EditorSession::new(DefaultStyle::default(), Clipboard::local_only());
        s.doc.text_mut().push_str(text);
        s
    }

    fn type_text(s: &mut EditorSession, at: usize, text: &str) {
        let previous = s.doc().text().to_string();
        let byte = duskcore::text::char_to_byte(s.doc().text(), at);
        s.doc.text_mut().insert_str(byte, text);
        s.text_changed(previous, at);
    }

    fn weight_at(s: &EditorSession, pos: usize) -> Weight {
        s.overlay().resolve_effective_style(s.tags(), pos).weight
    }

    #[test]
    fn test_save_and_reload_drops_styling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("styled.txt");

        let mut s = session("Hello world");
        s.toggle(0..5, Toggle::Bold);
        s.color(6..11, ColorChannel::Foreground, Rgb::new(0xff, 0, 0));
        s.save_as(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hello world");

        s.open(&path).unwrap();
        assert_eq!(s.doc().text(), "Hello world");
        assert!(s.overlay().annotations().is_empty());
        assert!(s.overlay().is_empty());
        assert!(s.tags().is_empty());
        assert_eq!(s.overlay().next_tag(), TagId(0));
    }

    #[test]
    fn test_failed_open_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session("keep me");
        s.toggle(0..4, Toggle::Italic);
        assert!(s.open(&dir.path().join("nope.txt")).is_err());
        assert_eq!(s.doc().text(), "keep me");
        assert_eq!(s.overlay().len(), 1);
    }

    #[test]
    fn test_typing_inside_tagged_range_extends_it() {
        let mut s = session("abcdef");
        let tag = s.toggle(1..4, Toggle::Bold).unwrap();

        type_text(&mut s, 2, "XY");
        assert_eq!(s.tags().tag_ranges(tag), vec![1..6]);
        assert_eq!(weight_at(&s, 3), Weight::Bold);

        // at the end edge: not covered
        type_text(&mut s, 6, "Z");
        assert_eq!(s.tags().tag_ranges(tag), vec![1..6]);
        assert_eq!(weight_at(&s, 6), Weight::Normal);

        // at the start edge: pushed right
        type_text(&mut s, 1, "Q");
        assert_eq!(s.tags().tag_ranges(tag), vec![2..7]);
        assert_eq!(weight_at(&s, 1), Weight::Normal);
        assert_eq!(s.overlay().annotations()[0].range, 2..7);
        assert!(s.doc().modified);
    }

    #[test]
    fn test_typing_repeated_chars_at_caret() {
        let mut s = session("abbc");
        let tag = s.toggle(0..2, Toggle::Bold).unwrap();

        // inside "ab": joins the run even though the next char matches
        type_text(&mut s, 1, "b");
        assert_eq!(s.doc().text(), "abbbc");
        assert_eq!(s.tags().tag_ranges(tag), vec![0..3]);
        assert_eq!(weight_at(&s, 1), Weight::Bold);

        // end edge with the same char following: stays plain
        type_text(&mut s, 3, "b");
        assert_eq!(s.tags().tag_ranges(tag), vec![0..3]);
        assert_eq!(weight_at(&s, 3), Weight::Normal);

        let mut s = session("xaab");
        let tag = s.toggle(1..3, Toggle::Bold).unwrap();
        // start edge: pushed right, not absorbed
        type_text(&mut s, 1, "a");
        assert_eq!(s.doc().text(), "xaaab");
        assert_eq!(s.tags().tag_ranges(tag), vec![2..4]);
        assert_eq!(weight_at(&s, 1), Weight::Normal);
        assert_eq!(s.overlay().annotations()[0].range, 2..4);
    }

    #[test]
    fn test_backspace_in_repeated_run_shrinks_it() {
        let mut s = session("aaa");
        let tag = s.toggle(0..2, Toggle::Bold).unwrap();

        // backspace with the caret after the second "a"
        let previous = s.doc().text().to_string();
        s.doc.text_mut().remove(1);
        s.text_changed(previous, 1);

        assert_eq!(s.doc().text(), "aa");
        assert_eq!(s.tags().tag_ranges(tag), vec![0..1]);
        assert_eq!(weight_at(&s, 1), Weight::Normal);
    }

    #[test]
    fn test_selection_commands_noop_when_empty() {
        let mut s = session("text");
        assert_eq!(s.toggle(2..2, Toggle::Bold), None);
        assert!(!s.copy(1..1));
        assert_eq!(s.cut(3..3), None);
        assert_eq!(s.delete_selection(0..0), None);
        assert_eq!(s.clear_formatting(0..0), 0);
        assert_eq!(s.doc().text(), "text");
        assert!(!s.doc().can_undo());
    }

    #[test]
    fn test_cut_and_paste_move_text() {
        let mut s = session("one two three");
        let tag = s.toggle(8..13, Toggle::Underline).unwrap();

        assert_eq!(s.cut(0..4), Some(0));
        assert_eq!(s.doc().text(), "two three");
        assert_eq!(s.tags().tag_ranges(tag), vec![4..9]);

        assert_eq!(s.paste(9..9), Some(13));
        assert_eq!(s.doc().text(), "two threeone ");

        // paste replaces a selection
        assert_eq!(s.paste(0..3), Some(4));
        assert_eq!(s.doc().text(), "one  threeone ");
    }

    #[test]
    fn test_paste_with_empty_clipboard() {
        let mut s = session("abc");
        assert_eq!(s.paste(1..1), None);
        assert_eq!(s.doc().text(), "abc");
    }

    #[test]
    fn test_undo_redo_move_tags_with_text() {
        let mut s = session("hello");
        let tag = s.toggle(2..5, Toggle::Bold).unwrap();
        type_text(&mut s, 0, ">> ");
        assert_eq!(s.tags().tag_ranges(tag), vec![5..8]);

        assert_eq!(s.undo(), Some(0));
        assert_eq!(s.doc().text(), "hello");
        assert_eq!(s.tags().tag_ranges(tag), vec![2..5]);

        assert!(s.redo().is_some());
        assert_eq!(s.doc().text(), ">> hello");
        assert_eq!(s.tags().tag_ranges(tag), vec![5..8]);
        assert_eq!(s.undo(), Some(0));
        assert_eq!(s.undo(), None);
    }

    #[test]
    fn test_new_document_resets_everything() {
        let mut s = session("abc");
        s.toggle(0..3, Toggle::Bold);
        s.new_document();
        assert_eq!(s.doc().text(), "");
        assert!(s.overlay().is_empty());
        assert_eq!(s.doc().display_title(), "untitled");
    }

    #[test]
    fn test_compact_styles() {
        let mut s = session("abcdef");
        s.toggle(0..3, Toggle::Bold);
        s.toggle(0..3, Toggle::Bold);
        let report = s.compact_styles();
        assert_eq!(report.removed(), 1);
        assert_eq!(weight_at(&s, 1), Weight::Normal);
    }

    #[test]
    fn test_status_line() {
        let s = session("ab\ncde");
        assert_eq!(s.status_line(4, None), "line: 2, column: 1 | chars: 6");
        assert_eq!(s.status_line(6, Some(3..6)), "line: 2, column: 3 | chars: 6 | selected: 3");
        assert_eq!(s.status_line(0, Some(2..2)), "line: 1, column: 0 | chars: 6");
    }

    #[test]
    fn test_select_all() {
        let s = session("héllo");
        assert_eq!(s.select_all(), 0..5);
    }
}
