//! Rendering-side tag store.
//!
//! Works like a text widget's tag facility: every tag has a configured
//! style and a set of character ranges it covers. Tags are drawn in id
//! order, later tags on top. The store follows edits to the text so tags
//! stay attached to the characters they were applied to.

use super::record::{StyleAttrs, TagId};
use duskcore::text::TextChange;
use std::collections::BTreeMap;
use std::ops::Range;

/// Operations the style manager needs from the widget that shows the text.
pub trait TagTarget {
    /// Give a tag its visual style. Reconfiguring replaces the style.
    fn configure_tag(&mut self, tag: TagId, attrs: &StyleAttrs);
    /// Cover `range` with `tag`.
    fn add_tag(&mut self, tag: TagId, range: Range<usize>);
    /// Uncover `range`; ranges that stick out on either side are split.
    fn remove_tag(&mut self, tag: TagId, range: Range<usize>);
    /// Forget a tag entirely.
    fn delete_tag(&mut self, tag: TagId);
    /// Tags covering `pos`, oldest first.
    fn tags_at(&self, pos: usize) -> Vec<TagId>;
    /// Tags covering at least one character of `range`, oldest first.
    fn tags_in(&self, range: Range<usize>) -> Vec<TagId>;
    /// Ranges currently covered by `tag`, sorted and disjoint.
    fn tag_ranges(&self, tag: TagId) -> Vec<Range<usize>>;
}

#[derive(Debug, Clone, Default, PartialEq)]
struct TagEntry {
    attrs: StyleAttrs,
    ranges: Vec<Range<usize>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagLayer {
    tags: BTreeMap<TagId, TagEntry>,
}

impl TagLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Number of tags known to the layer, covering text or not.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn attrs(&self, tag: TagId) -> Option<&StyleAttrs> {
        self.tags.get(&tag).map(|e| &e.attrs)
    }

    /// Configured styles of every tag covering `pos`, folded oldest first.
    pub fn attrs_at(&self, pos: usize) -> StyleAttrs {
        let mut acc = StyleAttrs::default();
        for entry in self.tags.values() {
            if entry.ranges.iter().any(|r| r.contains(&pos)) {
                acc.overlay(&entry.attrs);
            }
        }
        acc
    }

    /// Move every range to follow a text change.
    pub fn apply_change(&mut self, change: &TextChange) {
        for entry in self.tags.values_mut() {
            let shifted = entry
                .ranges
                .iter()
                .filter_map(|r| shift_range(r.clone(), change))
                .collect();
            entry.ranges = normalize(shifted);
        }
    }

    /// Split `0..len` into runs over which the set of covering tags is
    /// constant.
    pub fn segments(&self, len: usize) -> Vec<Range<usize>> {
        let mut cuts = vec![0, len];
        for entry in self.tags.values() {
            for r in &entry.ranges {
                cuts.push(r.start.min(len));
                cuts.push(r.end.min(len));
            }
        }
        cuts.sort_unstable();
        cuts.dedup();
        cuts.windows(2)
            .filter(|w| w[0] < w[1])
            .map(|w| w[0]..w[1])
            .collect()
    }
}

impl TagTarget for TagLayer {
    fn configure_tag(&mut self, tag: TagId, attrs: &StyleAttrs) {
        self.tags.entry(tag).or_default().attrs = attrs.clone();
    }

    fn add_tag(&mut self, tag: TagId, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let entry = self.tags.entry(tag).or_default();
        entry.ranges.push(range);
        entry.ranges = normalize(std::mem::take(&mut entry.ranges));
    }

    fn remove_tag(&mut self, tag: TagId, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        if let Some(entry) = self.tags.get_mut(&tag) {
            entry.ranges = subtract(&entry.ranges, &range);
        }
    }

    fn delete_tag(&mut self, tag: TagId) {
        self.tags.remove(&tag);
    }

    fn tags_at(&self, pos: usize) -> Vec<TagId> {
        self.tags
            .iter()
            .filter(|(_, e)| e.ranges.iter().any(|r| r.contains(&pos)))
            .map(|(id, _)| *id)
            .collect()
    }

    fn tags_in(&self, range: Range<usize>) -> Vec<TagId> {
        self.tags
            .iter()
            .filter(|(_, e)| e.ranges.iter().any(|r| r.start < range.end && range.start < r.end))
            .map(|(id, _)| *id)
            .collect()
    }

    fn tag_ranges(&self, tag: TagId) -> Vec<Range<usize>> {
        self.tags.get(&tag).map(|e| e.ranges.clone()).unwrap_or_default()
    }
}

/// Where `range` ends up after `change`, or `None` if all of its characters
/// were deleted.
///
/// Text inserted strictly inside a range joins it; text inserted at its
/// start pushes it right; text inserted at its end stays outside.
pub fn shift_range(range: Range<usize>, change: &TextChange) -> Option<Range<usize>> {
    let del_end = change.start + change.removed;
    let collapse = |x: usize| {
        if x <= change.start {
            x
        } else if x >= del_end {
            x - change.removed
        } else {
            change.start
        }
    };
    let mut start = collapse(range.start);
    let mut end = collapse(range.end);
    if start >= end {
        return None;
    }
    if start >= change.start {
        start += change.inserted;
    }
    if end > change.start {
        end += change.inserted;
    }
    Some(start..end)
}

/// Sort and merge overlapping or touching ranges, dropping empty ones.
fn normalize(mut ranges: Vec<Range<usize>>) -> Vec<Range<usize>> {
    ranges.retain(|r| !r.is_empty());
    ranges.sort_by_key(|r| r.start);
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for r in ranges {
        match merged.last_mut() {
            Some(last) if r.start <= last.end => last.end = last.end.max(r.end),
            _ => merged.push(r),
        }
    }
    merged
}

fn subtract(ranges: &[Range<usize>], cut: &Range<usize>) -> Vec<Range<usize>> {
    let mut out = Vec::with_capacity(ranges.len() + 1);
    for r in ranges {
        if r.end <= cut.start || r.start >= cut.end {
            out.push(r.clone());
            continue;
        }
        if r.start < cut.start {
            out.push(r.start..cut.start);
        }
        if cut.end < r.end {
            out.push(cut.end..r.end);
        }
    }
    out
}
