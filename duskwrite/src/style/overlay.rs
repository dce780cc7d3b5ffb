//! Style overlay manager.
//!
//! Every formatting command resolves the style at the start of the
//! selection, derives a new full style from it and allocates a brand new
//! record (`tag_<n>`) that is laid over the selection. Older records are
//! never edited or merged; the effective style of a character is the fold
//! of all records tagging it, oldest first. The table only shrinks on
//! [`StyleOverlay::reset`] or an explicit [`StyleOverlay::compact`].

use super::record::{
    ColorChannel, DefaultStyle, EffectiveStyle, StyleAttrs, StyleRecord, TagId, Toggle,
};
use super::tags::{shift_range, TagTarget};
use duskcore::text::TextChange;
use duskcore::Rgb;
use std::collections::BTreeMap;
use std::ops::Range;
use tracing::debug;

/// A record applied over a character range, as it was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeAnnotation {
    pub tag: TagId,
    pub range: Range<usize>,
}

/// Outcome of [`StyleOverlay::compact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompactionReport {
    pub before: usize,
    pub after: usize,
    /// Records whose tag no longer covers any character.
    pub unreachable: usize,
    /// Records completely overridden by later ones wherever they apply.
    pub shadowed: usize,
}

impl CompactionReport {
    pub fn removed(&self) -> usize {
        self.before - self.after
    }
}

#[derive(Debug, Clone, Default)]
pub struct StyleOverlay {
    defaults: DefaultStyle,
    records: BTreeMap<TagId, StyleRecord>,
    annotations: Vec<RangeAnnotation>,
    next_tag: u64,
}

impl StyleOverlay {
    pub fn new(defaults: DefaultStyle) -> Self {
        Self {
            defaults,
            ..Default::default()
        }
    }

    pub fn defaults(&self) -> &DefaultStyle {
        &self.defaults
    }

    /// Change the style of untagged text. Existing records keep the font
    /// they were created with.
    pub fn set_defaults(&mut self, defaults: DefaultStyle) {
        self.defaults = defaults;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, tag: TagId) -> Option<&StyleRecord> {
        self.records.get(&tag)
    }

    pub fn annotations(&self) -> &[RangeAnnotation] {
        &self.annotations
    }

    /// Id the next allocation will receive.
    pub fn next_tag(&self) -> TagId {
        TagId(self.next_tag)
    }

    /// Drop every record and restart naming at `tag_0`.
    pub fn reset(&mut self) {
        self.records.clear();
        self.annotations.clear();
        self.next_tag = 0;
    }

    /// Fold of every record tagging `pos`, oldest first. Only attributes
    /// some record defines are set.
    pub fn merged_attrs_at<T: TagTarget + ?Sized>(&self, target: &T, pos: usize) -> StyleAttrs {
        let mut acc = StyleAttrs::default();
        for record in target.tags_at(pos).iter().filter_map(|t| self.records.get(t)) {
            acc.overlay(&record.attrs);
        }
        acc
    }

    /// Style a character at `pos` is drawn with.
    pub fn resolve_effective_style<T: TagTarget + ?Sized>(
        &self,
        target: &T,
        pos: usize,
    ) -> EffectiveStyle {
        EffectiveStyle::from_attrs(&self.merged_attrs_at(target, pos), &self.defaults)
    }

    /// Flip bold, italic or underline over `range`. Returns the new tag, or
    /// `None` for an empty range.
    pub fn apply_toggle<T: TagTarget + ?Sized>(
        &mut self,
        target: &mut T,
        range: Range<usize>,
        toggle: Toggle,
    ) -> Option<TagId> {
        if range.is_empty() {
            return None;
        }
        let attrs = self
            .merged_attrs_at(target, range.start)
            .toggled(toggle, &self.defaults);
        Some(self.allocate(target, attrs, range))
    }

    /// Set the foreground or background colour over `range`.
    pub fn apply_color<T: TagTarget + ?Sized>(
        &mut self,
        target: &mut T,
        range: Range<usize>,
        channel: ColorChannel,
        color: Rgb,
    ) -> Option<TagId> {
        if range.is_empty() {
            return None;
        }
        let attrs = self
            .merged_attrs_at(target, range.start)
            .with_color(channel, color);
        Some(self.allocate(target, attrs, range))
    }

    /// Strip every tag from `range`. Records and annotations stay; only
    /// the tag coverage changes. Returns how many tags were touched.
    pub fn clear_formatting<T: TagTarget + ?Sized>(
        &mut self,
        target: &mut T,
        range: Range<usize>,
    ) -> usize {
        if range.is_empty() {
            return 0;
        }
        let tags = target.tags_in(range.clone());
        for tag in &tags {
            target.remove_tag(*tag, range.clone());
        }
        debug!("cleared {} tags over {:?}", tags.len(), range);
        tags.len()
    }

    /// Keep annotation ranges aligned with the text after an edit.
    pub fn apply_change(&mut self, change: &TextChange) {
        for annotation in &mut self.annotations {
            annotation.range = shift_range(annotation.range.clone(), change)
                .unwrap_or(change.start..change.start);
        }
    }

    /// Remove records that no longer affect how any character looks:
    /// those whose tag covers nothing, and those whose every attribute is
    /// redefined by later records wherever the tag applies. The effective
    /// style of every position is unchanged; the name counter is kept.
    pub fn compact<T: TagTarget + ?Sized>(&mut self, target: &mut T) -> CompactionReport {
        let mut report = CompactionReport {
            before: self.records.len(),
            ..Default::default()
        };

        let mut doomed = Vec::new();
        for (&tag, record) in &self.records {
            let ranges = target.tag_ranges(tag);
            if ranges.is_empty() {
                report.unreachable += 1;
                doomed.push(tag);
            } else if self.is_shadowed(target, record, &ranges) {
                report.shadowed += 1;
                doomed.push(tag);
            }
        }

        for tag in &doomed {
            self.records.remove(tag);
            target.delete_tag(*tag);
        }
        self.annotations.retain(|a| self.records.contains_key(&a.tag));

        report.after = self.records.len();
        debug!(
            "compacted styles: {} -> {} ({} unreachable, {} shadowed)",
            report.before, report.after, report.unreachable, report.shadowed
        );
        report
    }

    fn allocate<T: TagTarget + ?Sized>(
        &mut self,
        target: &mut T,
        attrs: StyleAttrs,
        range: Range<usize>,
    ) -> TagId {
        let tag = TagId(self.next_tag);
        self.next_tag += 1;

        target.configure_tag(tag, &attrs);
        target.add_tag(tag, range.clone());
        debug!("allocated {} over {:?}: {:?}", tag, range, attrs);

        self.records.insert(tag, StyleRecord { tag, attrs });
        self.annotations.push(RangeAnnotation { tag, range });
        tag
    }

    /// Whether later records redefine all of `record`'s attributes on every
    /// character `record` covers.
    fn is_shadowed<T: TagTarget + ?Sized>(
        &self,
        target: &T,
        record: &StyleRecord,
        ranges: &[Range<usize>],
    ) -> bool {
        if record.attrs.is_empty() {
            return true;
        }
        let later: Vec<&StyleRecord> = self
            .records
            .range(TagId(record.tag.0 + 1)..)
            .map(|(_, r)| r)
            .collect();
        if later.is_empty() {
            return false;
        }

        ranges.iter().all(|range| {
            let mut cuts = vec![range.start, range.end];
            for r in &later {
                for covered in target.tag_ranges(r.tag) {
                    for x in [covered.start, covered.end] {
                        if range.contains(&x) {
                            cuts.push(x);
                        }
                    }
                }
            }
            cuts.sort_unstable();
            cuts.dedup();

            cuts.windows(2).all(|w| {
                let mut above = StyleAttrs::default();
                for tag in target.tags_at(w[0]) {
                    if tag > record.tag {
                        if let Some(r) = self.records.get(&tag) {
                            above.overlay(&r.attrs);
                        }
                    }
                }
                above.defines_all_of(&record.attrs)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::record::{Slant, Weight};
    use crate::style::tags::TagLayer;
    use proptest::prelude::*;

    fn setup() -> (StyleOverlay, TagLayer) {
        (StyleOverlay::new(DefaultStyle::default()), TagLayer::new())
    }

    #[test]
    fn test_untagged_position_has_default_style() {
        let (overlay, layer) = setup();
        let eff = overlay.resolve_effective_style(&layer, 3);
        assert_eq!(eff, EffectiveStyle::from_attrs(&StyleAttrs::default(), overlay.defaults()));
    }

    #[test]
    fn test_later_annotation_wins_on_conflicts_only() {
        let (mut overlay, mut layer) = setup();
        let red = Rgb::new(0xff, 0, 0);
        let blue = Rgb::new(0, 0, 0xff);
        overlay.apply_color(&mut layer, 0..10, ColorChannel::Foreground, red);
        overlay.apply_toggle(&mut layer, 5..15, Toggle::Italic);
        overlay.apply_color(&mut layer, 5..8, ColorChannel::Foreground, blue);

        // covered by all three
        let eff = overlay.resolve_effective_style(&layer, 6);
        assert_eq!(eff.foreground, blue);
        assert_eq!(eff.slant, Slant::Italic);

        // covered by the first two
        let eff = overlay.resolve_effective_style(&layer, 9);
        assert_eq!(eff.foreground, red);
        assert_eq!(eff.slant, Slant::Italic);

        // only the second; it started inside the red run and took red along
        let eff = overlay.resolve_effective_style(&layer, 12);
        assert_eq!(eff.foreground, red);
        assert_eq!(eff.slant, Slant::Italic);
    }

    #[test]
    fn test_overlap_keeps_keys_only_the_older_record_defines() {
        let (mut overlay, mut layer) = setup();
        let red = Rgb::new(0xff, 0, 0);
        let blue = Rgb::new(0, 0, 0xff);
        let a = overlay
            .apply_color(&mut layer, 25..30, ColorChannel::Foreground, red)
            .unwrap();
        // starts on plain text, so it leaves the colours undefined
        let b = overlay.apply_toggle(&mut layer, 20..28, Toggle::Italic).unwrap();
        assert_eq!(overlay.record(b).unwrap().attrs.foreground, None);

        let eff = overlay.resolve_effective_style(&layer, 26);
        assert_eq!(eff.foreground, red);
        assert_eq!(eff.slant, Slant::Italic);
        assert_eq!(layer.tags_at(26), vec![a, b]);

        // a later record defining the foreground wins over the older one
        overlay.apply_color(&mut layer, 22..27, ColorChannel::Foreground, blue);
        let eff = overlay.resolve_effective_style(&layer, 26);
        assert_eq!(eff.foreground, blue);
        assert_eq!(eff.slant, Slant::Italic);
        assert_eq!(overlay.resolve_effective_style(&layer, 27).foreground, red);
        assert_eq!(
            overlay.resolve_effective_style(&layer, 21).foreground,
            overlay.defaults().foreground
        );
    }

    #[test]
    fn test_bold_twice_scenario() {
        let (mut overlay, mut layer) = setup();
        let defaults = overlay.defaults().clone();

        let first = overlay.apply_toggle(&mut layer, 0..5, Toggle::Bold);
        assert_eq!(first, Some(TagId(0)));
        let eff = overlay.resolve_effective_style(&layer, 2);
        assert_eq!(eff.weight, Weight::Bold);
        assert_eq!(eff.family, defaults.family);
        assert_eq!(eff.size, defaults.size);

        let second = overlay.apply_toggle(&mut layer, 0..5, Toggle::Bold);
        assert_eq!(second, Some(TagId(1)));
        assert_eq!(overlay.resolve_effective_style(&layer, 2).weight, Weight::Normal);

        // both records remain in the table
        assert_eq!(overlay.len(), 2);
        assert_eq!(overlay.annotations().len(), 2);
        assert_eq!(layer.tags_at(2), vec![TagId(0), TagId(1)]);
    }

    #[test]
    fn test_empty_range_is_noop() {
        let (mut overlay, mut layer) = setup();
        overlay.apply_toggle(&mut layer, 0..3, Toggle::Underline);
        let before_layer = layer.clone();

        assert_eq!(overlay.apply_toggle(&mut layer, 4..4, Toggle::Bold), None);
        assert_eq!(overlay.apply_color(&mut layer, 2..2, ColorChannel::Background, Rgb::BLACK), None);
        assert_eq!(overlay.clear_formatting(&mut layer, 1..1), 0);

        assert_eq!(overlay.len(), 1);
        assert_eq!(overlay.annotations().len(), 1);
        assert_eq!(overlay.next_tag(), TagId(1));
        assert_eq!(layer, before_layer);
    }

    #[test]
    fn test_toggle_carries_other_attributes() {
        let (mut overlay, mut layer) = setup();
        let green = Rgb::new(0, 0x80, 0);
        overlay.apply_color(&mut layer, 0..10, ColorChannel::Background, green);
        overlay.apply_toggle(&mut layer, 0..10, Toggle::Underline);
        let tag = overlay.apply_toggle(&mut layer, 2..4, Toggle::Bold).unwrap();

        let record = overlay.record(tag).unwrap();
        assert_eq!(record.attrs.background, Some(green));
        assert_eq!(record.attrs.underline, Some(true));
        assert_eq!(record.attrs.weight, Some(Weight::Bold));
        assert_eq!(record.attrs.family.as_deref(), Some("Ubuntu Mono"));
        assert_eq!(layer.attrs(tag), Some(&record.attrs));
        assert_eq!(layer.tag_ranges(tag), vec![2..4]);
    }

    #[test]
    fn test_style_resolved_at_selection_start() {
        let (mut overlay, mut layer) = setup();
        overlay.apply_toggle(&mut layer, 0..3, Toggle::Bold);
        // selection starts on plain text, so the new record makes it all bold
        let tag = overlay.apply_toggle(&mut layer, 3..8, Toggle::Bold).unwrap();
        assert_eq!(overlay.record(tag).unwrap().attrs.weight, Some(Weight::Bold));
        // selection starts on bold text, so the whole range becomes normal
        overlay.apply_toggle(&mut layer, 1..8, Toggle::Bold);
        for pos in 1..8 {
            assert_eq!(overlay.resolve_effective_style(&layer, pos).weight, Weight::Normal);
        }
        assert_eq!(overlay.resolve_effective_style(&layer, 0).weight, Weight::Bold);
    }

    #[test]
    fn test_color_does_not_pin_font() {
        let (mut overlay, mut layer) = setup();
        let tag = overlay
            .apply_color(&mut layer, 0..4, ColorChannel::Foreground, Rgb::BLACK)
            .unwrap();
        let attrs = &overlay.record(tag).unwrap().attrs;
        assert_eq!(attrs.family, None);
        assert_eq!(attrs.size, None);

        overlay.set_defaults(DefaultStyle { size: 20, ..DefaultStyle::default() });
        assert_eq!(overlay.resolve_effective_style(&layer, 1).size, 20);
    }

    #[test]
    fn test_clear_formatting_subrange() {
        let (mut overlay, mut layer) = setup();
        overlay.apply_toggle(&mut layer, 0..10, Toggle::Bold);
        overlay.apply_color(&mut layer, 5..15, ColorChannel::Foreground, Rgb::BLACK);

        let touched = overlay.clear_formatting(&mut layer, 3..7);
        assert_eq!(touched, 2);
        assert_eq!(overlay.resolve_effective_style(&layer, 4).weight, Weight::Normal);
        assert_eq!(overlay.resolve_effective_style(&layer, 6).foreground, overlay.defaults().foreground);
        assert_eq!(overlay.resolve_effective_style(&layer, 2).weight, Weight::Bold);
        assert_eq!(overlay.resolve_effective_style(&layer, 8).foreground, Rgb::BLACK);

        // records and annotations are not trimmed
        assert_eq!(overlay.len(), 2);
        assert_eq!(overlay.annotations()[0].range, 0..10);
        assert_eq!(layer.tag_ranges(TagId(0)), vec![0..3, 7..10]);
    }

    #[test]
    fn test_reset_restarts_names() {
        let (mut overlay, mut layer) = setup();
        overlay.apply_toggle(&mut layer, 0..2, Toggle::Bold);
        overlay.apply_toggle(&mut layer, 0..2, Toggle::Italic);
        overlay.reset();
        layer.clear();
        assert!(overlay.is_empty());
        assert!(overlay.annotations().is_empty());
        assert_eq!(overlay.apply_toggle(&mut layer, 0..2, Toggle::Bold), Some(TagId(0)));
    }

    #[test]
    fn test_annotations_follow_edits() {
        let (mut overlay, mut layer) = setup();
        overlay.apply_toggle(&mut layer, 4..8, Toggle::Bold);
        let change = TextChange::insertion(0, 3);
        overlay.apply_change(&change);
        layer.apply_change(&change);
        assert_eq!(overlay.annotations()[0].range, 7..11);
        assert_eq!(layer.tag_ranges(TagId(0)), vec![7..11]);
    }

    #[test]
    fn test_compact_removes_shadowed_and_unreachable() {
        let (mut overlay, mut layer) = setup();
        overlay.apply_toggle(&mut layer, 0..5, Toggle::Bold); // tag_0
        overlay.apply_toggle(&mut layer, 0..5, Toggle::Bold); // tag_1 shadows tag_0
        overlay.apply_color(&mut layer, 10..12, ColorChannel::Foreground, Rgb::BLACK); // tag_2
        overlay.clear_formatting(&mut layer, 10..12); // tag_2 unreachable
        overlay.apply_toggle(&mut layer, 20..30, Toggle::Italic); // tag_3
        overlay.apply_toggle(&mut layer, 22..24, Toggle::Italic); // tag_4, partial cover of tag_3

        let report = overlay.compact(&mut layer);
        assert_eq!(report.before, 5);
        assert_eq!(report.unreachable, 1);
        assert_eq!(report.shadowed, 1);
        assert_eq!(report.after, 3);
        assert_eq!(report.removed(), 2);

        assert!(overlay.record(TagId(0)).is_none());
        assert!(overlay.record(TagId(2)).is_none());
        assert!(overlay.record(TagId(3)).is_some());
        assert_eq!(layer.len(), 3);
        assert_eq!(overlay.annotations().len(), 3);
        assert_eq!(overlay.resolve_effective_style(&layer, 2).weight, Weight::Normal);
        // counter is not reused
        assert_eq!(overlay.next_tag(), TagId(5));
    }

    #[test]
    fn test_colour_only_record_does_not_shadow_font() {
        let (mut overlay, mut layer) = setup();
        overlay.apply_toggle(&mut layer, 0..5, Toggle::Bold);
        overlay.apply_color(&mut layer, 0..5, ColorChannel::Foreground, Rgb::BLACK);
        // the colour record was built from the merged bold style, so it
        // redefines the font too
        let report = overlay.compact(&mut layer);
        assert_eq!(report.shadowed, 1);
        assert_eq!(overlay.resolve_effective_style(&layer, 0).weight, Weight::Bold);

        // a colour that only partly covers the bold record keeps it alive
        let (mut overlay, mut layer) = setup();
        overlay.apply_toggle(&mut layer, 0..5, Toggle::Bold);
        overlay.apply_color(&mut layer, 3..9, ColorChannel::Foreground, Rgb::BLACK);
        assert_eq!(overlay.compact(&mut layer).shadowed, 0);
        assert_eq!(overlay.len(), 2);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Toggle(Range<usize>, Toggle),
        Color(Range<usize>, ColorChannel, Rgb),
        Clear(Range<usize>),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        let range = (0usize..20, 0usize..20).prop_map(|(a, b)| a.min(b)..a.max(b));
        let toggle = prop_oneof![Just(Toggle::Bold), Just(Toggle::Italic), Just(Toggle::Underline)];
        let channel = prop_oneof![Just(ColorChannel::Foreground), Just(ColorChannel::Background)];
        prop_oneof![
            (range.clone(), toggle).prop_map(|(r, t)| Op::Toggle(r, t)),
            (range.clone(), channel, any::<(u8, u8, u8)>())
                .prop_map(|(r, c, (red, g, b))| Op::Color(r, c, Rgb::new(red, g, b))),
            range.prop_map(Op::Clear),
        ]
    }

    fn run(ops: &[Op]) -> (StyleOverlay, TagLayer) {
        let (mut overlay, mut layer) = setup();
        for op in ops {
            match op.clone() {
                Op::Toggle(r, t) => {
                    overlay.apply_toggle(&mut layer, r, t);
                }
                Op::Color(r, c, rgb) => {
                    overlay.apply_color(&mut layer, r, c, rgb);
                }
                Op::Clear(r) => {
                    overlay.clear_formatting(&mut layer, r);
                }
            }
        }
        (overlay, layer)
    }

    proptest! {
        #[test]
        fn double_toggle_restores_start_style(
            ops in proptest::collection::vec(op_strategy(), 0..12),
            start in 0usize..19,
            len in 1usize..6,
        ) {
            let (mut overlay, mut layer) = run(&ops);
            let range = start..(start + len);
            let before = overlay.resolve_effective_style(&layer, start);
            overlay.apply_toggle(&mut layer, range.clone(), Toggle::Bold);
            overlay.apply_toggle(&mut layer, range, Toggle::Bold);
            let after = overlay.resolve_effective_style(&layer, start);
            prop_assert_eq!(before.weight, after.weight);
        }

        #[test]
        fn compaction_preserves_effective_style(ops in proptest::collection::vec(op_strategy(), 0..16)) {
            let (mut overlay, mut layer) = run(&ops);
            let before: Vec<EffectiveStyle> =
                (0..22).map(|p| overlay.resolve_effective_style(&layer, p)).collect();
            overlay.compact(&mut layer);
            let after: Vec<EffectiveStyle> =
                (0..22).map(|p| overlay.resolve_effective_style(&layer, p)).collect();
            prop_assert_eq!(before, after);
        }
    }
}
