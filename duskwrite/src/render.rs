//! Turns the buffer plus its tags into an egui `LayoutJob`.

use crate::style::{DefaultStyle, EffectiveStyle, TagLayer};
use duskcore::fonts::FontBook;
use duskcore::text::{char_len, char_range_to_bytes};
use egui::text::{LayoutJob, TextFormat};
use egui::{Color32, Stroke};

/// Text format for one run of text drawn with `style`.
pub fn text_format(style: &EffectiveStyle, defaults: &DefaultStyle, fonts: &FontBook) -> TextFormat {
    let color = style.foreground.to_color32();
    // untouched background stays transparent so the selection shows through
    let background = if style.background == defaults.background {
        Color32::TRANSPARENT
    } else {
        style.background.to_color32()
    };
    TextFormat {
        font_id: fonts.font_id(&style.family, style.size, style.is_bold()),
        color,
        background,
        italics: style.is_italic(),
        underline: if style.underline { Stroke::new(1.0, color) } else { Stroke::NONE },
        ..Default::default()
    }
}

/// Lay out `text` with one section per run of constant tag coverage.
pub fn layout_job(
    text: &str,
    tags: &TagLayer,
    defaults: &DefaultStyle,
    fonts: &FontBook,
    wrap_width: f32,
) -> LayoutJob {
    let mut job = LayoutJob::default();
    job.wrap.max_width = wrap_width;

    let len = char_len(text);
    if len == 0 {
        let style = EffectiveStyle::from_attrs(&Default::default(), defaults);
        job.append("", 0.0, text_format(&style, defaults, fonts));
        return job;
    }

    for run in tags.segments(len) {
        let style = EffectiveStyle::from_attrs(&tags.attrs_at(run.start), defaults);
        let bytes = char_range_to_bytes(text, run);
        job.append(&text[bytes], 0.0, text_format(&style, defaults, fonts));
    }
    job
}
