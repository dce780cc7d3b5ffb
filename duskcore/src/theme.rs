//! Dusk theme. Dark aubergine chrome with an orange accent.
//!
//! Flat widgets, no rounding, no shadows. The editor surface colours come
//! from the user's settings; everything else is fixed.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

/// Fixed chrome palette.
pub struct DuskColors;

impl DuskColors {
    pub const WINDOW: Color32 = Color32::from_rgb(0x30, 0x0a, 0x24);
    pub const MENU: Color32 = Color32::from_rgb(0x2d, 0x0c, 0x22);
    pub const HIGHLIGHT: Color32 = Color32::from_rgb(0x4a, 0x1e, 0x3d);
    pub const ACCENT: Color32 = Color32::from_rgb(0xe9, 0x54, 0x20);
    pub const TEXT: Color32 = Color32::from_rgb(0xff, 0xff, 0xff);
}

/// Theme configuration for dusk apps
pub struct DuskTheme {
    pub font_size_body: f32,
    pub font_size_heading: f32,
    pub font_size_small: f32,
    pub window_padding: f32,
    pub item_spacing: f32,
    /// Editor surface background.
    pub surface: Color32,
    /// Editor text colour.
    pub text: Color32,
}

impl Default for DuskTheme {
    fn default() -> Self {
        Self {
            font_size_body: 13.0,
            font_size_heading: 20.0,
            font_size_small: 11.0,
            window_padding: 10.0,
            item_spacing: 4.0,
            surface: DuskColors::WINDOW,
            text: DuskColors::TEXT,
        }
    }
}

impl DuskTheme {
    pub fn with_surface(mut self, surface: Color32, text: Color32) -> Self {
        self.surface = surface;
        self.text = text;
        self
    }

    /// Apply the dusk theme to an egui context
    pub fn apply(&self, ctx: &egui::Context) {
        let mut style = Style::default();

        style.text_styles = [
            (TextStyle::Small, FontId::new(self.font_size_small, FontFamily::Proportional)),
            (TextStyle::Body, FontId::new(self.font_size_body, FontFamily::Proportional)),
            (TextStyle::Button, FontId::new(self.font_size_body, FontFamily::Proportional)),
            (TextStyle::Heading, FontId::new(self.font_size_heading, FontFamily::Proportional)),
            (TextStyle::Monospace, FontId::new(self.font_size_body, FontFamily::Monospace)),
        ]
        .into();

        let mut visuals = Visuals::dark();

        visuals.override_text_color = Some(DuskColors::TEXT);
        visuals.window_fill = DuskColors::WINDOW;
        visuals.panel_fill = DuskColors::MENU;
        visuals.faint_bg_color = DuskColors::MENU;
        visuals.extreme_bg_color = self.surface;
        visuals.text_cursor.color = self.text;

        visuals.window_rounding = Rounding::ZERO;
        visuals.menu_rounding = Rounding::ZERO;
        visuals.window_stroke = Stroke::new(1.0, DuskColors::HIGHLIGHT);

        let flat = |ws: &mut egui::style::WidgetVisuals, fill: Color32| {
            ws.bg_fill = fill;
            ws.weak_bg_fill = fill;
            ws.bg_stroke = Stroke::NONE;
            ws.fg_stroke = Stroke::new(1.0, DuskColors::TEXT);
            ws.rounding = Rounding::ZERO;
        };
        flat(&mut visuals.widgets.noninteractive, DuskColors::MENU);
        flat(&mut visuals.widgets.inactive, DuskColors::HIGHLIGHT);
        flat(&mut visuals.widgets.hovered, DuskColors::ACCENT);
        flat(&mut visuals.widgets.active, DuskColors::ACCENT);
        flat(&mut visuals.widgets.open, DuskColors::HIGHLIGHT);
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, DuskColors::HIGHLIGHT);

        visuals.window_shadow = egui::epaint::Shadow::NONE;
        visuals.popup_shadow = egui::epaint::Shadow::NONE;

        visuals.selection.bg_fill = DuskColors::ACCENT;
        visuals.selection.stroke = Stroke::new(1.0, DuskColors::TEXT);

        style.visuals = visuals;

        style.spacing.window_margin = egui::Margin::same(self.window_padding);
        style.spacing.item_spacing = egui::vec2(self.item_spacing, self.item_spacing);
        style.spacing.button_padding = egui::vec2(8.0, 3.0);

        ctx.set_style(style);
    }

    /// Editor surface: user background, generous padding
    pub fn editor_frame(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.surface)
            .inner_margin(egui::Margin::same(15.0))
    }
}

/// Menu bar styling helper
pub fn menu_bar<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> egui::InnerResponse<R> {
    let frame_resp = egui::Frame::none()
        .fill(DuskColors::MENU)
        .inner_margin(egui::Margin::symmetric(4.0, 2.0))
        .show(ui, |ui| egui::menu::bar(ui, add_contents).inner);
    egui::InnerResponse {
        inner: frame_resp.inner,
        response: frame_resp.response,
    }
}

/// Consume key events that would otherwise leak out of the editor:
/// Tab focus cycling and Cmd+/Cmd- zoom. Tab characters typed into text
/// are kept.
pub fn consume_special_keys(ctx: &egui::Context) {
    let tab_pressed = ctx.input(|i| {
        i.events.iter().any(|e| matches!(e,
            egui::Event::Key { key: egui::Key::Tab, pressed: true, .. }
        ))
    });

    let focused_before = if tab_pressed {
        ctx.memory(|mem| mem.focused())
    } else {
        None
    };

    ctx.input_mut(|i| {
        i.events.retain(|event| match event {
            egui::Event::Key { key, modifiers, .. } if modifiers.command => {
                !matches!(key, egui::Key::Plus | egui::Key::Minus | egui::Key::Equals)
            }
            _ => true,
        });
    });

    // Tab cycling is decided before update() runs; undo it by refocusing
    // whatever had focus.
    if let Some(id) = focused_before {
        ctx.memory_mut(|mem| mem.request_focus(id));
    }
}
