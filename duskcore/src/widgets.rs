//! Custom widgets: flat dusk-coloured buttons, bars and list rows.

use crate::theme::DuskColors;
use egui::{Response, RichText, Ui, Widget};

/// A flat toolbar button. Highlighted when hovered, accent when pressed or
/// `selected`.
pub struct ToolbarButton {
    text: RichText,
    selected: bool,
}

impl ToolbarButton {
    pub fn new(text: impl Into<RichText>) -> Self {
        Self { text: text.into(), selected: false }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl Widget for ToolbarButton {
    fn ui(self, ui: &mut Ui) -> Response {
        let padding = egui::vec2(8.0, 3.0);
        let galley = egui::WidgetText::from(self.text.color(DuskColors::TEXT)).into_galley(
            ui,
            Some(false),
            f32::INFINITY,
            egui::TextStyle::Button,
        );
        let desired_size = egui::vec2(
            galley.size().x + padding.x * 2.0,
            (galley.size().y + padding.y * 2.0).max(ui.spacing().interact_size.y),
        );
        let (rect, response) = ui.allocate_exact_size(desired_size, egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let pressed = response.is_pointer_button_down_on() || self.selected;
            let fill = if pressed || response.hovered() {
                DuskColors::ACCENT
            } else {
                DuskColors::HIGHLIGHT
            };
            ui.painter().rect_filled(rect, 0.0, fill);
            let text_pos = rect.center() - galley.size() / 2.0;
            ui.painter().galley(text_pos, galley, DuskColors::TEXT);
        }

        response
    }
}

/// Toolbar separator (vertical 1px highlight line)
pub fn toolbar_separator(ui: &mut Ui) {
    let height = ui.spacing().interact_size.y;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, height), egui::Sense::hover());

    if ui.is_rect_visible(rect) {
        ui.painter().vline(
            rect.center().x,
            rect.y_range(),
            egui::Stroke::new(1.0, DuskColors::HIGHLIGHT),
        );
    }
}

/// Status bar: menu colour, small text
pub fn status_bar(ui: &mut Ui, text: &str) {
    egui::Frame::none()
        .fill(DuskColors::MENU)
        .inner_margin(egui::Margin::symmetric(10.0, 3.0))
        .show(ui, |ui| {
            ui.label(RichText::new(text).small().color(DuskColors::TEXT));
        });
}

/// Selectable row for list boxes (file browser, font and size pickers).
pub struct ListItem<'a> {
    label: &'a str,
    icon: Option<&'a str>,
    selected: bool,
}

impl<'a> ListItem<'a> {
    pub fn new(label: &'a str) -> Self {
        Self { label, icon: None, selected: false }
    }

    /// File browser row with a folder or document icon.
    pub fn file(name: &'a str, is_directory: bool) -> Self {
        Self {
            label: name,
            icon: Some(if is_directory { "📁" } else { "📄" }),
            selected: false,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl<'a> Widget for ListItem<'a> {
    fn ui(self, ui: &mut Ui) -> Response {
        let height = 20.0;
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), height),
            egui::Sense::click(),
        );

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            let fill = if self.selected {
                DuskColors::ACCENT
            } else if response.hovered() {
                DuskColors::HIGHLIGHT
            } else {
                DuskColors::MENU
            };
            painter.rect_filled(rect, 0.0, fill);

            let mut x = rect.min.x + 6.0;
            if let Some(icon) = self.icon {
                painter.text(
                    egui::pos2(x + 6.0, rect.center().y),
                    egui::Align2::CENTER_CENTER,
                    icon,
                    egui::FontId::proportional(12.0),
                    DuskColors::TEXT,
                );
                x += 18.0;
            }
            painter.text(
                egui::pos2(x, rect.center().y),
                egui::Align2::LEFT_CENTER,
                self.label,
                egui::FontId::proportional(12.0),
                DuskColors::TEXT,
            );
        }

        response
    }
}
