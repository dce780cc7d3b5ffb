//! Modal windows: file browser, font picker, colour picker and the
//! message boxes.
//!
//! Each dialog is a small state struct whose `show` returns `None` while
//! it stays open and `Some(outcome)` on the frame it is closed.

use crate::style::ColorChannel;
use duskcore::fonts::{FONT_CHOICES, FONT_SIZES};
use duskcore::storage::FileBrowser;
use duskcore::theme::DuskColors;
use duskcore::widgets::ListItem;
use duskcore::Rgb;
use egui::{Align2, Context, RichText};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Confirmed(T),
    Cancelled,
}

fn modal(title: &str) -> egui::Window<'_> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
}

fn accent_button(ui: &mut egui::Ui, label: &str) -> egui::Response {
    ui.add(egui::Button::new(RichText::new(label).color(DuskColors::TEXT)).fill(DuskColors::ACCENT))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Open,
    Save,
}

pub struct FileDialog {
    pub mode: FileMode,
    browser: FileBrowser,
    filename: String,
}

impl FileDialog {
    const EXTENSIONS: &'static [&'static str] = &["txt", "md"];

    pub fn open(start_dir: PathBuf) -> Self {
        Self {
            mode: FileMode::Open,
            browser: FileBrowser::new(start_dir).with_filter(Self::EXTENSIONS),
            filename: String::new(),
        }
    }

    pub fn save(start_dir: PathBuf, filename: String) -> Self {
        Self {
            mode: FileMode::Save,
            browser: FileBrowser::new(start_dir).with_filter(Self::EXTENSIONS),
            filename,
        }
    }

    pub fn show(&mut self, ctx: &Context) -> Option<Outcome<PathBuf>> {
        let mut outcome = None;
        let title = match self.mode {
            FileMode::Open => "open",
            FileMode::Save => "save as",
        };
        modal(title).default_width(420.0).show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("location:");
                ui.label(self.browser.current_dir.to_string_lossy().to_string());
            });
            ui.separator();
            egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                let entries = self.browser.entries.clone();
                for (idx, entry) in entries.iter().enumerate() {
                    let selected = self.browser.selected_index == Some(idx);
                    let response = ui.add(ListItem::file(&entry.name, entry.is_directory).selected(selected));
                    if response.clicked() {
                        self.browser.selected_index = Some(idx);
                        if self.mode == FileMode::Save && !entry.is_directory {
                            self.filename = entry.name.clone();
                        }
                    }
                    if response.double_clicked() {
                        if entry.is_directory {
                            self.browser.navigate_to(entry.path.clone());
                        } else if self.mode == FileMode::Open {
                            outcome = Some(Outcome::Confirmed(entry.path.clone()));
                        }
                    }
                }
            });
            if self.mode == FileMode::Save {
                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("file name:");
                    ui.text_edit_singleline(&mut self.filename);
                });
            }
            ui.separator();
            ui.horizontal(|ui| {
                let label = match self.mode {
                    FileMode::Open => "open",
                    FileMode::Save => "save",
                };
                if accent_button(ui, label).clicked() {
                    outcome = self.confirm().map(Outcome::Confirmed);
                }
                if ui.button("cancel").clicked() {
                    outcome = Some(Outcome::Cancelled);
                }
            });
        });
        outcome
    }

    fn confirm(&self) -> Option<PathBuf> {
        match self.mode {
            FileMode::Open => self
                .browser
                .selected_entry()
                .filter(|e| !e.is_directory)
                .map(|e| e.path.clone()),
            FileMode::Save => {
                let name = self.filename.trim();
                if name.is_empty() {
                    return None;
                }
                let mut path = self.browser.save_directory().join(name);
                if path.extension().is_none() {
                    path.set_extension("txt");
                }
                Some(path)
            }
        }
    }
}

/// Family and size chosen in the font dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSelection {
    pub family: String,
    pub size: u32,
}

pub struct FontDialog {
    family: Option<usize>,
    size: Option<usize>,
    error: Option<&'static str>,
}

impl FontDialog {
    /// Preselect the current defaults; an unknown size falls back to 12.
    pub fn new(family: &str, size: u32) -> Self {
        let family = FONT_CHOICES.iter().position(|c| c.name == family);
        let size = FONT_SIZES
            .iter()
            .position(|s| *s == size)
            .or_else(|| FONT_SIZES.iter().position(|s| *s == 12));
        Self { family, size, error: None }
    }

    pub fn selection(&self) -> Option<FontSelection> {
        Some(FontSelection {
            family: FONT_CHOICES.get(self.family?)?.name.to_string(),
            size: *FONT_SIZES.get(self.size?)?,
        })
    }

    pub fn show(&mut self, ctx: &Context) -> Option<Outcome<FontSelection>> {
        let mut outcome = None;
        modal("font").default_width(380.0).show(ctx, |ui| {
            ui.columns(2, |cols| {
                cols[0].label("font:");
                egui::ScrollArea::vertical().id_source("font_families").max_height(200.0).show(&mut cols[0], |ui| {
                    for (idx, choice) in FONT_CHOICES.iter().enumerate() {
                        if ui.add(ListItem::new(choice.name).selected(self.family == Some(idx))).clicked() {
                            self.family = Some(idx);
                        }
                    }
                });
                cols[1].label("size:");
                egui::ScrollArea::vertical().id_source("font_sizes").max_height(200.0).show(&mut cols[1], |ui| {
                    for (idx, size) in FONT_SIZES.iter().enumerate() {
                        if ui.add(ListItem::new(&size.to_string()).selected(self.size == Some(idx))).clicked() {
                            self.size = Some(idx);
                        }
                    }
                });
            });
            if let Some(error) = self.error {
                ui.colored_label(DuskColors::ACCENT, error);
            }
            ui.separator();
            ui.horizontal(|ui| {
                if accent_button(ui, "ok").clicked() {
                    match self.selection() {
                        Some(selection) => outcome = Some(Outcome::Confirmed(selection)),
                        None => self.error = Some("choose a font and a size"),
                    }
                }
                if ui.button("cancel").clicked() {
                    outcome = Some(Outcome::Cancelled);
                }
            });
        });
        outcome
    }
}

pub struct ColorDialog {
    pub channel: ColorChannel,
    color: egui::Color32,
}

impl ColorDialog {
    pub fn new(channel: ColorChannel, initial: Rgb) -> Self {
        Self { channel, color: initial.to_color32() }
    }

    pub fn show(&mut self, ctx: &Context) -> Option<Outcome<Rgb>> {
        let mut outcome = None;
        let title = match self.channel {
            ColorChannel::Foreground => "text colour",
            ColorChannel::Background => "background colour",
        };
        modal(title).show(ctx, |ui| {
            egui::color_picker::color_picker_color32(ui, &mut self.color, egui::color_picker::Alpha::Opaque);
            ui.label(Rgb::from_color32(self.color).to_string());
            ui.separator();
            ui.horizontal(|ui| {
                if accent_button(ui, "ok").clicked() {
                    outcome = Some(Outcome::Confirmed(Rgb::from_color32(self.color)));
                }
                if ui.button("cancel").clicked() {
                    outcome = Some(Outcome::Cancelled);
                }
            });
        });
        outcome
    }
}

/// Which informational window to show.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageKind {
    Error(String),
    About,
    Developer,
}

pub struct MessageDialog {
    pub kind: MessageKind,
}

impl MessageDialog {
    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: MessageKind::Error(message.into()) }
    }

    pub fn about() -> Self {
        Self { kind: MessageKind::About }
    }

    pub fn developer() -> Self {
        Self { kind: MessageKind::Developer }
    }

    /// Returns true once dismissed.
    pub fn show(&self, ctx: &Context) -> bool {
        let mut closed = false;
        let title = match self.kind {
            MessageKind::Error(_) => "error",
            MessageKind::About => "about",
            MessageKind::Developer => "from the developer",
        };
        modal(title).default_width(360.0).show(ctx, |ui| {
            match &self.kind {
                MessageKind::Error(message) => {
                    ui.label(message);
                }
                MessageKind::About => about_contents(ui),
                MessageKind::Developer => developer_contents(ui),
            }
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if accent_button(ui, "ok").clicked() {
                    closed = true;
                }
            });
        });
        closed
    }
}

fn about_contents(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.heading(RichText::new("Text Editor").color(DuskColors::ACCENT).strong());
        ui.label(format!("version {}", env!("CARGO_PKG_VERSION")));
        ui.add_space(8.0);
        ui.label("a dark-themed text editor with per-range formatting");
    });
    ui.add_space(8.0);
    ui.label(RichText::new("features").color(DuskColors::ACCENT).strong());
    for feature in [
        "bold, italic and underline on any selection",
        "text and background colours",
        "font family and size for the whole document",
        "settings kept between sessions",
        "context menu and keyboard shortcuts",
        "cursor position and character count",
    ] {
        ui.label(format!("  \u{2022} {feature}"));
    }
    ui.add_space(4.0);
    ui.label(RichText::new("formatting lives only in the open window; files are saved as plain text").small());
}

fn developer_contents(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.heading(RichText::new("from the developer").color(DuskColors::ACCENT).strong());
    });
    ui.add_space(8.0);
    egui::Grid::new("developer_info").num_columns(2).spacing([12.0, 4.0]).show(ui, |ui| {
        for (label, value) in [
            ("authors:", env!("CARGO_PKG_AUTHORS")),
            ("license:", env!("CARGO_PKG_LICENSE")),
            ("built with:", "Rust, egui and eframe"),
        ] {
            ui.label(RichText::new(label).color(DuskColors::ACCENT).strong());
            ui.label(value);
            ui.end_row();
        }
    });
    ui.add_space(8.0);
    ui.label(RichText::new("the look borrows from Ubuntu's dark aubergine desktop").small());
}

pub struct ExitDialog;

impl ExitDialog {
    pub fn show(ctx: &Context) -> Option<Outcome<()>> {
        let mut outcome = None;
        modal("exit").show(ctx, |ui| {
            ui.label("are you sure you want to exit?");
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if accent_button(ui, "ok").clicked() {
                    outcome = Some(Outcome::Confirmed(()));
                }
                if ui.button("cancel").clicked() {
                    outcome = Some(Outcome::Cancelled);
                }
            });
        });
        outcome
    }
}
