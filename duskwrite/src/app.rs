//! duskwrite main window
//!
//! Menu bar, toolbar, the styled editor, a status bar and the modal
//! dialogs. The text widget is egui's multiline `TextEdit`; its layout is
//! produced from the session's tag layer, and every edit it makes is
//! reconciled back into the session after the frame.

use crate::clipboard::Clipboard;
use crate::dialogs::{
    ColorDialog, ExitDialog, FileDialog, FileMode, FontDialog, MessageDialog, Outcome,
};
use crate::render;
use crate::session::EditorSession;
use crate::settings::EditorSettings;
use crate::style::{ColorChannel, Toggle};
use duskcore::fonts::FontBook;
use duskcore::storage::documents_dir;
use duskcore::theme::{consume_special_keys, menu_bar, DuskColors, DuskTheme};
use duskcore::widgets::{status_bar, toolbar_separator, ToolbarButton};
use egui::text::{CCursor, CCursorRange};
use egui::{Context, Key, RichText};
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Everything a menu entry, toolbar button or shortcut can ask for.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    New,
    Open,
    Save,
    SaveAs,
    Exit,
    SelectAll,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    Delete,
    Font,
    Toggle(Toggle),
    Color(ColorChannel),
    ClearFormatting,
    CompactStyles,
    About,
    Developer,
}

pub struct DuskWriteApp {
    session: EditorSession,
    settings: EditorSettings,
    settings_path: PathBuf,
    fonts: FontBook,
    editor_id: egui::Id,
    /// Char index of the text cursor.
    cursor: usize,
    /// Last known selection, kept while focus is in a menu or dialog.
    selection: Option<Range<usize>>,
    /// Selection to push into the text widget on the next frame.
    pending_selection: Option<Range<usize>>,
    message: Option<String>,
    title: String,
    file_dialog: Option<FileDialog>,
    font_dialog: Option<FontDialog>,
    color_dialog: Option<ColorDialog>,
    message_dialog: Option<MessageDialog>,
    show_exit_confirm: bool,
    exit_confirmed: bool,
}

impl DuskWriteApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: EditorSettings, settings_path: PathBuf) -> Self {
        let fonts = FontBook::install(&cc.egui_ctx);
        let session = EditorSession::new(settings.default_style(), Clipboard::new());
        let app = Self {
            session,
            settings,
            settings_path,
            fonts,
            editor_id: egui::Id::new("duskwrite_editor"),
            cursor: 0,
            selection: None,
            pending_selection: None,
            message: None,
            title: String::new(),
            file_dialog: None,
            font_dialog: None,
            color_dialog: None,
            message_dialog: None,
            show_exit_confirm: false,
            exit_confirmed: false,
        };
        app.apply_theme(&cc.egui_ctx);
        app
    }

    fn apply_theme(&self, ctx: &Context) {
        DuskTheme::default()
            .with_surface(self.settings.bg_color.to_color32(), self.settings.fg_color.to_color32())
            .apply(ctx);
    }

    /// The current selection, empty when nothing is selected.
    fn selection(&self) -> Range<usize> {
        self.selection.clone().unwrap_or(self.cursor..self.cursor)
    }

    fn select(&mut self, range: Range<usize>) {
        self.cursor = range.end;
        self.selection = Some(range.clone());
        self.pending_selection = Some(range);
    }

    fn place_cursor(&mut self, pos: usize) {
        self.select(pos..pos);
    }

    fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    fn report_error(&mut self, message: String) {
        error!("{}", message);
        self.message_dialog = Some(MessageDialog::error(message));
    }

    fn save_settings(&self) {
        if let Err(e) = self.settings.save(&self.settings_path) {
            error!("cannot save settings to {}: {}", self.settings_path.display(), e);
        }
    }

    fn dialog_dir(&self) -> PathBuf {
        self.session
            .doc()
            .path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(documents_dir)
    }

    fn run(&mut self, ctx: &Context, command: Command) {
        match command {
            Command::New => {
                self.session.new_document();
                self.place_cursor(0);
                self.set_message("new file created");
            }
            Command::Open => self.file_dialog = Some(FileDialog::open(self.dialog_dir())),
            Command::Save => {
                if self.session.doc().path.is_some() {
                    match self.session.save() {
                        Ok(()) => self.after_save(),
                        Err(e) => self.report_error(e.to_string()),
                    }
                } else {
                    self.run(ctx, Command::SaveAs);
                }
            }
            Command::SaveAs => {
                let name = self.session.doc().file_name();
                self.file_dialog = Some(FileDialog::save(self.dialog_dir(), name));
            }
            Command::Exit => self.request_exit(),
            Command::SelectAll => {
                let all = self.session.select_all();
                self.select(all);
            }
            Command::Undo => {
                if let Some(pos) = self.session.undo() {
                    self.place_cursor(pos);
                }
            }
            Command::Redo => {
                if let Some(pos) = self.session.redo() {
                    self.place_cursor(pos);
                }
            }
            Command::Cut => {
                let selection = self.selection();
                if let Some(pos) = self.session.cut(selection) {
                    self.place_cursor(pos);
                }
            }
            Command::Copy => {
                let selection = self.selection();
                self.session.copy(selection);
            }
            Command::Paste => {
                let selection = self.selection();
                if let Some(pos) = self.session.paste(selection) {
                    self.place_cursor(pos);
                }
            }
            Command::Delete => {
                let selection = self.selection();
                if let Some(pos) = self.session.delete_selection(selection) {
                    self.place_cursor(pos);
                }
            }
            Command::Font => {
                self.font_dialog = Some(FontDialog::new(&self.settings.font_family, self.settings.font_size));
            }
            Command::Toggle(toggle) => {
                let selection = self.selection();
                self.session.toggle(selection, toggle);
            }
            Command::Color(channel) => {
                if !self.selection().is_empty() {
                    let initial = match channel {
                        ColorChannel::Foreground => self.settings.fg_color,
                        ColorChannel::Background => self.settings.bg_color,
                    };
                    self.color_dialog = Some(ColorDialog::new(channel, initial));
                }
            }
            Command::ClearFormatting => {
                let selection = self.selection();
                self.session.clear_formatting(selection);
            }
            Command::CompactStyles => {
                let report = self.session.compact_styles();
                self.set_message(format!("styles: {} -> {}", report.before, report.after));
            }
            Command::About => self.message_dialog = Some(MessageDialog::about()),
            Command::Developer => self.message_dialog = Some(MessageDialog::developer()),
        }
        ctx.request_repaint();
    }

    fn open_file(&mut self, path: &Path) {
        match self.session.open(path) {
            Ok(()) => {
                self.place_cursor(0);
                self.settings.add_recent(path);
                self.save_settings();
                self.set_message(format!("opened {}", path.display()));
            }
            Err(e) => self.report_error(e.to_string()),
        }
    }

    fn save_as(&mut self, path: &Path) {
        match self.session.save_as(path) {
            Ok(()) => self.after_save(),
            Err(e) => self.report_error(e.to_string()),
        }
    }

    fn after_save(&mut self) {
        if let Some(path) = self.session.doc().path.clone() {
            self.settings.add_recent(&path);
            self.save_settings();
            self.set_message(format!("saved {}", path.display()));
        }
    }

    /// Settings are written before the confirmation, so they persist even
    /// if the user cancels.
    fn request_exit(&mut self) {
        self.save_settings();
        self.show_exit_confirm = true;
    }

    /// Intercept shortcuts before the text widget consumes them. Typing,
    /// cursor movement, select all and clipboard keys stay with the widget.
    fn handle_keyboard(&mut self, ctx: &Context) {
        consume_special_keys(ctx);

        let mut commands = Vec::new();
        ctx.input_mut(|i| {
            let events = std::mem::take(&mut i.events);
            let mut remaining = Vec::with_capacity(events.len());
            for event in events {
                let command = match &event {
                    egui::Event::Key { key, pressed: true, modifiers, .. } if modifiers.command => {
                        match key {
                            Key::N => Some(Command::New),
                            Key::O => Some(Command::Open),
                            Key::S if modifiers.shift => Some(Command::SaveAs),
                            Key::S => Some(Command::Save),
                            Key::Z if modifiers.shift => Some(Command::Redo),
                            Key::Z => Some(Command::Undo),
                            Key::Y => Some(Command::Redo),
                            Key::B => Some(Command::Toggle(Toggle::Bold)),
                            Key::I => Some(Command::Toggle(Toggle::Italic)),
                            Key::U => Some(Command::Toggle(Toggle::Underline)),
                            _ => None,
                        }
                    }
                    _ => None,
                };
                match command {
                    Some(c) => commands.push(c),
                    None => remaining.push(event),
                }
            }
            i.events = remaining;
        });

        for command in commands {
            self.run(ctx, command);
        }
    }

    fn render_menu_bar(&mut self, ui: &mut egui::Ui) -> Option<Command> {
        let can_undo = self.session.doc().can_undo();
        let can_redo = self.session.doc().can_redo();
        let mut command = None;
        menu_bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                menu_item(ui, "New", "\u{2318}N", Command::New, &mut command);
                menu_item(ui, "Open...", "\u{2318}O", Command::Open, &mut command);
                ui.menu_button("Open recent", |ui| {
                    if self.settings.recent_files.is_empty() {
                        ui.label("no recent files");
                    }
                    for path in self.settings.recent_files.files.clone() {
                        if ui.button(path.display().to_string()).clicked() {
                            self.open_file(&path);
                            ui.close_menu();
                        }
                    }
                });
                menu_item(ui, "Save", "\u{2318}S", Command::Save, &mut command);
                menu_item(ui, "Save as...", "\u{21e7}\u{2318}S", Command::SaveAs, &mut command);
                ui.separator();
                menu_item(ui, "Exit", "", Command::Exit, &mut command);
            });
            ui.menu_button("Edit", |ui| {
                menu_item(ui, "Select all", "\u{2318}A", Command::SelectAll, &mut command);
                ui.add_enabled_ui(can_undo, |ui| {
                    menu_item(ui, "Undo", "\u{2318}Z", Command::Undo, &mut command);
                });
                ui.add_enabled_ui(can_redo, |ui| {
                    menu_item(ui, "Redo", "\u{2318}Y", Command::Redo, &mut command);
                });
                ui.separator();
                edit_items(ui, &mut command);
            });
            ui.menu_button("Format", |ui| format_items(ui, &mut command));
            ui.menu_button("Help", |ui| {
                menu_item(ui, "About", "", Command::About, &mut command);
                menu_item(ui, "From the developer", "", Command::Developer, &mut command);
            });
        });
        command
    }

    fn render_toolbar(&self, ui: &mut egui::Ui) -> Option<Command> {
        let style = self
            .session
            .overlay()
            .resolve_effective_style(self.session.tags(), self.selection().start);
        let mut command = None;
        egui::Frame::none()
            .fill(DuskColors::MENU)
            .inner_margin(egui::Margin::symmetric(6.0, 3.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let mut button = |ui: &mut egui::Ui, text: RichText, selected: bool, c: Command| {
                        if ui.add(ToolbarButton::new(text).selected(selected)).clicked() {
                            command = Some(c);
                        }
                    };
                    button(ui, "New".into(), false, Command::New);
                    button(ui, "Open".into(), false, Command::Open);
                    button(ui, "Save".into(), false, Command::Save);
                    toolbar_separator(ui);
                    button(ui, RichText::new("B").strong(), style.is_bold(), Command::Toggle(Toggle::Bold));
                    button(ui, RichText::new("I").italics(), style.is_italic(), Command::Toggle(Toggle::Italic));
                    button(ui, RichText::new("U").underline(), style.underline, Command::Toggle(Toggle::Underline));
                    toolbar_separator(ui);
                    button(ui, "Cut".into(), false, Command::Cut);
                    button(ui, "Copy".into(), false, Command::Copy);
                    button(ui, "Paste".into(), false, Command::Paste);
                    toolbar_separator(ui);
                    button(ui, "Select all".into(), false, Command::SelectAll);
                });
            });
        command
    }

    fn render_editor(&mut self, ui: &mut egui::Ui) -> Option<Command> {
        let previous = self.session.doc().text().to_string();
        let edit_start = self.selection().start;
        let can_undo = self.session.doc().can_undo();
        let fonts = &self.fonts;
        let (text, tags, defaults) = self.session.editor_parts();

        let mut layouter = |ui: &egui::Ui, text: &str, wrap_width: f32| {
            let job = render::layout_job(text, tags, defaults, fonts, wrap_width);
            ui.fonts(|f| f.layout_job(job))
        };

        let mut command = None;
        let output = egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::TextEdit::multiline(text)
                    .id(self.editor_id)
                    .frame(false)
                    .lock_focus(true)
                    .desired_width(f32::INFINITY)
                    .desired_rows(20)
                    .layouter(&mut layouter)
                    .show(ui)
            })
            .inner;

        output.response.context_menu(|ui| {
            ui.add_enabled_ui(can_undo, |ui| {
                menu_item(ui, "Undo", "\u{2318}Z", Command::Undo, &mut command);
            });
            ui.separator();
            edit_items(ui, &mut command);
            ui.separator();
            menu_item(ui, "Select all", "\u{2318}A", Command::SelectAll, &mut command);
            ui.menu_button("Format", |ui| format_items(ui, &mut command));
        });

        let caret_after = output
            .cursor_range
            .as_ref()
            .map_or(usize::MAX, |range| range.primary.ccursor.index);
        let anchor = edit_start.min(caret_after);
        if output.response.changed() && self.session.text_changed(previous, anchor) {
            self.message = None;
        }

        if let Some(range) = &output.cursor_range {
            let primary = range.primary.ccursor.index;
            let secondary = range.secondary.ccursor.index;
            let selection = primary.min(secondary)..primary.max(secondary);
            if self.cursor != primary || self.selection.as_ref() != Some(&selection) {
                self.message = None;
            }
            self.cursor = primary;
            self.selection = Some(selection);
        }

        if let Some(range) = self.pending_selection.take() {
            let ctx = ui.ctx();
            if let Some(mut state) = egui::TextEdit::load_state(ctx, self.editor_id) {
                state.cursor.set_char_range(Some(CCursorRange::two(
                    CCursor::new(range.start),
                    CCursor::new(range.end),
                )));
                state.store(ctx, self.editor_id);
            }
            ctx.memory_mut(|m| m.request_focus(self.editor_id));
            ctx.request_repaint();
        }

        command
    }

    fn status_text(&self) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => self.session.status_line(self.cursor, self.selection.clone()),
        }
    }

    fn render_dialogs(&mut self, ctx: &Context) {
        if let Some(dialog) = &mut self.file_dialog {
            if let Some(outcome) = dialog.show(ctx) {
                let mode = dialog.mode;
                self.file_dialog = None;
                if let Outcome::Confirmed(path) = outcome {
                    match mode {
                        FileMode::Open => self.open_file(&path),
                        FileMode::Save => self.save_as(&path),
                    }
                }
            }
        }

        if let Some(dialog) = &mut self.font_dialog {
            if let Some(outcome) = dialog.show(ctx) {
                self.font_dialog = None;
                if let Outcome::Confirmed(font) = outcome {
                    info!("default font set to {} {}", font.family, font.size);
                    self.settings.set_font(&font.family, font.size);
                    self.session.set_defaults(self.settings.default_style());
                    self.save_settings();
                }
            }
        }

        if let Some(dialog) = &mut self.color_dialog {
            if let Some(outcome) = dialog.show(ctx) {
                let channel = dialog.channel;
                self.color_dialog = None;
                if let Outcome::Confirmed(color) = outcome {
                    let selection = self.selection();
                    self.session.color(selection, channel, color);
                    self.pending_selection = self.selection.clone();
                }
            }
        }

        if let Some(dialog) = &self.message_dialog {
            if dialog.show(ctx) {
                self.message_dialog = None;
            }
        }

        if self.show_exit_confirm {
            match ExitDialog::show(ctx) {
                Some(Outcome::Confirmed(())) => {
                    info!("exiting");
                    self.exit_confirmed = true;
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                Some(Outcome::Cancelled) => self.show_exit_confirm = false,
                None => {}
            }
        }
    }

    fn update_title(&mut self, ctx: &Context) {
        let title = format!("Text Editor - {}", self.session.doc().display_title());
        if title != self.title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.title = title;
        }
    }
}

fn menu_item(ui: &mut egui::Ui, label: &str, shortcut: &str, command: Command, out: &mut Option<Command>) {
    if ui.add(egui::Button::new(label).shortcut_text(shortcut)).clicked() {
        *out = Some(command);
        ui.close_menu();
    }
}

fn edit_items(ui: &mut egui::Ui, out: &mut Option<Command>) {
    menu_item(ui, "Cut", "\u{2318}X", Command::Cut, out);
    menu_item(ui, "Copy", "\u{2318}C", Command::Copy, out);
    menu_item(ui, "Paste", "\u{2318}V", Command::Paste, out);
    menu_item(ui, "Delete", "", Command::Delete, out);
}

fn format_items(ui: &mut egui::Ui, out: &mut Option<Command>) {
    menu_item(ui, "Font...", "", Command::Font, out);
    ui.separator();
    menu_item(ui, "Bold", "\u{2318}B", Command::Toggle(Toggle::Bold), out);
    menu_item(ui, "Italic", "\u{2318}I", Command::Toggle(Toggle::Italic), out);
    menu_item(ui, "Underline", "\u{2318}U", Command::Toggle(Toggle::Underline), out);
    ui.separator();
    menu_item(ui, "Text colour...", "", Command::Color(ColorChannel::Foreground), out);
    menu_item(ui, "Background colour...", "", Command::Color(ColorChannel::Background), out);
    ui.separator();
    menu_item(ui, "Clear formatting", "", Command::ClearFormatting, out);
    menu_item(ui, "Compact styles", "", Command::CompactStyles, out);
}

impl eframe::App for DuskWriteApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_keyboard(ctx);

        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw.dropped_files.iter().filter_map(|f| f.path.clone()).collect()
        });
        if let Some(path) = dropped.into_iter().next() {
            let ext = path.extension().map(|e| e.to_string_lossy().to_lowercase()).unwrap_or_default();
            if ext == "txt" || ext == "md" {
                self.open_file(&path);
            }
        }

        let mut commands = Vec::new();
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            commands.extend(self.render_menu_bar(ui));
        });
        egui::TopBottomPanel::top("toolbar")
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                commands.extend(self.render_toolbar(ui));
            });
        egui::TopBottomPanel::bottom("status_bar")
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                status_bar(ui, &self.status_text());
            });
        let surface = DuskTheme::default()
            .with_surface(self.settings.bg_color.to_color32(), self.settings.fg_color.to_color32());
        egui::CentralPanel::default()
            .frame(surface.editor_frame())
            .show(ctx, |ui| {
                commands.extend(self.render_editor(ui));
            });

        for command in commands {
            self.run(ctx, command);
        }

        self.render_dialogs(ctx);
        self.update_title(ctx);

        if ctx.input(|i| i.viewport().close_requested()) && !self.exit_confirmed {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            if !self.show_exit_confirm {
                self.request_exit();
            }
        }
    }
}
