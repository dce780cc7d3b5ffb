//! System clipboard access for the menu, toolbar and context-menu commands.
//!
//! Keyboard shortcuts go through egui's own clipboard handling in the text
//! widget. When the system clipboard cannot be opened (headless sessions,
//! some Wayland setups) text is kept in-process so cut / paste still work
//! inside the editor.

use tracing::warn;

pub struct Clipboard {
    system: Option<arboard::Clipboard>,
    local: String,
}

impl Clipboard {
    pub fn new() -> Self {
        let system = match arboard::Clipboard::new() {
            Ok(c) => Some(c),
            Err(e) => {
                warn!("system clipboard unavailable: {}", e);
                None
            }
        };
        Self { system, local: String::new() }
    }

    /// A clipboard that never touches the system one.
    #[cfg(test)]
    pub fn local_only() -> Self {
        Self { system: None, local: String::new() }
    }

    pub fn set_text(&mut self, text: &str) {
        self.local = text.to_string();
        if let Some(system) = &mut self.system {
            if let Err(e) = system.set_text(text.to_string()) {
                warn!("cannot write system clipboard: {}", e);
            }
        }
    }

    /// Clipboard text; `None` when it holds nothing textual.
    pub fn get_text(&mut self) -> Option<String> {
        if let Some(system) = &mut self.system {
            match system.get_text() {
                Ok(text) => return Some(text),
                Err(e) => warn!("cannot read system clipboard: {}", e),
            }
        }
        (!self.local.is_empty()).then(|| self.local.clone())
    }
}
