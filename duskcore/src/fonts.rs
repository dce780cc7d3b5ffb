//! System font discovery.
//!
//! The editor offers a fixed list of font families. Each one is registered
//! with egui as a named family backed by a font file found on disk, falling
//! back to egui's built-in proportional or monospace fonts. Bold faces are
//! registered as a second family (`"<name> Bold"`) when a bold file exists.

use egui::{FontData, FontDefinitions, FontFamily, FontId};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// A family offered in the font dialog together with the file names that
/// provide it on the common platforms.
#[derive(Debug, Clone, Copy)]
pub struct FontChoice {
    pub name: &'static str,
    pub monospace: bool,
    regular: &'static [&'static str],
    bold: &'static [&'static str],
}

pub const FONT_CHOICES: &[FontChoice] = &[
    FontChoice { name: "Ubuntu Mono", monospace: true, regular: &["ubuntumono-r.ttf", "ubuntumono-regular.ttf"], bold: &["ubuntumono-b.ttf", "ubuntumono-bold.ttf"] },
    FontChoice { name: "Consolas", monospace: true, regular: &["consola.ttf"], bold: &["consolab.ttf"] },
    FontChoice { name: "Courier New", monospace: true, regular: &["cour.ttf", "courier_new.ttf", "courier new.ttf"], bold: &["courbd.ttf", "courier_new_bold.ttf", "courier new bold.ttf"] },
    FontChoice { name: "Arial", monospace: false, regular: &["arial.ttf"], bold: &["arialbd.ttf", "arial_bold.ttf", "arial bold.ttf"] },
    FontChoice { name: "Times New Roman", monospace: false, regular: &["times.ttf", "times_new_roman.ttf", "times new roman.ttf"], bold: &["timesbd.ttf", "times_new_roman_bold.ttf", "times new roman bold.ttf"] },
    FontChoice { name: "Verdana", monospace: false, regular: &["verdana.ttf"], bold: &["verdanab.ttf", "verdana_bold.ttf", "verdana bold.ttf"] },
    FontChoice { name: "Tahoma", monospace: false, regular: &["tahoma.ttf"], bold: &["tahomabd.ttf", "tahoma bold.ttf"] },
    FontChoice { name: "Georgia", monospace: false, regular: &["georgia.ttf"], bold: &["georgiab.ttf", "georgia_bold.ttf", "georgia bold.ttf"] },
    FontChoice { name: "Comic Sans MS", monospace: false, regular: &["comic.ttf", "comic_sans_ms.ttf", "comic sans ms.ttf"], bold: &["comicbd.ttf", "comic_sans_ms_bold.ttf", "comic sans ms bold.ttf"] },
    FontChoice { name: "Impact", monospace: false, regular: &["impact.ttf"], bold: &[] },
];

/// Sizes offered in the font dialog, in points.
pub const FONT_SIZES: &[u32] = &[8, 9, 10, 11, 12, 14, 16, 18, 20, 22, 24, 26, 28, 36, 48, 72];

/// Used for bold runs of families that have no bold file of their own.
const GENERIC_BOLD_MONO: &[&str] = &["dejavusansmono-bold.ttf", "liberationmono-bold.ttf", "ubuntumono-b.ttf", "courbd.ttf"];
const GENERIC_BOLD_SANS: &[&str] = &["dejavusans-bold.ttf", "liberationsans-bold.ttf", "ubuntu-b.ttf", "arialbd.ttf"];

const BOLD_MONO_FAMILY: &str = "dusk-bold-mono";
const BOLD_SANS_FAMILY: &str = "dusk-bold-sans";

/// Points to logical pixels.
pub const POINTS_TO_PIXELS: f32 = 4.0 / 3.0;

/// Families registered with egui, used to build `FontId`s that are
/// guaranteed to exist. egui panics on unknown named families, so every
/// lookup goes through here.
#[derive(Debug, Clone, Default)]
pub struct FontBook {
    families: HashSet<String>,
    bold_families: HashSet<String>,
    generic_bold_mono: bool,
    generic_bold_sans: bool,
}

impl FontBook {
    /// A book with no named families: every lookup resolves to egui's
    /// built-in proportional or monospace fonts.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Scan the system font directories and build the egui font definitions.
    pub fn discover() -> (FontDefinitions, FontBook) {
        let index = index_font_files(&font_search_dirs());
        let mut fonts = FontDefinitions::default();
        let mut book = FontBook::default();

        let base_mono = fonts.families.get(&FontFamily::Monospace).cloned().unwrap_or_default();
        let base_sans = fonts.families.get(&FontFamily::Proportional).cloned().unwrap_or_default();

        let load = |fonts: &mut FontDefinitions, candidates: &[&str]| -> Option<String> {
            let path = candidates.iter().find_map(|c| index.get(*c))?;
            match std::fs::read(path) {
                Ok(data) => {
                    let key = path.to_string_lossy().to_string();
                    fonts.font_data.insert(key.clone(), FontData::from_owned(data));
                    Some(key)
                }
                Err(e) => {
                    tracing::warn!("cannot read font {}: {}", path.display(), e);
                    None
                }
            }
        };

        for choice in FONT_CHOICES {
            let base = if choice.monospace { &base_mono } else { &base_sans };
            let mut regular = base.clone();
            if let Some(key) = load(&mut fonts, choice.regular) {
                regular.insert(0, key);
            } else {
                tracing::debug!("font {} not found, using built-in fallback", choice.name);
            }
            if let Some(key) = load(&mut fonts, choice.bold) {
                let mut bold = regular.clone();
                bold.insert(0, key);
                fonts.families.insert(FontFamily::Name(bold_name(choice.name).into()), bold);
                book.bold_families.insert(choice.name.to_string());
            }
            fonts.families.insert(FontFamily::Name(choice.name.into()), regular);
            book.families.insert(choice.name.to_string());
        }

        if let Some(key) = load(&mut fonts, GENERIC_BOLD_MONO) {
            let mut family = base_mono.clone();
            family.insert(0, key);
            fonts.families.insert(FontFamily::Name(BOLD_MONO_FAMILY.into()), family);
            book.generic_bold_mono = true;
        }
        if let Some(key) = load(&mut fonts, GENERIC_BOLD_SANS) {
            let mut family = base_sans.clone();
            family.insert(0, key);
            fonts.families.insert(FontFamily::Name(BOLD_SANS_FAMILY.into()), family);
            book.generic_bold_sans = true;
        }

        tracing::info!(
            "registered {} font families ({} with bold faces)",
            book.families.len(),
            book.bold_families.len()
        );
        (fonts, book)
    }

    /// Discover fonts and install them into an egui context.
    pub fn install(ctx: &egui::Context) -> FontBook {
        let (fonts, book) = Self::discover();
        ctx.set_fonts(fonts);
        book
    }

    /// Font for a family name at a size in points.
    pub fn font_id(&self, family: &str, size_pt: u32, bold: bool) -> FontId {
        FontId::new(size_pt.max(1) as f32 * POINTS_TO_PIXELS, self.family(family, bold))
    }

    fn family(&self, family: &str, bold: bool) -> FontFamily {
        if bold && self.bold_families.contains(family) {
            return FontFamily::Name(bold_name(family).into());
        }
        let monospace = is_monospace_name(family);
        if bold {
            if monospace && self.generic_bold_mono {
                return FontFamily::Name(BOLD_MONO_FAMILY.into());
            }
            if !monospace && self.generic_bold_sans {
                return FontFamily::Name(BOLD_SANS_FAMILY.into());
            }
        }
        if self.families.contains(family) {
            FontFamily::Name(family.into())
        } else if monospace {
            FontFamily::Monospace
        } else {
            FontFamily::Proportional
        }
    }
}

fn bold_name(family: &str) -> String {
    format!("{family} Bold")
}

/// Guess whether a family name is fixed-width.
pub fn is_monospace_name(family: &str) -> bool {
    if let Some(choice) = FONT_CHOICES.iter().find(|c| c.name.eq_ignore_ascii_case(family)) {
        return choice.monospace;
    }
    let lower = family.to_lowercase();
    ["mono", "courier", "consol", "code", "fixed"].iter().any(|k| lower.contains(k))
}

fn font_search_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/Library/Fonts"),
        PathBuf::from("/System/Library/Fonts"),
        PathBuf::from("C:\\Windows\\Fonts"),
    ];
    if let Some(base) = directories::BaseDirs::new() {
        dirs.push(base.home_dir().join(".fonts"));
        dirs.push(base.data_dir().join("fonts"));
        dirs.push(base.home_dir().join("Library").join("Fonts"));
    }
    dirs
}

/// Map lowercase file name -> path for every font file under `dirs`.
/// The first occurrence of a name wins.
fn index_font_files(dirs: &[PathBuf]) -> HashMap<String, PathBuf> {
    const MAX_DEPTH: usize = 5;
    let mut index = HashMap::new();
    let mut stack: Vec<(PathBuf, usize)> = dirs.iter().map(|d| (d.clone(), 0)).collect();

    while let Some((dir, depth)) = stack.pop() {
        let Ok(read_dir) = std::fs::read_dir(&dir) else { continue };
        for entry in read_dir.flatten() {
            let path = entry.path();
            if path.is_dir() {
                if depth < MAX_DEPTH {
                    stack.push((path, depth + 1));
                }
            } else if is_font_file(&path) {
                if let Some(name) = path.file_name() {
                    index.entry(name.to_string_lossy().to_lowercase()).or_insert(path);
                }
            }
        }
    }
    index
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .map(|e| matches!(e.to_string_lossy().to_lowercase().as_str(), "ttf" | "otf"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_book_never_names_unknown_families() {
        let book = FontBook::builtin();
        assert_eq!(book.font_id("Ubuntu Mono", 12, false).family, FontFamily::Monospace);
        assert_eq!(book.font_id("Arial", 12, true).family, FontFamily::Proportional);
        assert_eq!(book.font_id("Whatever Sans", 12, false).family, FontFamily::Proportional);
    }

    #[test]
    fn test_font_size_conversion() {
        let book = FontBook::builtin();
        let id = book.font_id("Consolas", 12, false);
        assert!((id.size - 16.0).abs() < 0.01);
        assert!(book.font_id("Consolas", 0, false).size > 0.0);
    }

    #[test]
    fn test_monospace_guess() {
        assert!(is_monospace_name("Ubuntu Mono"));
        assert!(is_monospace_name("courier new"));
        assert!(is_monospace_name("Fira Code"));
        assert!(!is_monospace_name("Georgia"));
    }

    #[test]
    fn test_index_font_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("truetype").join("ubuntu");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("UbuntuMono-R.ttf"), b"").unwrap();
        std::fs::write(nested.join("readme.txt"), b"").unwrap();

        let index = index_font_files(&[dir.path().to_path_buf()]);
        assert!(index.contains_key("ubuntumono-r.ttf"));
        assert!(!index.contains_key("readme.txt"));
    }

    #[test]
    fn test_choices_cover_dialog_list() {
        let names: Vec<&str> = FONT_CHOICES.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), 10);
        assert_eq!(names[0], "Ubuntu Mono");
        assert!(FONT_SIZES.contains(&12));
    }
}
