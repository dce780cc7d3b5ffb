//! Style attributes, records and the default document style.

use duskcore::Rgb;
use std::fmt;

/// Name of a style record / tag. Allocated in increasing order, so ordering
/// by id is application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagId(pub u64);

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slant {
    #[default]
    Roman,
    Italic,
}

/// Attributes flipped by the bold / italic / underline commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Bold,
    Italic,
    Underline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChannel {
    Foreground,
    Background,
}

/// A partial style: every attribute is optional. `None` means "not defined
/// here", so folding lets an earlier value show through.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleAttrs {
    pub family: Option<String>,
    pub size: Option<u32>,
    pub weight: Option<Weight>,
    pub slant: Option<Slant>,
    pub underline: Option<bool>,
    pub foreground: Option<Rgb>,
    pub background: Option<Rgb>,
}

impl StyleAttrs {
    /// Lay `later` on top of `self`: attributes `later` defines win, the
    /// rest keep their current value.
    pub fn overlay(&mut self, later: &StyleAttrs) {
        if later.family.is_some() {
            self.family.clone_from(&later.family);
        }
        self.size = later.size.or(self.size);
        self.weight = later.weight.or(self.weight);
        self.slant = later.slant.or(self.slant);
        self.underline = later.underline.or(self.underline);
        self.foreground = later.foreground.or(self.foreground);
        self.background = later.background.or(self.background);
    }

    /// Whether every attribute `other` defines is also defined here.
    pub fn defines_all_of(&self, other: &StyleAttrs) -> bool {
        (other.family.is_none() || self.family.is_some())
            && (other.size.is_none() || self.size.is_some())
            && (other.weight.is_none() || self.weight.is_some())
            && (other.slant.is_none() || self.slant.is_some())
            && (other.underline.is_none() || self.underline.is_some())
            && (other.foreground.is_none() || self.foreground.is_some())
            && (other.background.is_none() || self.background.is_some())
    }

    pub fn is_empty(&self) -> bool {
        *self == StyleAttrs::default()
    }

    /// Flip one toggle, filling in the full font description from
    /// `defaults` so the resulting record stands on its own.
    pub fn toggled(mut self, toggle: Toggle, defaults: &DefaultStyle) -> StyleAttrs {
        if self.family.is_none() {
            self.family = Some(defaults.family.clone());
        }
        self.size = Some(self.size.unwrap_or(defaults.size));
        let weight = self.weight.unwrap_or_default();
        let slant = self.slant.unwrap_or_default();
        let underline = self.underline.unwrap_or(false);

        self.weight = Some(match (toggle, weight) {
            (Toggle::Bold, Weight::Normal) => Weight::Bold,
            (Toggle::Bold, Weight::Bold) => Weight::Normal,
            (_, w) => w,
        });
        self.slant = Some(match (toggle, slant) {
            (Toggle::Italic, Slant::Roman) => Slant::Italic,
            (Toggle::Italic, Slant::Italic) => Slant::Roman,
            (_, s) => s,
        });
        self.underline = Some(if toggle == Toggle::Underline { !underline } else { underline });
        self
    }

    pub fn with_color(mut self, channel: ColorChannel, color: Rgb) -> StyleAttrs {
        match channel {
            ColorChannel::Foreground => self.foreground = Some(color),
            ColorChannel::Background => self.background = Some(color),
        }
        self
    }
}

/// An immutable named bundle of attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRecord {
    pub tag: TagId,
    pub attrs: StyleAttrs,
}

/// The style of untagged text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultStyle {
    pub family: String,
    pub size: u32,
    pub foreground: Rgb,
    pub background: Rgb,
}

impl Default for DefaultStyle {
    fn default() -> Self {
        Self {
            family: "Ubuntu Mono".to_string(),
            size: 12,
            foreground: Rgb::WHITE,
            background: Rgb::new(0x30, 0x0a, 0x24),
        }
    }
}

/// A fully resolved style, every attribute concrete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveStyle {
    pub family: String,
    pub size: u32,
    pub weight: Weight,
    pub slant: Slant,
    pub underline: bool,
    pub foreground: Rgb,
    pub background: Rgb,
}

impl EffectiveStyle {
    pub fn from_attrs(attrs: &StyleAttrs, defaults: &DefaultStyle) -> Self {
        Self {
            family: attrs.family.clone().unwrap_or_else(|| defaults.family.clone()),
            size: attrs.size.unwrap_or(defaults.size),
            weight: attrs.weight.unwrap_or_default(),
            slant: attrs.slant.unwrap_or_default(),
            underline: attrs.underline.unwrap_or(false),
            foreground: attrs.foreground.unwrap_or(defaults.foreground),
            background: attrs.background.unwrap_or(defaults.background),
        }
    }

    pub fn is_bold(&self) -> bool {
        self.weight == Weight::Bold
    }

    pub fn is_italic(&self) -> bool {
        self.slant == Slant::Italic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names() {
        assert_eq!(TagId(0).to_string(), "tag_0");
        assert_eq!(TagId(41).to_string(), "tag_41");
        assert!(TagId(3) < TagId(10));
    }

    #[test]
    fn test_overlay_keeps_undefined_keys() {
        let mut acc = StyleAttrs {
            weight: Some(Weight::Bold),
            foreground: Some(Rgb::new(1, 2, 3)),
            ..Default::default()
        };
        acc.overlay(&StyleAttrs {
            foreground: Some(Rgb::new(9, 9, 9)),
            slant: Some(Slant::Italic),
            ..Default::default()
        });
        assert_eq!(acc.weight, Some(Weight::Bold));
        assert_eq!(acc.slant, Some(Slant::Italic));
        assert_eq!(acc.foreground, Some(Rgb::new(9, 9, 9)));
    }

    #[test]
    fn test_toggled_fills_font_and_flips() {
        let defaults = DefaultStyle::default();
        let bold = StyleAttrs::default().toggled(Toggle::Bold, &defaults);
        assert_eq!(bold.family.as_deref(), Some("Ubuntu Mono"));
        assert_eq!(bold.size, Some(12));
        assert_eq!(bold.weight, Some(Weight::Bold));
        assert_eq!(bold.slant, Some(Slant::Roman));
        assert_eq!(bold.underline, Some(false));

        let both = bold.clone().toggled(Toggle::Underline, &defaults);
        assert_eq!(both.weight, Some(Weight::Bold));
        assert_eq!(both.underline, Some(true));

        let normal = bold.toggled(Toggle::Bold, &defaults);
        assert_eq!(normal.weight, Some(Weight::Normal));
    }

    #[test]
    fn test_toggled_keeps_colours() {
        let attrs = StyleAttrs::default().with_color(ColorChannel::Background, Rgb::BLACK);
        let italic = attrs.toggled(Toggle::Italic, &DefaultStyle::default());
        assert_eq!(italic.background, Some(Rgb::BLACK));
        assert_eq!(italic.foreground, None);
        assert_eq!(italic.slant, Some(Slant::Italic));
    }

    #[test]
    fn test_defines_all_of() {
        let wide = StyleAttrs::default().toggled(Toggle::Bold, &DefaultStyle::default());
        let narrow = StyleAttrs { weight: Some(Weight::Normal), ..Default::default() };
        assert!(wide.defines_all_of(&narrow));
        assert!(!narrow.defines_all_of(&wide));
        assert!(narrow.defines_all_of(&StyleAttrs::default()));
    }

    #[test]
    fn test_effective_from_empty_is_default() {
        let defaults = DefaultStyle::default();
        let eff = EffectiveStyle::from_attrs(&StyleAttrs::default(), &defaults);
        assert_eq!(eff.family, defaults.family);
        assert_eq!(eff.size, defaults.size);
        assert!(!eff.is_bold() && !eff.is_italic() && !eff.underline);
        assert_eq!(eff.foreground, defaults.foreground);
        assert_eq!(eff.background, defaults.background);
    }
}
