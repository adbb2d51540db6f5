//! Casing locale used by `PROPER`.
//!
//! Title-casing follows the process locale: the tag is read once from
//! `LC_ALL`, then `LC_CTYPE`, then `LANG`. This is the library's one
//! locale-dependent operation, so the dependency is explicit here and
//! hosts that need identical output across machines can pin a locale
//! with [`set_proper_locale`].

use std::sync::{OnceLock, RwLock};

/// Locale configuration for case conversion.
///
/// This is distinct from number parsing, which is always `.`-based: only
/// casing consults the locale. Unicode default casing covers every tag
/// except the Turkic languages, where the dotted/dotless `i` pairs
/// deviate (`i` uppercases to `İ`, `I` lowercases to `ı`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasingLocale {
    tag: String,
    turkic: bool,
}

impl CasingLocale {
    /// Build from a locale tag such as `en_US.UTF-8`, `tr-TR`, or `C`.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let lang = tag
            .split(['-', '_', '.', '@'])
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        let turkic = matches!(lang.as_str(), "tr" | "az");
        Self { tag, turkic }
    }

    /// Locale-independent Unicode default casing (the `C` locale).
    #[must_use]
    pub fn invariant() -> Self {
        Self::new("C")
    }

    /// Read the process locale from the environment (`LC_ALL`, then
    /// `LC_CTYPE`, then `LANG`). Unset or empty falls back to
    /// [`CasingLocale::invariant`].
    #[must_use]
    pub fn process() -> Self {
        for var in ["LC_ALL", "LC_CTYPE", "LANG"] {
            if let Ok(tag) = std::env::var(var) {
                if !tag.is_empty() {
                    return Self::new(tag);
                }
            }
        }
        Self::invariant()
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Title-case `text`: the first alphabetic character of each
    /// alphanumeric run uppercases, the rest lowercase, under this
    /// locale's casing rules.
    pub fn title_case(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut at_word_start = true;
        for ch in text.chars() {
            if ch.is_alphanumeric() {
                if at_word_start {
                    self.push_upper(ch, &mut out);
                } else {
                    self.push_lower(ch, &mut out);
                }
                at_word_start = false;
            } else {
                out.push(ch);
                at_word_start = true;
            }
        }
        out
    }

    fn push_upper(&self, ch: char, out: &mut String) {
        if self.turkic && ch == 'i' {
            out.push('İ');
            return;
        }
        out.extend(ch.to_uppercase());
    }

    fn push_lower(&self, ch: char, out: &mut String) {
        if self.turkic && ch == 'I' {
            out.push('ı');
            return;
        }
        out.extend(ch.to_lowercase());
    }
}

impl Default for CasingLocale {
    fn default() -> Self {
        Self::invariant()
    }
}

fn process_locale() -> &'static CasingLocale {
    static PROCESS: OnceLock<CasingLocale> = OnceLock::new();
    PROCESS.get_or_init(CasingLocale::process)
}

fn override_slot() -> &'static RwLock<Option<CasingLocale>> {
    static OVERRIDE: OnceLock<RwLock<Option<CasingLocale>>> = OnceLock::new();
    OVERRIDE.get_or_init(|| RwLock::new(None))
}

/// Pin the locale `PROPER` uses instead of the process locale. Pass
/// `None` to return to process-locale behavior.
pub fn set_proper_locale(locale: Option<CasingLocale>) {
    *override_slot().write().unwrap_or_else(|e| e.into_inner()) = locale;
}

/// The locale `PROPER` will use: the pinned override if one is set,
/// otherwise the process locale.
#[must_use]
pub fn proper_locale() -> CasingLocale {
    if let Some(locale) = override_slot()
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .as_ref()
    {
        return locale.clone();
    }
    process_locale().clone()
}
