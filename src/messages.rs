//! Kind-specific safe messages shown when the caller supplies no fallback.
//!
//! The localization collaborator owns real translations; this module only
//! defines the seam ([`MessageCatalog`]) and a small built-in catalog so the
//! classifier always has something player-safe to return.

use crate::ErrorKind;
use std::borrow::Cow;

/// Languages the built-in catalog ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    /// English (default).
    #[default]
    English,
    /// Spanish.
    Spanish,
}

impl Language {
    /// Parse a language tag such as `"en"` or `"es-MX"`.
    ///
    /// Unknown tags return `None`; callers decide whether to fall back.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_']).next().unwrap_or("");
        match primary.to_ascii_lowercase().as_str() {
            "en" => Some(Self::English),
            "es" => Some(Self::Spanish),
            _ => None,
        }
    }
}

/// Source of player-safe text for a classified failure.
pub trait MessageCatalog: Send + Sync {
    /// Message shown for a failure of `kind` when no fallback was given.
    fn safe_message(&self, kind: ErrorKind) -> Cow<'static, str>;
}

/// The catalog compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog {
    language: Language,
}

impl BuiltinCatalog {
    /// Catalog for `language`.
    pub const fn new(language: Language) -> Self {
        Self { language }
    }

    /// Language this catalog speaks.
    pub const fn language(&self) -> Language {
        self.language
    }

    const fn english(kind: ErrorKind) -> &'static str {
        match kind {
            ErrorKind::NotFound => "That could not be found.",
            ErrorKind::InvalidInput => "That input is not valid. Please try again.",
            ErrorKind::StateError => "Something went wrong with the game state. Your last action was not applied.",
            ErrorKind::IOFailure => "The game could not read or write its files.",
            ErrorKind::Unknown => "Sorry, something unexpected happened.",
        }
    }

    const fn spanish(kind: ErrorKind) -> &'static str {
        match kind {
            ErrorKind::NotFound => "No se pudo encontrar.",
            ErrorKind::InvalidInput => "Esa entrada no es válida. Inténtalo de nuevo.",
            ErrorKind::StateError => "Algo falló en el estado del juego. Tu última acción no se aplicó.",
            ErrorKind::IOFailure => "El juego no pudo leer o escribir sus archivos.",
            ErrorKind::Unknown => "Lo sentimos, ocurrió algo inesperado.",
        }
    }
}

impl MessageCatalog for BuiltinCatalog {
    fn safe_message(&self, kind: ErrorKind) -> Cow<'static, str> {
        Cow::Borrowed(match self.language {
            Language::English => Self::english(kind),
            Language::Spanish => Self::spanish(kind),
        })
    }
}

/// Pick the text to show the player.
///
/// A fallback with any non-whitespace character wins; otherwise the catalog's
/// message for `kind` is used.
pub fn resolve_message(fallback: &str, kind: ErrorKind, catalog: &dyn MessageCatalog) -> String {
    if fallback.trim().is_empty() {
        catalog.safe_message(kind).into_owned()
    } else {
        fallback.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pirate;

    impl MessageCatalog for Pirate {
        fn safe_message(&self, _kind: ErrorKind) -> Cow<'static, str> {
            Cow::Borrowed("Arr, that be lost at sea.")
        }
    }

    #[test]
    fn non_empty_fallback_wins() {
        let catalog = BuiltinCatalog::default();
        let shown = resolve_message("Save file not found.", ErrorKind::NotFound, &catalog);
        assert_eq!(shown, "Save file not found.");
    }

    #[test]
    fn blank_fallback_uses_catalog() {
        let catalog = BuiltinCatalog::default();
        assert_eq!(
            resolve_message("", ErrorKind::NotFound, &catalog),
            "That could not be found."
        );
        assert_eq!(
            resolve_message("  \t", ErrorKind::Unknown, &catalog),
            "Sorry, something unexpected happened."
        );
    }

    #[test]
    fn spanish_catalog_covers_every_kind() {
        let catalog = BuiltinCatalog::new(Language::Spanish);
        for kind in ErrorKind::ALL {
            let msg = catalog.safe_message(kind);
            assert!(!msg.is_empty());
            assert_ne!(msg, BuiltinCatalog::english(kind));
        }
    }

    #[test]
    fn custom_catalog_plugs_in() {
        assert_eq!(
            resolve_message("", ErrorKind::NotFound, &Pirate),
            "Arr, that be lost at sea."
        );
    }

    #[test]
    fn language_tags() {
        assert_eq!(Language::from_tag("en"), Some(Language::English));
        assert_eq!(Language::from_tag("es-MX"), Some(Language::Spanish));
        assert_eq!(Language::from_tag(" ES_es "), Some(Language::Spanish));
        assert_eq!(Language::from_tag("fr"), None);
        assert_eq!(Language::from_tag(""), None);
    }
}
