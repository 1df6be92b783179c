//! Owner of the active [`ErrorHandler`].
//!
//! The game creates one `HandlerRegistry` at startup and passes it (or the
//! handler it hands out) by reference. Re-initialising replaces the handler
//! with a fresh one: statistics and history start over, and the old log file
//! is closed before the new one is opened.

use crate::handler::{ErrorHandler, HandlerConfig};
use crate::messages::MessageCatalog;
use crate::{definitions, GameError};
use std::path::Path;

/// Holds at most one [`ErrorHandler`].
///
/// ```rust
/// use saga_errors::HandlerRegistry;
///
/// let mut registry = HandlerRegistry::new();
/// assert!(registry.get_error_handler().is_err());
///
/// registry.init_error_handler(true, None);
/// assert_eq!(registry.is_debug_mode().ok(), Some(true));
/// ```
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    current: Option<ErrorHandler>,
}

impl HandlerRegistry {
    /// Registry with no handler yet.
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Create or replace the handler with the given debug flag and log file.
    pub fn init_error_handler(&mut self, debug_mode: bool, log_file: Option<&Path>) -> &ErrorHandler {
        self.init_with_config(HandlerConfig::new(debug_mode, log_file))
    }

    /// Create or replace the handler from a full config.
    pub fn init_with_config(&mut self, config: HandlerConfig) -> &ErrorHandler {
        // Close the previous sink first so the same file can be reopened.
        self.current = None;
        self.current.insert(ErrorHandler::new(config))
    }

    /// Create or replace the handler, taking safe messages from `catalog`.
    pub fn init_with_catalog(
        &mut self,
        config: HandlerConfig,
        catalog: impl MessageCatalog + 'static,
    ) -> &ErrorHandler {
        self.current = None;
        self.current.insert(ErrorHandler::with_catalog(config, catalog))
    }

    /// The active handler.
    ///
    /// Fails with `CORE_HANDLER_UNINITIALIZED` before the first init.
    pub fn get_error_handler(&self) -> Result<&ErrorHandler, GameError> {
        self.current.as_ref().ok_or_else(|| {
            GameError::state(
                definitions::CORE_HANDLER_UNINITIALIZED,
                "get_error_handler",
                "error handler used before initialization",
            )
        })
    }

    /// Debug flag of the active handler.
    pub fn is_debug_mode(&self) -> Result<bool, GameError> {
        self.get_error_handler().map(ErrorHandler::is_debug_mode)
    }

    /// Whether a handler has been installed.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn uninitialized_registry_reports_state_error() {
        let registry = HandlerRegistry::new();
        assert!(!registry.is_initialized());

        let err = registry.get_error_handler().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StateError);
        assert_eq!(err.code().to_string(), "E-CORE-001");

        assert!(registry.is_debug_mode().is_err());
    }

    #[test]
    fn reinit_resets_statistics() {
        let mut registry = HandlerRegistry::new();
        let handler = registry.init_error_handler(false, None);
        let err = GameError::combat(definitions::CMB_SKILL_NOT_FOUND, "cast", "fireball");
        handler.handle_error(&err, "cast", "");
        assert_eq!(handler.get_error_statistics().total_errors(), 1);

        let handler = registry.init_error_handler(true, None);
        assert_eq!(handler.get_error_statistics().total_errors(), 0);
        assert!(handler.recent_errors(10).is_empty());
        assert_eq!(registry.is_debug_mode().ok(), Some(true));
    }

    #[test]
    fn reinit_reopens_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.log");
        let mut registry = HandlerRegistry::new();

        registry.init_error_handler(true, Some(path.as_path())).log_debug("first run");
        let handler = registry.init_error_handler(true, Some(path.as_path()));
        assert!(handler.has_log_sink());
        handler.log_debug("second run");
        drop(registry);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
