//! Per-call administrative settings
//!
//! Whether class/group classification is permitted at all is a deployment
//! decision. It is threaded explicitly through every mutate and compile call
//! rather than read from ambient global state.

use crate::errors::{ClassifierError, Result};

/// Whether class/group classification is administratively enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassificationSwitch {
    /// Classification operations are permitted
    #[default]
    Enabled,
    /// Classification operations fail with `ClassificationDisabled`
    Disabled,
}

impl ClassificationSwitch {
    /// Whether classification is enabled
    pub fn is_enabled(self) -> bool {
        matches!(self, ClassificationSwitch::Enabled)
    }

    /// Guard a gated operation
    ///
    /// # Errors
    /// * `ClassificationDisabled` - If the switch is off
    pub fn ensure_enabled(self, operation: &str) -> Result<()> {
        if self.is_enabled() {
            Ok(())
        } else {
            Err(ClassifierError::ClassificationDisabled {
                operation: operation.to_string(),
            })
        }
    }
}
