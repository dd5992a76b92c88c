// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects warnings that shouldn't fail a deployment but should be shown to users.

/// Collects non-fatal warnings during deployment operations.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// The previous instance could not be stopped or removed after cutover.
    pub fn old_instance_retire(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::OldInstanceRetire,
            message: message.into(),
        }
    }

    /// The new instance could not be cleaned up during rollback.
    pub fn rollback_cleanup(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::RollbackCleanup,
            message: message.into(),
        }
    }

    /// A running container could not be inspected while looking for the old instance.
    pub fn discovery(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Discovery,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    OldInstanceRetire,
    RollbackCleanup,
    Discovery,
}
