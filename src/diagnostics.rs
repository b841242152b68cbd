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
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn duplicate_parameter(key: &str) -> Self {
        Self {
            kind: WarningKind::DuplicateParameter,
            message: format!("parameter '{key}' is given more than once; the service decides which value applies"),
        }
    }

    pub fn cleanup_pending(stack: &str) -> Self {
        Self {
            kind: WarningKind::CleanupPending,
            message: format!("stack {stack} is still cleaning up superseded resources"),
        }
    }

    pub fn hook_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::HookFailed,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The merged parameter list repeats a key.
    DuplicateParameter,
    /// Deployment succeeded while old resources are still being removed.
    CleanupPending,
    /// A post-deploy or on-error hook exited non-zero.
    HookFailed,
}
