use std::fmt;

use crate::diagnostic::{Diagnostic, DiagnosticCode};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl VerificationReport {
    pub fn is_ok(&self) -> bool {
        !self.has_errors()
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn has_code(&self, code: DiagnosticCode) -> bool {
        self.diagnostics.iter().any(|diag| diag.code == code)
    }

    pub(crate) fn push(&mut self, diagnostic: Diagnostic, max_diagnostics: usize) {
        if max_diagnostics == 0 || self.diagnostics.len() < max_diagnostics {
            self.diagnostics.push(diagnostic);
        }
    }

    pub(crate) fn extend_with_limit(&mut self, mut other: Vec<Diagnostic>, max_diagnostics: usize) {
        if max_diagnostics == 0 {
            self.diagnostics.extend(other);
            return;
        }

        let remaining = max_diagnostics.saturating_sub(self.diagnostics.len());
        other.truncate(remaining);
        self.diagnostics.extend(other);
    }

    pub(crate) fn is_full(&self, max_diagnostics: usize) -> bool {
        max_diagnostics != 0 && self.diagnostics.len() >= max_diagnostics
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.diagnostics.is_empty() {
            return f.write_str("verification succeeded");
        }

        for (index, diagnostic) in self.diagnostics.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{diagnostic}")?;
        }

        Ok(())
    }
}

impl std::error::Error for VerificationReport {}
