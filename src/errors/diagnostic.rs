use std::fmt;

use colored::*;
use itertools::Itertools;

use crate::{component::ComponentPath, key::BindingKey};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    MissingBinding,
    DuplicateBinding,
    ConflictingOwnership,
    InvalidCycle,
    IncompatiblyScopedBinding,
    UnscopedComponentScopedBinding,
    RepeatedScope,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DiagnosticKind::MissingBinding => "missing binding",
                DiagnosticKind::DuplicateBinding => "duplicate binding",
                DiagnosticKind::ConflictingOwnership => "conflicting ownership",
                DiagnosticKind::InvalidCycle => "invalid cycle",
                DiagnosticKind::IncompatiblyScopedBinding => "incompatibly scoped binding",
                DiagnosticKind::UnscopedComponentScopedBinding => "scoped binding in unscoped component",
                DiagnosticKind::RepeatedScope => "repeated scope",
            }
        )
    }
}

/// A problem found in a finished binding graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub component: ComponentPath,
    pub key: Option<BindingKey>,
    pub msg: String,
}

impl Diagnostic {
    pub fn error<S: Into<String>>(
        kind: DiagnosticKind,
        component: &ComponentPath,
        key: Option<&BindingKey>,
        msg: S,
    ) -> Diagnostic {
        Diagnostic {
            kind,
            severity: Severity::Error,
            component: component.clone(),
            key: key.cloned(),
            msg: msg.into(),
        }
    }

    pub fn note<S: Into<String>>(
        kind: DiagnosticKind,
        component: &ComponentPath,
        key: Option<&BindingKey>,
        msg: S,
    ) -> Diagnostic {
        Diagnostic {
            severity: Severity::Note,
            ..Diagnostic::error(kind, component, key, msg)
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.component, self.kind)?;
        if let Some(key) = &self.key {
            write!(f, " for {}", key)?;
        }
        write!(f, ": {}", self.msg)
    }
}

/// Every diagnostic found while validating a graph, in discovery order.
#[derive(Clone, Debug, Default)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn new() -> Report {
        Report::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        if !self.diagnostics.contains(&diagnostic) {
            self.diagnostics.push(diagnostic);
        }
    }

    pub fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, diagnostics: I) {
        for d in diagnostics {
            self.push(d);
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Prints the report to stderr, grouped by component and then by key.
    pub fn emit(&self) {
        let sorted = self
            .diagnostics
            .iter()
            .sorted_by(|a, b| a.component.cmp(&b.component));
        for (component, diags) in &sorted.group_by(|d| d.component.clone()) {
            eprintln!("{} {}", "in component".bold(), component.to_string().bold());
            for (key, diags) in &diags.group_by(|d| d.key.clone()) {
                if let Some(key) = key {
                    eprintln!("  {} {}", "-->".bold(), key);
                }
                for d in diags {
                    let label = match d.severity {
                        Severity::Error => format!("{}:", d.kind).bold().red(),
                        Severity::Warning => format!("{}:", d.kind).bold().yellow(),
                        Severity::Note => format!("{}:", d.kind).bold().blue(),
                    };
                    eprintln!("      {} {}", label, d.msg);
                }
            }
            eprintln!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_ignores_repeats() {
        let path = ComponentPath::root(ty!("App"));
        let mut report = Report::new();
        report.push(Diagnostic::error(DiagnosticKind::InvalidCycle, &path, None, "a -> b -> a"));
        report.push(Diagnostic::error(DiagnosticKind::InvalidCycle, &path, None, "a -> b -> a"));
        report.push(Diagnostic::note(DiagnosticKind::MissingBinding, &path, None, "abstract"));
        assert_eq!(report.diagnostics().len(), 2);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.of_kind(DiagnosticKind::MissingBinding).count(), 1);
    }
}
