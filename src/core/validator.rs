use crate::models::mod_dto::ModEntry;
use crate::models::validation::{DependencyIssue, IssueKind, ValidationResult};
use std::collections::{HashMap, HashSet};

/// Checks the dependencies of every enabled entry against the scanned set.
/// Disabled entries are skipped entirely. Never blocks anything by itself.
pub fn validate(entries: &[ModEntry]) -> ValidationResult {
    let index: HashMap<&str, &ModEntry> = entries.iter().map(|e| (e.id.as_str(), e)).collect();
    let enabled: HashSet<&str> = entries
        .iter()
        .filter(|e| e.enabled)
        .map(|e| e.id.as_str())
        .collect();

    let issue = |kind, entry: &ModEntry, dependency: &str| DependencyIssue {
        kind,
        mod_id: entry.id.clone(),
        mod_name: entry.name.clone(),
        dependency_id: dependency.to_string(),
    };

    let mut issues = Vec::new();
    for entry in entries.iter().filter(|e| e.enabled) {
        for dep in &entry.dependencies {
            if !index.contains_key(dep.as_str()) {
                issues.push(issue(IssueKind::MissingDependency, entry, dep));
            } else if !enabled.contains(dep.as_str()) {
                issues.push(issue(IssueKind::DisabledDependency, entry, dep));
            }
        }
        for dep in &entry.optional_dependencies {
            if !index.contains_key(dep.as_str()) {
                issues.push(issue(IssueKind::OptionalMissing, entry, dep));
            }
        }
    }

    ValidationResult {
        has_errors: issues.iter().any(|i| i.kind.is_error()),
        has_warnings: issues.iter().any(|i| i.kind == IssueKind::OptionalMissing),
        issues,
    }
}
