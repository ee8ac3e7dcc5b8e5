use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingDependency,
    DisabledDependency,
    OptionalMissing,
}

impl IssueKind {
    pub fn is_error(self) -> bool {
        matches!(
            self,
            IssueKind::MissingDependency | IssueKind::DisabledDependency
        )
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DependencyIssue {
    pub kind: IssueKind,
    pub mod_id: String,
    pub mod_name: String,
    pub dependency_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub issues: Vec<DependencyIssue>,
    pub has_errors: bool,
    pub has_warnings: bool,
}
