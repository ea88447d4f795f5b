use serde::{Deserialize, Serialize};

/// Where a repository's documentation lives, as embedded into repository metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationDto {
    /// The repository's default branch.
    pub branch_name: String,
    /// Directory holding the documentation, relative to the repository root.
    pub base_path: String,
    /// Markdown file opened first, relative to `base_path`.
    pub landing_page: String,
}

impl DocumentationDto {
    pub fn new(
        branch_name: impl Into<String>,
        base_path: impl Into<String>,
        landing_page: impl Into<String>,
    ) -> Self {
        Self {
            branch_name: branch_name.into(),
            base_path: base_path.into(),
            landing_page: landing_page.into(),
        }
    }
}
