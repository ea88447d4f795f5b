use serde::{Deserialize, Serialize};

use super::documentation::DocumentationDto;

/// The parts of a repository resource the documentation link needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub namespace: String,
    pub name: String,
    #[serde(rename = "_embedded", default, skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Embedded {
    #[serde(
        rename = "documentationViewer",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub documentation_viewer: Option<DocumentationDto>,
}

impl Repository {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            embedded: None,
        }
    }

    /// Parses a HAL repository resource; unknown fields are ignored.
    pub fn from_hal_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_hal_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Embeds the documentation location.
    pub fn with_documentation(mut self, dto: DocumentationDto) -> Self {
        self.embedded
            .get_or_insert_with(Embedded::default)
            .documentation_viewer = Some(dto);
        self
    }

    pub fn documentation(&self) -> Option<&DocumentationDto> {
        self.embedded.as_ref()?.documentation_viewer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_embedded_documentation() {
        let repo = Repository::from_hal_json(
            r#"{
                "namespace": "hitchhiker",
                "name": "heart-of-gold",
                "type": "git",
                "_links": {},
                "_embedded": {
                    "documentationViewer": {
                        "branchName": "main",
                        "basePath": "docs",
                        "landingPage": "index.md"
                    }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(
            repo.documentation(),
            Some(&DocumentationDto::new("main", "docs", "index.md"))
        );
    }

    #[test]
    fn missing_embedded_block() {
        let repo =
            Repository::from_hal_json(r#"{"namespace":"a","name":"b"}"#).unwrap();
        assert_eq!(repo.embedded, None);
        assert_eq!(repo.documentation(), None);
    }

    #[test]
    fn embedding_survives_serialization() {
        let repo = Repository::new("a", "b")
            .with_documentation(DocumentationDto::new("develop", "/", "README.md"));
        let json = repo.to_hal_json().unwrap();
        assert!(json.contains(r#""_embedded":{"documentationViewer":"#));
        assert_eq!(Repository::from_hal_json(&json).unwrap(), repo);
    }
}
