use docviewer_engine::models::{DocumentationDto, DocumentationNavLink, Repository};
use pretty_assertions::assert_eq;

const HAL_REPOSITORY: &str = r#"{
    "namespace": "scmadmin",
    "name": "docs-demo",
    "type": "git",
    "_embedded": {
        "documentationViewer": {
            "branchName": "main",
            "basePath": "/docs/",
            "landingPage": "index.md"
        }
    }
}"#;

#[test]
fn nav_link_from_a_hal_resource() {
    let repository = Repository::from_hal_json(HAL_REPOSITORY).unwrap();
    let link = DocumentationNavLink::from_repository(&repository).unwrap();
    assert_eq!(link.to, "/repo/scmadmin/docs-demo/code/sources/main/docs/index.md");
    assert_eq!(link.label, "scm-documentation-viewer-plugin.navLink");
}

#[test]
fn repository_without_documentation_has_no_link() {
    let repository = Repository::from_hal_json(
        r#"{"namespace":"scmadmin","name":"plain","_embedded":{"branches":[]}}"#,
    )
    .unwrap();
    assert_eq!(repository.documentation(), None);
    assert_eq!(DocumentationNavLink::from_repository(&repository), None);
}

#[test]
fn enriched_repository_round_trips() {
    let repository = Repository::new("scmadmin", "docs-demo")
        .with_documentation(DocumentationDto::new("develop", "guide", "start.md"));
    let parsed = Repository::from_hal_json(&repository.to_hal_json().unwrap()).unwrap();
    assert_eq!(
        DocumentationNavLink::from_repository(&parsed).map(|link| link.to),
        Some("/repo/scmadmin/docs-demo/code/sources/develop/guide/start.md".to_string())
    );
}
