use super::documentation::DocumentationDto;
use super::repository::Repository;

pub const NAV_LINK_LABEL: &str = "scm-documentation-viewer-plugin.navLink";
pub const NAV_LINK_ICON: &str = "fas fa-book";

/// Route of the documentation landing page inside the repository's source view:
/// `/repo/{namespace}/{name}/code/sources/{branch}/{base_path}/{landing_page}`.
///
/// Exactly one slash separates the branch from the base path and the base path
/// from the landing page, whether or not the base path brings its own.
pub fn concatenate_path(repository: &Repository, dto: &DocumentationDto) -> String {
    let mut path = format!(
        "/repo/{}/{}/code/sources/{}",
        repository.namespace, repository.name, dto.branch_name
    );
    if !dto.base_path.starts_with('/') {
        path.push('/');
    }
    path.push_str(&dto.base_path);
    if !path.ends_with('/') {
        path.push('/');
    }
    path.push_str(&dto.landing_page);
    path
}

/// The repository navigation entry leading to its documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentationNavLink {
    pub to: String,
    pub label: &'static str,
    pub icon: &'static str,
}

impl DocumentationNavLink {
    /// `None` unless the repository carries embedded documentation metadata.
    pub fn from_repository(repository: &Repository) -> Option<Self> {
        let dto = repository.documentation()?;
        Some(Self {
            to: concatenate_path(repository, dto),
            label: NAV_LINK_LABEL,
            icon: NAV_LINK_ICON,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("docs", "index.md", "/repo/ns/repo/code/sources/main/docs/index.md")]
    #[case("/docs", "index.md", "/repo/ns/repo/code/sources/main/docs/index.md")]
    #[case("docs/", "index.md", "/repo/ns/repo/code/sources/main/docs/index.md")]
    #[case("/docs/", "index.md", "/repo/ns/repo/code/sources/main/docs/index.md")]
    #[case("/", "README.md", "/repo/ns/repo/code/sources/main/README.md")]
    #[case("a/b", "c.md", "/repo/ns/repo/code/sources/main/a/b/c.md")]
    fn paths_are_normalized(#[case] base_path: &str, #[case] landing_page: &str, #[case] expected: &str) {
        let repo = Repository::new("ns", "repo");
        let dto = DocumentationDto::new("main", base_path, landing_page);
        assert_eq!(concatenate_path(&repo, &dto), expected);
    }

    #[test]
    fn nav_link_needs_embedded_metadata() {
        let repo = Repository::new("ns", "repo");
        assert_eq!(DocumentationNavLink::from_repository(&repo), None);

        let repo = repo.with_documentation(DocumentationDto::new("develop", "docs", "start.md"));
        assert_eq!(
            DocumentationNavLink::from_repository(&repo),
            Some(DocumentationNavLink {
                to: "/repo/ns/repo/code/sources/develop/docs/start.md".into(),
                label: NAV_LINK_LABEL,
                icon: NAV_LINK_ICON,
            })
        );
    }
}
