//! Mirror resolution for catalog resources
//!
//! Every resource (index document or Markdown body) is served by two
//! functionally identical mirrors of the same GitHub origin. The resolver turns
//! a logical address (source, repository, relative path) into the ordered list
//! of absolute URLs to try. It performs no I/O.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::models::{DataSource, RepoKind};
use crate::constants::{mirrors, origin};
use crate::errors::{ConfigError, ConfigResult};

/// How a mirror lays out `{org}/{repo}/{branch}` in its URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathLayout {
    /// `{base}/{org}/{repo}@{branch}/{path}`
    Jsdelivr,
    /// `{base}/{org}/{repo}/{branch}/{path}`
    Raw,
}

/// One content-delivery endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mirror {
    name: String,
    base: Url,
    layout: PathLayout,
}

impl Mirror {
    /// Create a mirror from its base URL
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `base` is not an absolute
    /// http(s) URL that can carry path segments
    pub fn new(name: impl Into<String>, base: &str, layout: PathLayout) -> ConfigResult<Self> {
        let name = name.into();
        let base = Url::parse(base)
            .map_err(|e| ConfigError::invalid(format!("mirror.{}", name), base, e.to_string()))?;

        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::invalid(
                format!("mirror.{}", name),
                base,
                "Mirror base must be an http(s) URL",
            ));
        }

        Ok(Self { name, base, layout })
    }

    fn builtin(name: &str, base: &str, layout: PathLayout) -> Self {
        Self::new(name, base, layout).expect("built-in mirror URL should be valid")
    }

    /// Short mirror name used in logs
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base URL of the mirror
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Path layout of the mirror
    pub fn layout(&self) -> PathLayout {
        self.layout
    }

    /// Absolute URL of `path` inside `org/repo` at `branch`
    pub fn url_for(&self, org: &str, repo: &str, branch: &str, path: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(org);
            match self.layout {
                PathLayout::Jsdelivr => {
                    segments.push(&format!("{}@{}", repo, branch));
                }
                PathLayout::Raw => {
                    segments.push(repo).push(branch);
                }
            }
            segments.extend(relative_segments(path));
        }
        url
    }
}

/// Split a repository-relative path into clean segments
fn relative_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
}

/// Resolves logical resources to ordered mirror candidates
#[derive(Debug, Clone)]
pub struct MirrorResolver {
    cdn: Vec<Mirror>,
    github: Vec<Mirror>,
}

impl Default for MirrorResolver {
    fn default() -> Self {
        Self {
            cdn: vec![
                Mirror::builtin("jsdelivr-fastly", mirrors::JSDELIVR_EDGE, PathLayout::Jsdelivr),
                Mirror::builtin("jsdelivr-cdn", mirrors::JSDELIVR_CDN, PathLayout::Jsdelivr),
            ],
            github: vec![
                Mirror::builtin("github-raw", mirrors::GITHUB_RAW, PathLayout::Raw),
                Mirror::builtin("jsdelivr-cdn", mirrors::JSDELIVR_CDN, PathLayout::Jsdelivr),
            ],
        }
    }
}

impl MirrorResolver {
    /// Create a resolver with the built-in mirrors
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the mirrors of one source, in priority order
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if fewer than two mirrors are given
    pub fn with_mirrors(mut self, source: DataSource, mirrors: Vec<Mirror>) -> ConfigResult<Self> {
        if mirrors.len() < 2 {
            return Err(ConfigError::invalid(
                format!("mirrors.{}", source),
                mirrors.len(),
                "At least two mirrors are required",
            ));
        }

        match source {
            DataSource::Cdn => self.cdn = mirrors,
            DataSource::GitHub => self.github = mirrors,
        }
        Ok(self)
    }

    /// Mirrors of a source in priority order
    pub fn mirrors(&self, source: DataSource) -> &[Mirror] {
        match source {
            DataSource::Cdn => &self.cdn,
            DataSource::GitHub => &self.github,
        }
    }

    /// Candidate URLs for `path` in `repo`, primary mirror first
    pub fn candidates(&self, source: DataSource, repo: RepoKind, path: &str) -> Vec<Url> {
        self.mirrors(source)
            .iter()
            .map(|mirror| mirror.url_for(origin::ORG, repo.repo_name(), origin::BRANCH, path))
            .collect()
    }

    /// Candidate URLs for the index document of `repo`
    pub fn index_candidates(&self, source: DataSource, repo: RepoKind) -> Vec<Url> {
        self.candidates(source, repo, origin::INDEX_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdn_index_candidates() {
        let resolver = MirrorResolver::new();
        let urls = resolver.index_candidates(DataSource::Cdn, RepoKind::Official);

        assert_eq!(urls.len(), 2);
        assert_eq!(
            urls[0].as_str(),
            "https://fastly.jsdelivr.net/gh/open-guji/book-index@main/index.json"
        );
        assert_eq!(
            urls[1].as_str(),
            "https://cdn.jsdelivr.net/gh/open-guji/book-index@main/index.json"
        );
    }

    #[test]
    fn test_github_candidates_use_raw_layout_first() {
        let resolver = MirrorResolver::new();
        let urls = resolver.candidates(DataSource::GitHub, RepoKind::Draft, "books/b1.md");

        assert_eq!(
            urls[0].as_str(),
            "https://raw.githubusercontent.com/open-guji/book-index-draft/main/books/b1.md"
        );
        assert_eq!(
            urls[1].as_str(),
            "https://cdn.jsdelivr.net/gh/open-guji/book-index-draft@main/books/b1.md"
        );
    }

    #[test]
    fn test_relative_path_normalization() {
        let resolver = MirrorResolver::new();
        let plain = resolver.candidates(DataSource::Cdn, RepoKind::Draft, "a/b.md");
        let dotted = resolver.candidates(DataSource::Cdn, RepoKind::Draft, "./a//b.md");
        let rooted = resolver.candidates(DataSource::Cdn, RepoKind::Draft, "/a/b.md");

        assert_eq!(plain, dotted);
        assert_eq!(plain, rooted);
    }

    #[test]
    fn test_non_ascii_path_is_percent_encoded() {
        let resolver = MirrorResolver::new();
        let urls = resolver.candidates(DataSource::Cdn, RepoKind::Official, "经部/论语 集注.md");

        let url = urls[0].as_str();
        assert!(url.starts_with("https://fastly.jsdelivr.net/gh/open-guji/book-index@main/"));
        assert!(url.contains("%E7%BB%8F%E9%83%A8"));
        assert!(url.ends_with("%20%E9%9B%86%E6%B3%A8.md"));
    }

    #[test]
    fn test_custom_mirrors() {
        let resolver = MirrorResolver::new()
            .with_mirrors(
                DataSource::Cdn,
                vec![
                    Mirror::new("primary", "http://127.0.0.1:8080/primary/", PathLayout::Jsdelivr)
                        .unwrap(),
                    Mirror::new("secondary", "http://127.0.0.1:8080/secondary", PathLayout::Raw)
                        .unwrap(),
                ],
            )
            .unwrap();

        let urls = resolver.index_candidates(DataSource::Cdn, RepoKind::Draft);
        assert_eq!(
            urls[0].as_str(),
            "http://127.0.0.1:8080/primary/open-guji/book-index-draft@main/index.json"
        );
        assert_eq!(
            urls[1].as_str(),
            "http://127.0.0.1:8080/secondary/open-guji/book-index-draft/main/index.json"
        );

        // other sources are untouched
        assert_eq!(resolver.mirrors(DataSource::GitHub)[0].name(), "github-raw");
    }

    #[test]
    fn test_invalid_mirrors_rejected() {
        assert!(Mirror::new("bad", "not a url", PathLayout::Raw).is_err());
        assert!(Mirror::new("mailto", "mailto:someone@example.org", PathLayout::Raw).is_err());

        let single = vec![Mirror::new("only", "https://example.org", PathLayout::Raw).unwrap()];
        assert!(MirrorResolver::new()
            .with_mirrors(DataSource::Cdn, single)
            .is_err());
    }
}
