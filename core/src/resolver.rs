//! Candidate endpoint resolution.
//!
//! A logical path such as `/patients` can be served by three bases: the
//! hardcoded production deployment, the configured API base, and the
//! configured API base without its `/api` prefix. Development builds try them
//! in the reverse order so a local backend answers first.

use crate::config::{BuildMode, ClientConfig, API_PREFIX};

#[derive(Debug, Clone)]
pub struct EndpointResolver {
    build_mode: BuildMode,
    primary_base: String,
    api_base: String,
    stripped_base: String,
}

impl EndpointResolver {
    pub fn new(config: &ClientConfig) -> Self {
        let api_base = config.api_url.trim_end_matches('/').to_string();
        let stripped_base = api_base
            .strip_suffix(API_PREFIX)
            .unwrap_or(&api_base)
            .to_string();
        Self {
            build_mode: config.build_mode,
            primary_base: config.primary_url.trim_end_matches('/').to_string(),
            api_base,
            stripped_base,
        }
    }

    pub fn build_mode(&self) -> BuildMode {
        self.build_mode
    }

    /// Ordered candidate URLs for `path`. Always three entries.
    pub fn resolve_candidates(&self, path: &str) -> Vec<String> {
        let mut candidates = vec![
            join(&self.primary_base, path),
            join(&self.api_base, path),
            join(&self.stripped_base, path),
        ];
        if self.build_mode == BuildMode::Development {
            candidates.reverse();
        }
        candidates
    }
}

fn join(base: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}
