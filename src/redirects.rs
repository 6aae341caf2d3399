//! Exact-path redirects declared in the site configuration

use indexmap::IndexMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RedirectError {
    #[error("`{0}` is not an absolute path")]
    NotAbsolute(String),

    #[error("`{0}` redirects to itself")]
    SelfRedirect(String),

    #[error("`{from}` redirects to `{via}`, which redirects again")]
    Chain { from: String, via: String },
}

/// Redirect table, source path to target path
#[derive(Debug, Clone, Default)]
pub struct Redirects {
    routes: IndexMap<String, String>,
}

impl Redirects {
    pub fn new(routes: IndexMap<String, String>) -> Self {
        Self { routes }
    }

    /// Target for an exact source path
    pub fn resolve(&self, path: &str) -> Option<&str> {
        self.routes.get(path).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.routes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Check every route, collecting all problems
    pub fn validate(&self) -> Result<(), Vec<RedirectError>> {
        let mut errors = Vec::new();

        for (from, to) in &self.routes {
            for path in [from, to] {
                if !path.starts_with('/') {
                    errors.push(RedirectError::NotAbsolute(path.clone()));
                }
            }
            if from == to {
                errors.push(RedirectError::SelfRedirect(from.clone()));
            } else if self.routes.contains_key(to) {
                errors.push(RedirectError::Chain {
                    from: from.clone(),
                    via: to.clone(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
