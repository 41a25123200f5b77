use std::fmt;

use percent_encoding::percent_decode_str;

use crate::error::{RegistryError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// A parsed route path such as `/todos/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    path: String,
    segments: Vec<Segment>,
}

impl RouteTemplate {
    /// Parse an absolute path; `{name}` segments capture one path segment each.
    pub fn parse(path: &str) -> Result<Self> {
        if !path.starts_with('/') {
            return Err(invalid(path, "path must start with '/'"));
        }

        let mut segments = Vec::new();
        for raw in split_path(path) {
            let segment = match raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => {
                    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                        return Err(invalid(path, "parameter names must be non-empty identifiers"));
                    }
                    if segments.iter().any(|s| matches!(s, Segment::Param(p) if p == name)) {
                        return Err(invalid(path, "parameter names must be unique"));
                    }
                    Segment::Param(name.to_string())
                }
                None => {
                    if raw.contains('{') || raw.contains('}') {
                        return Err(invalid(path, "braces must wrap a whole segment"));
                    }
                    Segment::Static(raw.to_string())
                }
            };
            segments.push(segment);
        }

        let normalized = format!("/{}", split_path(path).collect::<Vec<_>>().join("/"));
        Ok(Self {
            path: normalized,
            segments,
        })
    }

    /// Normalized path (no trailing or doubled slashes).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// True when the template has no parameters.
    pub fn is_static(&self) -> bool {
        self.segments.iter().all(|s| matches!(s, Segment::Static(_)))
    }

    /// Parameter names in path order.
    pub fn params(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(name) => Some(name.as_str()),
                Segment::Static(_) => None,
            })
            .collect()
    }

    /// Number of literal segments; more literal templates are matched first.
    pub fn static_weight(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Static(_)))
            .count()
    }

    /// Match a raw request path, returning percent-decoded captures.
    pub fn matches(&self, path: &str) -> Option<Vec<(String, String)>> {
        let parts: Vec<&str> = split_path(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut captured = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            let part = percent_decode_str(part).decode_utf8_lossy();
            match segment {
                Segment::Static(literal) if *literal == part => {}
                Segment::Static(_) => return None,
                Segment::Param(name) => captured.push((name.clone(), part.into_owned())),
            }
        }
        Some(captured)
    }
}

impl fmt::Display for RouteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Normalize a request path the same way templates are normalized.
pub fn normalize_path(path: &str) -> String {
    format!("/{}", split_path(path).collect::<Vec<_>>().join("/"))
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn invalid(path: &str, reason: &str) -> RegistryError {
    RegistryError::InvalidRoute {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_paths_normalize() {
        let route = RouteTemplate::parse("/todos/").unwrap();
        assert_eq!(route.path(), "/todos");
        assert!(route.is_static());
        assert_eq!(route.matches("/todos"), Some(vec![]));
        assert_eq!(route.matches("//todos/"), Some(vec![]));
        assert_eq!(route.matches("/todos/1"), None);
    }

    #[test]
    fn params_are_captured() {
        let route = RouteTemplate::parse("/todos/{id}/tags/{tag}").unwrap();
        assert_eq!(route.params(), vec!["id", "tag"]);
        assert_eq!(route.static_weight(), 2);
        assert_eq!(
            route.matches("/todos/7/tags/home"),
            Some(vec![
                ("id".to_string(), "7".to_string()),
                ("tag".to_string(), "home".to_string())
            ])
        );
        assert_eq!(route.matches("/todos/7/labels/home"), None);
    }

    #[test]
    fn captures_are_percent_decoded() {
        let route = RouteTemplate::parse("/items/{id}").unwrap();
        assert_eq!(
            route.matches("/items/hello%20world"),
            Some(vec![("id".to_string(), "hello world".to_string())])
        );
        assert_eq!(
            route.matches("/items/caf%C3%A9"),
            Some(vec![("id".to_string(), "café".to_string())])
        );

        let route = RouteTemplate::parse("/my items").unwrap();
        assert_eq!(route.matches("/my%20items"), Some(vec![]));
    }

    #[test]
    fn rejects_malformed_paths() {
        assert!(RouteTemplate::parse("todos").is_err());
        assert!(RouteTemplate::parse("/todos/{}").is_err());
        assert!(RouteTemplate::parse("/todos/x{id}").is_err());
        assert!(RouteTemplate::parse("/a/{id}/b/{id}").is_err());
    }

    #[test]
    fn root_path() {
        let route = RouteTemplate::parse("/").unwrap();
        assert_eq!(route.path(), "/");
        assert_eq!(route.matches("/"), Some(vec![]));
    }
}
