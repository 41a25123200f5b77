/// Mount points and viewer settings for [`router`](crate::router).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// RPC envelope endpoint; `{rpc_path}/a/b` addresses procedure `a.b`.
    pub rpc_path: String,
    /// Prefix under which declared REST routes are mounted.
    pub rest_prefix: String,
    pub openapi_path: String,
    pub docs_path: String,
    /// Bearer token pre-filled in the documentation viewer.
    pub docs_token: String,
    /// Attach a permissive CORS layer.
    pub cors: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            rpc_path: "/api/rpc".to_string(),
            rest_prefix: "/api".to_string(),
            openapi_path: "/api/openapi".to_string(),
            docs_path: "/api/docs".to_string(),
            docs_token: "default-token".to_string(),
            cors: true,
        }
    }
}

impl HttpConfig {
    /// Strip the REST prefix from a request path. `None` when the path lies
    /// outside the prefix.
    pub fn rest_path<'a>(&self, path: &'a str) -> Option<&'a str> {
        let prefix = self.rest_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return Some(path);
        }
        match path.strip_prefix(prefix)? {
            "" => Some("/"),
            rest if rest.starts_with('/') => Some(rest),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_path_strips_prefix() {
        let config = HttpConfig::default();

        assert_eq!(config.rest_path("/api/greet"), Some("/greet"));
        assert_eq!(config.rest_path("/api"), Some("/"));
        assert_eq!(config.rest_path("/apiary"), None);
        assert_eq!(config.rest_path("/other"), None);
    }

    #[test]
    fn empty_prefix_passes_through() {
        let config = HttpConfig {
            rest_prefix: "/".to_string(),
            ..HttpConfig::default()
        };

        assert_eq!(config.rest_path("/greet"), Some("/greet"));
    }
}
