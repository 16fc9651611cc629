//! Target parsing for the HTTP probe.

use url::Url;

/// A target string that cannot be probed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("invalid target URL '{input}': {reason}")]
    Invalid { input: String, reason: String },
    #[error("unsupported scheme '{scheme}' in target '{input}' (expected http or https)")]
    UnsupportedScheme { input: String, scheme: String },
}

/// Parse an `http`/`https` URL target.
pub fn parse_target(input: &str) -> Result<Url, TargetError> {
    let url = Url::parse(input.trim()).map_err(|e| TargetError::Invalid {
        input: input.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(TargetError::UnsupportedScheme {
            input: input.to_string(),
            scheme: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let url = parse_target(" https://example.com/health ").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.path(), "/health");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_target("not a url"), Err(TargetError::Invalid { .. })));
    }

    #[test]
    fn test_parse_rejects_scheme() {
        let err = parse_target("ftp://example.com").unwrap_err();
        assert!(matches!(err, TargetError::UnsupportedScheme { ref scheme, .. } if scheme == "ftp"));
    }
}
