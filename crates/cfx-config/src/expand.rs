//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Variables are resolved through `lookup`. Returns the original string
/// unchanged if no `${}` patterns are present.
pub(crate) fn expand_env(
    value: &str,
    field: &str,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        lookup(var).map(Some).ok_or_else(|| LookupError {
            var_name: var.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn env(name: &str) -> Option<String> {
        match name {
            "CFX_HOST" => Some("wiki.example.com".to_owned()),
            "CFX_USER" => Some("admin".to_owned()),
            "CFX_TOKEN" => Some("secret".to_owned()),
            _ => None,
        }
    }

    #[test]
    fn test_expand_simple_var() {
        assert_eq!(expand_env("${CFX_TOKEN}", "test.field", &env).unwrap(), "secret");
    }

    #[test]
    fn test_expand_with_default_uses_value() {
        assert_eq!(
            expand_env("${CFX_USER:-nobody}", "test.field", &env).unwrap(),
            "admin"
        );
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        assert_eq!(
            expand_env("${CFX_UNSET:-fallback}", "test.field", &env).unwrap(),
            "fallback"
        );
    }

    #[test]
    fn test_expand_missing_var_error() {
        let err = expand_env("${CFX_MISSING}", "confluence.api_token", &env).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("CFX_MISSING"));
        assert!(err.to_string().contains("confluence.api_token"));
    }

    #[test]
    fn test_expand_literal_unchanged() {
        assert_eq!(
            expand_env("literal string", "test.field", &env).unwrap(),
            "literal string"
        );
        assert_eq!(expand_env("$CFX_TOKEN", "test.field", &env).unwrap(), "$CFX_TOKEN");
    }

    #[test]
    fn test_expand_embedded_vars() {
        assert_eq!(
            expand_env("https://${CFX_HOST}/wiki", "test.url", &env).unwrap(),
            "https://wiki.example.com/wiki"
        );
        assert_eq!(
            expand_env("${CFX_USER}:${CFX_TOKEN}", "test.creds", &env).unwrap(),
            "admin:secret"
        );
    }
}
