//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` names the config key for error reporting.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_string_unchanged() {
        assert_eq!(expand_env("My Site", "site.site_name").unwrap(), "My Site");
    }

    #[test]
    fn test_default_used_when_unset() {
        let value = expand_env("${KILN_TEST_SURELY_UNSET:-Fallback}", "site.site_name").unwrap();

        assert_eq!(value, "Fallback");
    }

    #[test]
    fn test_unset_variable_errors_with_field() {
        let err = expand_env("${KILN_TEST_SURELY_UNSET}", "site.site_name").unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "site.site_name"));
        assert!(err.to_string().contains("KILN_TEST_SURELY_UNSET"));
    }
}
