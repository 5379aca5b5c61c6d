//! `${VAR}` and `${VAR:-default}` expansion for configuration strings.

use crate::ConfigError;

/// Variable that was referenced but not set.
struct UnsetVar(String);

/// Expand `${VAR}` references in `value`.
///
/// `${VAR:-default}` falls back to `default` when `VAR` is unset. A bare
/// `$VAR` is left as is, so URLs containing `$` survive unchanged.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(UnsetVar(var.to_owned())),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expands_set_variable() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("DEWY_TEST_HOST", "0.0.0.0");
        }
        assert_eq!(
            expand_env("${DEWY_TEST_HOST}", "server.host").unwrap(),
            "0.0.0.0"
        );
        assert_eq!(
            expand_env("${DEWY_TEST_HOST:-127.0.0.1}", "server.host").unwrap(),
            "0.0.0.0"
        );
        unsafe {
            std::env::remove_var("DEWY_TEST_HOST");
        }
    }

    #[test]
    fn test_default_for_unset_variable() {
        assert_eq!(
            expand_env("https://${DEWY_TEST_UNSET_A:-github.com}/linyows", "site.repository_url")
                .unwrap(),
            "https://github.com/linyows"
        );
    }

    #[test]
    fn test_unset_variable_names_field() {
        let err = expand_env("${DEWY_TEST_UNSET_B}", "site.edit_base_url").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let message = err.to_string();
        assert!(message.contains("DEWY_TEST_UNSET_B"));
        assert!(message.contains("site.edit_base_url"));
    }

    #[test]
    fn test_bare_dollar_untouched() {
        assert_eq!(
            expand_env("https://example.com/$path", "site.repository_url").unwrap(),
            "https://example.com/$path"
        );
    }
}
