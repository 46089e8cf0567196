//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` and `$VAR` - expand to the value of VAR, error if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! A `$` not followed by `{` or a variable name (`$5`, a trailing `$`) stays
//! literal.

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `$` is present.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    // Fast path: no expansion needed
    if !value.contains('$') {
        return Ok(value.to_owned());
    }

    if let Some(missing) = first_missing_var(value) {
        return Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{missing}}} not set"),
        });
    }

    let expanded = shellexpand::env_with_context_no_errors(value, |var| std::env::var(var).ok());
    Ok(expanded.into_owned())
}

/// First reference without a default whose variable is unset.
fn first_missing_var(value: &str) -> Option<&str> {
    let mut rest = value;
    while let Some(dollar) = rest.find('$') {
        let after = &rest[dollar + 1..];
        let (reference, next) = if let Some(body) = after.strip_prefix('{') {
            let end = body.find('}')?;
            let reference = &body[..end];
            ((!reference.contains(":-")).then_some(reference), &body[end + 1..])
        } else {
            let len = bare_name_len(after);
            ((len > 0).then(|| &after[..len]), &after[len..])
        };
        if let Some(name) = reference
            && std::env::var_os(name).is_none()
        {
            return Some(name);
        }
        rest = next;
    }
    None
}

/// Length of a bare variable name: a letter or `_`, then letters, digits or `_`.
fn bare_name_len(s: &str) -> usize {
    if !s.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return 0;
    }
    s.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_')).unwrap_or(s.len())
}
