//! Engine construction from configuration.

use cv_config::Config;
use cv_markdown::{Markdown, RenderOptions, extensions};

use crate::error::CliError;

/// Build a Markdown engine with the configured extensions and limits.
///
/// Extensions are registered in the order they are listed in the config.
pub(crate) fn build_engine(config: &Config) -> Result<Markdown, CliError> {
    let options = RenderOptions::default()
        .with_max_input_bytes(config.render.max_input_bytes)
        .with_max_depth(config.render.max_depth);

    config
        .render
        .extensions
        .iter()
        .try_fold(Markdown::new().with_options(options), |markdown, name| {
            let extension = extensions::by_name(name).ok_or_else(|| unknown_extension(name))?;
            Ok(markdown.with_boxed_extension(extension))
        })
}

/// Reject names that are not built-in extensions.
pub(crate) fn check_known(names: &[String]) -> Result<(), CliError> {
    match names.iter().find(|name| extensions::by_name(name).is_none()) {
        Some(name) => Err(unknown_extension(name)),
        None => Ok(()),
    }
}

fn unknown_extension(name: &str) -> CliError {
    CliError::Validation(format!(
        "Unknown extension \"{name}\" (available: {})",
        extensions::BUILTIN_NAMES.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(markdown: &Markdown) -> Vec<&'static str> {
        markdown.extensions().map(|e| e.name()).collect()
    }

    #[test]
    fn test_default_config_matches_builtin_order() {
        assert_eq!(cv_config::DEFAULT_EXTENSIONS, extensions::BUILTIN_NAMES);

        let markdown = build_engine(&Config::default()).unwrap();
        assert_eq!(names(&markdown), extensions::BUILTIN_NAMES);
    }

    #[test]
    fn test_configured_order_and_limits() {
        let mut config = Config::default();
        config.render.extensions = vec!["strong-adjacency-fix".to_owned(), "lrn".to_owned()];
        config.render.max_depth = 4;

        let markdown = build_engine(&config).unwrap();
        assert_eq!(names(&markdown), vec!["strong-adjacency-fix", "lrn"]);
        assert_eq!(markdown.options().max_depth, 4);
    }

    #[test]
    fn test_unknown_extension_in_config() {
        let mut config = Config::default();
        config.render.extensions.push("tabs".to_owned());

        let err = build_engine(&config).unwrap_err();
        assert!(err.to_string().contains("Unknown extension \"tabs\""));
    }

    #[test]
    fn test_check_known() {
        assert!(check_known(&["lrn".to_owned()]).is_ok());
        assert!(check_known(&["lrn".to_owned(), "nope".to_owned()]).is_err());
        assert!(check_known(&[]).is_ok());
    }
}
