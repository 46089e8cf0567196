//! `cv extensions` command implementation.

use std::path::PathBuf;

use clap::Args;
use cv_config::Config;
use cv_markdown::Markdown;

use crate::engine::build_engine;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the extensions command.
#[derive(Args)]
pub(crate) struct ExtensionsArgs {
    /// Path to configuration file (default: auto-discover cv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ExtensionsArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), None)?;
        let markdown = build_engine(&config)?;

        if let Some(path) = &config.config_path {
            output.config_source(path);
        }

        let lines = extension_lines(&markdown);
        if lines.is_empty() {
            output.warning("No extensions enabled, documents render as plain Markdown");
            return Ok(());
        }

        output.listing("Active extensions (precedence order):", &lines)?;
        Ok(())
    }
}

/// One listing line per extension: position, name and level.
fn extension_lines(markdown: &Markdown) -> Vec<String> {
    markdown
        .extensions()
        .enumerate()
        .map(|(i, extension)| {
            format!(
                "{:>2}. {:<22} {}",
                i + 1,
                extension.name(),
                extension.level().as_str()
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extension_lines() {
        assert_eq!(
            extension_lines(&Markdown::cv()),
            vec![
                " 1. lrn                    block",
                " 2. centerline             block",
                " 3. iconify-inline         inline",
                " 4. strong-adjacency-fix   inline",
            ]
        );
    }

    #[test]
    fn test_no_extensions() {
        assert!(extension_lines(&Markdown::new()).is_empty());
    }
}
