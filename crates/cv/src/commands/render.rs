//! `cv render` command implementation.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use cv_config::{CliSettings, Config};
use cv_markdown::Markdown;

use crate::document;
use crate::engine::{build_engine, check_known};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown input file (default: stdin, also read for `-`).
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover cv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Wrap the output in a standalone HTML document (overrides config).
    #[arg(long)]
    standalone: bool,

    /// Document title for standalone output (overrides config).
    #[arg(long)]
    title: Option<String>,

    /// Stylesheet href for standalone output (overrides config).
    #[arg(long)]
    stylesheet: Option<String>,

    /// Disable an extension by name (repeatable).
    #[arg(long = "disable", value_name = "NAME")]
    disabled: Vec<String>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or input/output fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        check_known(&self.disabled)?;
        let has_document_flags = self.title.is_some() || self.stylesheet.is_some();

        let cli_settings = CliSettings {
            standalone: self.standalone.then_some(true),
            title: self.title,
            stylesheet: self.stylesheet,
            disabled_extensions: self.disabled,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let markdown = build_engine(&config)?;

        if has_document_flags && !config.output.standalone {
            output.warning("--title and --stylesheet only apply to standalone output");
        }

        let source = read_input(self.input.as_deref())?;
        let html = render_document(&markdown, &source, &config);
        tracing::debug!(
            input_bytes = source.len(),
            output_bytes = html.len(),
            standalone = config.output.standalone,
            "Rendered document"
        );

        match self.output.as_deref() {
            Some(path) => {
                std::fs::write(path, &html)?;
                output.wrote(path, html.len());
            }
            None => output.document(&html)?,
        }
        Ok(())
    }
}

/// Render `source` and wrap it when standalone output is configured.
fn render_document(markdown: &Markdown, source: &str, config: &Config) -> String {
    let fragment = markdown.parse(source);
    if config.output.standalone {
        document::standalone(&fragment, &config.output)
    } else {
        fragment
    }
}

/// Read Markdown from a file, or from stdin when no path (or `-`) is given.
fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        }),
        _ => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "% Jane Doe\n\nAcme\n~ 2020\n";

    #[test]
    fn test_render_fragment() {
        let config = Config::default();
        let markdown = build_engine(&config).unwrap();

        assert_eq!(
            render_document(&markdown, SOURCE, &config),
            concat!(
                r#"<div class="centerline">Jane Doe</div>"#,
                r#"<div class="lr"><div class="lr-item">Acme</div><div class="lr-item">2020</div></div>"#
            )
        );
    }

    #[test]
    fn test_render_standalone() {
        let mut config = Config::default();
        config.output.standalone = true;
        let markdown = build_engine(&config).unwrap();

        let html = render_document(&markdown, SOURCE, &config);
        assert!(html.starts_with("<!DOCTYPE html>\n"));
        assert!(html.contains(r#"<div class="centerline">Jane Doe</div>"#));
    }

    #[test]
    fn test_render_with_disabled_extension() {
        let settings = CliSettings {
            disabled_extensions: vec!["centerline".to_owned()],
            ..CliSettings::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.toml");
        std::fs::write(&path, "").unwrap();

        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        let markdown = build_engine(&config).unwrap();
        assert!(render_document(&markdown, "% Jane", &config).starts_with("<p>% Jane</p>"));
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.md");
        std::fs::write(&path, SOURCE).unwrap();

        assert_eq!(read_input(Some(&path)).unwrap(), SOURCE);
    }

    #[test]
    fn test_read_input_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.md");

        let err = read_input(Some(&path)).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
        assert!(err.to_string().contains("missing.md"));
    }
}
