//! Terminal output for the `cv` commands.
//!
//! Command results (rendered HTML, the extension listing) go to stdout.
//! Status lines and diagnostics go to stderr, so `cv render > cv.html`
//! only ever captures the document.

use std::io;
use std::path::Path;

use console::{Style, Term};

/// Terminal writer split between command results and status lines.
pub(crate) struct Output {
    out: Term,
    err: Term,
    green: Style,
    yellow: Style,
    red: Style,
    dim: Style,
    bold: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            dim: Style::new().dim(),
            bold: Style::new().cyan().bold(),
        }
    }

    /// Write a rendered document to stdout, unstyled.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout is closed.
    pub(crate) fn document(&self, html: &str) -> io::Result<()> {
        self.out.write_str(html)?;
        self.out.flush()
    }

    /// Write the extension listing to stdout under a heading.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout is closed.
    pub(crate) fn listing(&self, heading: &str, lines: &[String]) -> io::Result<()> {
        self.out.write_line(&self.bold.apply_to(heading).to_string())?;
        for line in lines {
            self.out.write_line(line)?;
        }
        Ok(())
    }

    /// Report which config file was loaded.
    pub(crate) fn config_source(&self, path: &Path) {
        let line = format!("Config: {}", path.display());
        let _ = self.err.write_line(&self.dim.apply_to(line).to_string());
    }

    /// Report a written output file.
    pub(crate) fn wrote(&self, path: &Path, bytes: usize) {
        let line = format!("Wrote {} ({bytes} bytes)", path.display());
        let _ = self.err.write_line(&self.green.apply_to(line).to_string());
    }

    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.err.write_line(&self.yellow.apply_to(msg).to_string());
    }

    pub(crate) fn error(&self, msg: &str) {
        let _ = self.err.write_line(&self.red.apply_to(msg).to_string());
    }
}
