//! Standalone HTML document wrapper.

use std::fmt::Write;

use cv_config::OutputConfig;
use cv_markdown::escape_html;

/// Iconify web component rendering `<iconify-icon>` elements.
const ICONIFY_SCRIPT: &str = "https://code.iconify.design/iconify-icon/2.3.0/iconify-icon.min.js";

/// Wrap a rendered fragment in an HTML5 document.
///
/// The Iconify script is only referenced when the body uses icons.
pub(crate) fn standalone(body: &str, output: &OutputConfig) -> String {
    let mut html = String::with_capacity(body.len() + 512);
    html.push_str("<!DOCTYPE html>\n");
    writeln!(html, r#"<html lang="{}">"#, escape_html(&output.lang)).unwrap();
    html.push_str("<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    writeln!(html, "<title>{}</title>", escape_html(&output.title)).unwrap();
    if let Some(stylesheet) = &output.stylesheet {
        writeln!(html, r#"<link rel="stylesheet" href="{}">"#, escape_html(stylesheet)).unwrap();
    }
    if body.contains("<iconify-icon") {
        writeln!(html, r#"<script src="{ICONIFY_SCRIPT}"></script>"#).unwrap();
    }
    html.push_str("</head>\n<body>\n");
    html.push_str(body);
    if !body.is_empty() && !body.ends_with('\n') {
        html.push('\n');
    }
    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_minimal_document() {
        let output = OutputConfig::default();
        assert_eq!(
            standalone("<p>Hi</p>\n", &output),
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>Curriculum Vitae</title>\n</head>\n<body>\n<p>Hi</p>\n</body>\n</html>\n"
        );
    }

    #[test]
    fn test_stylesheet_and_escaped_title() {
        let output = OutputConfig {
            title: "Jane <Doe>".to_owned(),
            stylesheet: Some("cv.css".to_owned()),
            ..OutputConfig::default()
        };
        let html = standalone("", &output);
        assert!(html.contains("<title>Jane &lt;Doe&gt;</title>"));
        assert!(html.contains(r#"<link rel="stylesheet" href="cv.css">"#));
        assert!(!html.contains("<script"));
    }

    #[test]
    fn test_icons_pull_in_script() {
        let body = r#"<p class="icon-line"><iconify-icon icon="mdi:web" class="mdi:web"></iconify-icon></p>"#;
        let html = standalone(body, &OutputConfig::default());
        assert!(html.contains(ICONIFY_SCRIPT));
        assert!(html.contains(&format!("{body}\n</body>")));
    }
}
