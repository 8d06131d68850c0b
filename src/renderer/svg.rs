//! SVG document assembly for the preview surface

use crate::stylesheet::{Stylesheet, BACKGROUND, QUADRANT, SELECTION, TEXT, WARNING};

use super::PreviewConfig;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: PreviewConfig,
    styles: Vec<String>,
    elements: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: PreviewConfig) -> Self {
        Self {
            config,
            styles: vec![],
            elements: vec![],
            indent: 1,
        }
    }

    /// Add an `@font-face` rule; `src` is a complete CSS `src` value
    pub fn add_font_face(&mut self, family: &str, src: &str) {
        self.styles
            .push(format!(r#"@font-face {{ font-family: "{family}"; src: {src}; }}"#));
    }

    /// Add CSS custom properties and class rules from a stylesheet
    pub fn add_stylesheet(&mut self, stylesheet: &Stylesheet) {
        let mut tokens: Vec<_> = stylesheet.colors.iter().collect();
        tokens.sort();

        let mut css = String::from(":root {");
        for (token, value) in tokens {
            css.push_str(&format!(" --{}: {};", token, value));
        }
        css.push_str(" }");
        self.styles.push(css);

        let p = self.prefix();
        let color = |token: &str| stylesheet.resolve_or_default(token);
        self.styles.extend([
            format!(".{p}background {{ fill: {}; }}", color(BACKGROUND)),
            format!(
                ".{p}quadrant {{ fill: none; stroke: {}; stroke-width: 1; }}",
                color(QUADRANT)
            ),
            format!(
                ".{p}text {{ fill: {}; font-family: {}; }}",
                color(TEXT),
                self.config.font_family
            ),
            format!(
                ".{p}selection {{ fill: none; stroke: {}; stroke-width: 2; }}",
                color(SELECTION)
            ),
            format!(".{p}out-of-bounds .{p}text {{ fill: {}; }}", color(WARNING)),
        ]);
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn class_list(&self, classes: &[&str]) -> String {
        let prefix = self.prefix();
        classes
            .iter()
            .map(|class| format!("{prefix}{class}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Add a rectangle element
    pub fn add_rect(&mut self, x: f64, y: f64, w: f64, h: f64, classes: &[&str]) {
        self.elements.push(format!(
            r#"{}<rect class="{}" x="{}" y="{}" width="{}" height="{}"/>"#,
            self.indent_str(),
            self.class_list(classes),
            num(x),
            num(y),
            num(w),
            num(h),
        ));
    }

    /// Add a raster image referenced by URI
    pub fn add_image(&mut self, href: &str, x: f64, y: f64, w: f64, h: f64, classes: &[&str]) {
        self.elements.push(format!(
            r#"{}<image class="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" href="{}"/>"#,
            self.indent_str(),
            self.class_list(classes),
            num(x),
            num(y),
            num(w),
            num(h),
            escape_xml(href),
        ));
    }

    /// Add a text element with its left edge at `x` and baseline at `y`
    pub fn add_text(&mut self, text: &str, x: f64, y: f64, font_size: f64, classes: &[&str]) {
        self.elements.push(format!(
            r#"{}<text class="{}" x="{}" y="{}" font-size="{}">{}</text>"#,
            self.indent_str(),
            self.class_list(classes),
            num(x),
            num(y),
            num(font_size),
            escape_xml(text)
        ));
    }

    /// Add a group element with optional ID and classes
    pub fn start_group(&mut self, id: Option<&str>, classes: &[&str]) {
        let id_attr = id.map(|i| format!(r#" id="{}""#, i)).unwrap_or_default();
        let class_attr = if classes.is_empty() {
            String::new()
        } else {
            format!(r#" class="{}""#, self.class_list(classes))
        };

        self.elements
            .push(format!("{}<g{}{}>", self.indent_str(), id_attr, class_attr));
        self.indent += 1;
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Build the final SVG string for a surface of `width` × `height`
    pub fn build(self, width: f64, height: f64) -> String {
        let nl = self.newline();
        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = num(width),
            h = num(height)
        ));
        svg.push_str(nl);

        if !self.styles.is_empty() {
            svg.push_str("  <style>");
            svg.push_str(nl);
            for style in &self.styles {
                svg.push_str("    ");
                svg.push_str(style);
                svg.push_str(nl);
            }
            svg.push_str("  </style>");
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Format a coordinate with at most two decimals
fn num(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
