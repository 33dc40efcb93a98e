//! Email template rendering.
//!
//! Stored templates are written in a small email-markup dialect with
//! `{placeholder}` slots. Rendering happens in two passes: placeholder
//! substitution (literal, global), then compilation of the markup into
//! final HTML. Compilation is all-or-nothing; malformed markup surfaces
//! as an error rather than partial output.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to compile template markup: {0}")]
    Compile(String),
}

/// Replaces every literal occurrence of `{key}` in `body` with the mapped
/// value, for every key in `data`. Matching is on literal text, so keys
/// containing pattern metacharacters cannot corrupt the replacement.
/// Placeholders with no mapped value are left untouched.
///
/// Values must arrive pre-stringified; mapping booleans to "Yes"/"No" and
/// formatting dates is the caller's job.
pub fn render_placeholders(body: &str, data: &HashMap<String, String>) -> String {
    let mut out = body.to_string();
    for (key, value) in data {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}

/// Substitutes placeholders and compiles the result to HTML.
pub fn render(body: &str, data: &HashMap<String, String>) -> Result<String, TemplateError> {
    compile(&render_placeholders(body, data))
}

const KNOWN_TAGS: &[&str] = &[
    "mjml",
    "mj-head",
    "mj-style",
    "mj-body",
    "mj-section",
    "mj-column",
    "mj-text",
    "mj-image",
    "mj-divider",
];

/// Tags whose content is taken verbatim up to the matching close tag.
/// Lets `mj-text` carry inline HTML and `mj-style` carry CSS.
const RAW_TEXT_TAGS: &[&str] = &["mj-text", "mj-style"];

#[derive(Debug)]
enum Node {
    Element {
        name: String,
        attrs: Vec<(String, String)>,
        children: Vec<Node>,
    },
    Text(String),
}

impl Node {
    fn name(&self) -> Option<&str> {
        match self {
            Node::Element { name, .. } => Some(name),
            Node::Text(_) => None,
        }
    }
}

fn attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// Compiles the email-markup dialect into a standalone HTML document.
///
/// Structure is validated during emission: a single `<mjml>` root with an
/// optional `<mj-head>` and a required `<mj-body>`, sections containing
/// columns, columns containing leaf content. Unknown tags, unbalanced
/// markup and missing required structure are compile errors.
pub fn compile(markup: &str) -> Result<String, TemplateError> {
    let nodes = Parser::new(markup).parse_document()?;

    let mut root = None;
    for node in nodes {
        match node {
            Node::Element { ref name, .. } if name == "mjml" => {
                if root.is_some() {
                    return Err(TemplateError::Compile("multiple <mjml> roots".into()));
                }
                root = Some(node);
            }
            Node::Element { name, .. } => {
                return Err(TemplateError::Compile(format!(
                    "expected <mjml> root, found <{}>",
                    name
                )));
            }
            Node::Text(text) if !text.trim().is_empty() => {
                return Err(TemplateError::Compile(
                    "unexpected text outside <mjml> root".into(),
                ));
            }
            Node::Text(_) => {}
        }
    }

    let root = root.ok_or_else(|| TemplateError::Compile("missing <mjml> root".into()))?;
    let children = match root {
        Node::Element { children, .. } => children,
        Node::Text(_) => unreachable!(),
    };

    let mut styles = String::new();
    let mut body_html = None;
    for child in &children {
        match child.name() {
            Some("mj-head") => emit_head(child, &mut styles)?,
            Some("mj-body") => {
                if body_html.is_some() {
                    return Err(TemplateError::Compile("multiple <mj-body> elements".into()));
                }
                body_html = Some(emit_body(child)?);
            }
            Some(other) => {
                return Err(TemplateError::Compile(format!(
                    "<{}> is not allowed inside <mjml>",
                    other
                )));
            }
            None => check_blank(child)?,
        }
    }

    let body_html =
        body_html.ok_or_else(|| TemplateError::Compile("missing <mj-body>".into()))?;

    let mut html = String::with_capacity(markup.len() + 512);
    html.push_str("<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&styles);
    html.push_str("</head>\n");
    html.push_str(&body_html);
    html.push_str("</html>\n");
    Ok(html)
}

/// Errors on non-whitespace text nodes in element-only positions.
fn check_blank(node: &Node) -> Result<(), TemplateError> {
    if let Node::Text(text) = node {
        if !text.trim().is_empty() {
            return Err(TemplateError::Compile(format!(
                "unexpected text content: {:?}",
                text.trim()
            )));
        }
    }
    Ok(())
}

fn emit_head(head: &Node, styles: &mut String) -> Result<(), TemplateError> {
    let children = match head {
        Node::Element { children, .. } => children,
        Node::Text(_) => unreachable!(),
    };
    for child in children {
        match child {
            Node::Element { name, children, .. } if name == "mj-style" => {
                styles.push_str("<style>\n");
                for grandchild in children {
                    if let Node::Text(css) = grandchild {
                        styles.push_str(css);
                    }
                }
                styles.push_str("\n</style>\n");
            }
            Node::Element { name, .. } => {
                return Err(TemplateError::Compile(format!(
                    "<{}> is not allowed inside <mj-head>",
                    name
                )));
            }
            Node::Text(_) => check_blank(child)?,
        }
    }
    Ok(())
}

fn emit_body(body: &Node) -> Result<String, TemplateError> {
    let (attrs, children) = match body {
        Node::Element { attrs, children, .. } => (attrs, children),
        Node::Text(_) => unreachable!(),
    };

    let background = attr(attrs, "background-color").unwrap_or("#ffffff");
    let mut html = format!(
        "<body style=\"margin:0;padding:0;background-color:{};\">\n\
         <div style=\"margin:0 auto;max-width:600px;\">\n",
        background
    );
    for child in children {
        match child.name() {
            Some("mj-section") => html.push_str(&emit_section(child)?),
            Some(other) => {
                return Err(TemplateError::Compile(format!(
                    "<{}> is not allowed inside <mj-body>",
                    other
                )));
            }
            None => check_blank(child)?,
        }
    }
    html.push_str("</div>\n</body>\n");
    Ok(html)
}

fn emit_section(section: &Node) -> Result<String, TemplateError> {
    let (attrs, children) = match section {
        Node::Element { attrs, children, .. } => (attrs, children),
        Node::Text(_) => unreachable!(),
    };

    let background = attr(attrs, "background-color").unwrap_or("transparent");
    let padding = attr(attrs, "padding").unwrap_or("20px 0");
    let mut html = format!(
        "<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" \
         style=\"background-color:{};padding:{};\">\n<tr><td>\n",
        background, padding
    );
    for child in children {
        match child.name() {
            Some("mj-column") => html.push_str(&emit_column(child)?),
            Some(other) => {
                return Err(TemplateError::Compile(format!(
                    "<{}> is not allowed inside <mj-section>",
                    other
                )));
            }
            None => check_blank(child)?,
        }
    }
    html.push_str("</td></tr>\n</table>\n");
    Ok(html)
}

fn emit_column(column: &Node) -> Result<String, TemplateError> {
    let (attrs, children) = match column {
        Node::Element { attrs, children, .. } => (attrs, children),
        Node::Text(_) => unreachable!(),
    };

    let width = attr(attrs, "width").unwrap_or("100%");
    let mut html = format!(
        "<div style=\"display:inline-block;vertical-align:top;width:{};\">\n",
        width
    );
    for child in children {
        match child {
            Node::Element { name, attrs, children } => match name.as_str() {
                "mj-text" => html.push_str(&emit_text(attrs, children)),
                "mj-image" => html.push_str(&emit_image(attrs)?),
                "mj-divider" => html.push_str(&emit_divider(attrs)),
                other => {
                    return Err(TemplateError::Compile(format!(
                        "<{}> is not allowed inside <mj-column>",
                        other
                    )));
                }
            },
            Node::Text(_) => check_blank(child)?,
        }
    }
    html.push_str("</div>\n");
    Ok(html)
}

fn emit_text(attrs: &[(String, String)], children: &[Node]) -> String {
    let color = attr(attrs, "color").unwrap_or("#000000");
    let font_size = attr(attrs, "font-size").unwrap_or("13px");
    let align = attr(attrs, "align").unwrap_or("left");
    let mut content = String::new();
    for child in children {
        if let Node::Text(text) = child {
            content.push_str(text);
        }
    }
    format!(
        "<div style=\"font-family:Helvetica,Arial,sans-serif;font-size:{};color:{};text-align:{};\">{}</div>\n",
        font_size,
        color,
        align,
        content.trim()
    )
}

fn emit_image(attrs: &[(String, String)]) -> Result<String, TemplateError> {
    let src = attr(attrs, "src")
        .ok_or_else(|| TemplateError::Compile("<mj-image> requires a src attribute".into()))?;
    let alt = attr(attrs, "alt").unwrap_or("");
    let width = attr(attrs, "width").unwrap_or("auto");
    Ok(format!(
        "<img src=\"{}\" alt=\"{}\" style=\"display:block;border:0;width:{};\" />\n",
        src, alt, width
    ))
}

fn emit_divider(attrs: &[(String, String)]) -> String {
    let color = attr(attrs, "border-color").unwrap_or("#cccccc");
    format!(
        "<hr style=\"border:none;border-top:1px solid {};\" />\n",
        color
    )
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn parse_document(&mut self) -> Result<Vec<Node>, TemplateError> {
        let mut nodes = Vec::new();
        while self.pos < self.input.len() {
            if self.rest().starts_with("</") {
                return Err(TemplateError::Compile(format!(
                    "unexpected closing tag near position {}",
                    self.pos
                )));
            } else if self.rest().starts_with("<!--") {
                self.skip_comment()?;
            } else if self.rest().starts_with('<') {
                nodes.push(self.parse_element()?);
            } else {
                nodes.push(Node::Text(self.take_text()));
            }
        }
        Ok(nodes)
    }

    fn skip_comment(&mut self) -> Result<(), TemplateError> {
        match self.rest().find("-->") {
            Some(end) => {
                self.pos += end + 3;
                Ok(())
            }
            None => Err(TemplateError::Compile("unterminated comment".into())),
        }
    }

    fn take_text(&mut self) -> String {
        let end = self
            .rest()
            .find('<')
            .map(|i| self.pos + i)
            .unwrap_or(self.input.len());
        let text = self.input[self.pos..end].to_string();
        self.pos = end;
        text
    }

    fn parse_element(&mut self) -> Result<Node, TemplateError> {
        // Caller guarantees we sit on '<'.
        self.pos += 1;
        let name = self.parse_name()?;
        if !KNOWN_TAGS.contains(&name.as_str()) {
            return Err(TemplateError::Compile(format!("unknown tag <{}>", name)));
        }

        let attrs = self.parse_attrs()?;
        self.skip_whitespace();

        let self_closing = if self.rest().starts_with("/>") {
            self.pos += 2;
            true
        } else if self.rest().starts_with('>') {
            self.pos += 1;
            false
        } else {
            return Err(TemplateError::Compile(format!(
                "malformed tag <{}>",
                name
            )));
        };

        if self_closing {
            return Ok(Node::Element {
                name,
                attrs,
                children: Vec::new(),
            });
        }

        let children = if RAW_TEXT_TAGS.contains(&name.as_str()) {
            vec![Node::Text(self.take_raw_content(&name)?)]
        } else {
            self.parse_children(&name)?
        };

        Ok(Node::Element {
            name,
            attrs,
            children,
        })
    }

    /// Consumes everything up to the literal `</name>` without parsing it.
    fn take_raw_content(&mut self, name: &str) -> Result<String, TemplateError> {
        let close = format!("</{}>", name);
        match self.rest().find(&close) {
            Some(offset) => {
                let content = self.input[self.pos..self.pos + offset].to_string();
                self.pos += offset + close.len();
                Ok(content)
            }
            None => Err(TemplateError::Compile(format!("unclosed <{}>", name))),
        }
    }

    fn parse_children(&mut self, parent: &str) -> Result<Vec<Node>, TemplateError> {
        let mut children = Vec::new();
        loop {
            if self.pos >= self.input.len() {
                return Err(TemplateError::Compile(format!("unclosed <{}>", parent)));
            }
            if self.rest().starts_with("</") {
                self.pos += 2;
                let name = self.parse_name()?;
                self.skip_whitespace();
                if !self.rest().starts_with('>') {
                    return Err(TemplateError::Compile(format!(
                        "malformed closing tag </{}>",
                        name
                    )));
                }
                self.pos += 1;
                if name != parent {
                    return Err(TemplateError::Compile(format!(
                        "mismatched closing tag: expected </{}>, found </{}>",
                        parent, name
                    )));
                }
                return Ok(children);
            } else if self.rest().starts_with("<!--") {
                self.skip_comment()?;
            } else if self.rest().starts_with('<') {
                children.push(self.parse_element()?);
            } else {
                children.push(Node::Text(self.take_text()));
            }
        }
    }

    fn parse_name(&mut self) -> Result<String, TemplateError> {
        let start = self.pos;
        while let Some(c) = self.rest().chars().next() {
            if c.is_ascii_alphanumeric() || c == '-' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(TemplateError::Compile(format!(
                "expected tag name at position {}",
                start
            )));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_attrs(&mut self) -> Result<Vec<(String, String)>, TemplateError> {
        let mut attrs = Vec::new();
        loop {
            self.skip_whitespace();
            let next = self.rest().chars().next();
            match next {
                Some('>') | Some('/') => return Ok(attrs),
                Some(c) if c.is_ascii_alphanumeric() => {
                    let name = self.parse_name()?;
                    self.skip_whitespace();
                    if !self.rest().starts_with('=') {
                        return Err(TemplateError::Compile(format!(
                            "attribute {} is missing a value",
                            name
                        )));
                    }
                    self.pos += 1;
                    self.skip_whitespace();
                    let quote = self.rest().chars().next();
                    let quote = match quote {
                        Some(q @ '"') | Some(q @ '\'') => q,
                        _ => {
                            return Err(TemplateError::Compile(format!(
                                "attribute {} value must be quoted",
                                name
                            )));
                        }
                    };
                    self.pos += 1;
                    match self.rest().find(quote) {
                        Some(end) => {
                            let value = self.input[self.pos..self.pos + end].to_string();
                            self.pos += end + 1;
                            attrs.push((name, value));
                        }
                        None => {
                            return Err(TemplateError::Compile(format!(
                                "unterminated value for attribute {}",
                                name
                            )));
                        }
                    }
                }
                _ => {
                    return Err(TemplateError::Compile(format!(
                        "malformed attributes at position {}",
                        self.pos
                    )));
                }
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.rest().chars().next() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    const MINIMAL: &str = r#"<mjml>
  <mj-head>
    <mj-style>.title { font-weight: bold; }</mj-style>
  </mj-head>
  <mj-body>
    <mj-section background-color="{secondary_color}">
      <mj-column>
        <mj-image src="{logo_url}" width="120px" />
        <mj-text color="{primary_color}">Hi {username}!</mj-text>
        <mj-divider border-color="{primary_color}" />
        <mj-text>Your subscription expires in {days_remaining} days.</mj-text>
      </mj-column>
    </mj-section>
  </mj-body>
</mjml>"#;

    #[test]
    fn test_substitutes_placeholder() {
        let out = render_placeholders("Hi {username}!", &data(&[("username", "Alice")]));
        assert_eq!(out, "Hi Alice!");
    }

    #[test]
    fn test_substitution_is_global() {
        let out = render_placeholders(
            "{name} and {name} again",
            &data(&[("name", "Bob")]),
        );
        assert_eq!(out, "Bob and Bob again");
    }

    #[test]
    fn test_missing_key_left_untouched() {
        let out = render_placeholders("Hi {missing_key}!", &data(&[("username", "Alice")]));
        assert_eq!(out, "Hi {missing_key}!");
    }

    #[test]
    fn test_metacharacter_keys_match_literally() {
        let out = render_placeholders(
            "value: {a.b} and {x*}",
            &data(&[("a.b", "1"), ("x*", "2")]),
        );
        assert_eq!(out, "value: 1 and 2");
    }

    #[test]
    fn test_compile_full_document() {
        let filled = render_placeholders(
            MINIMAL,
            &data(&[
                ("username", "Alice"),
                ("days_remaining", "3"),
                ("primary_color", "#1a73e8"),
                ("secondary_color", "#f5f5f5"),
                ("logo_url", "https://example.com/logo.png"),
            ]),
        );
        let html = compile(&filled).unwrap();
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("Hi Alice!"));
        assert!(html.contains("expires in 3 days"));
        assert!(html.contains("color:#1a73e8"));
        assert!(html.contains("src=\"https://example.com/logo.png\""));
        assert!(html.contains("<style>"));
        assert!(html.contains(".title { font-weight: bold; }"));
        assert!(html.contains("<hr "));
    }

    #[test]
    fn test_unsubstituted_placeholder_passes_through() {
        // A leftover {token} is plain text as far as compilation goes.
        let html = compile(
            "<mjml><mj-body><mj-section><mj-column><mj-text>Hi {username}!</mj-text></mj-column></mj-section></mj-body></mjml>",
        )
        .unwrap();
        assert!(html.contains("Hi {username}!"));
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let err = compile("<mjml><mj-body><mj-banner>x</mj-banner></mj-body></mjml>").unwrap_err();
        assert!(err.to_string().contains("unknown tag"));
    }

    #[test]
    fn test_unbalanced_markup_rejected() {
        assert!(compile("<mjml><mj-body><mj-section></mj-body></mjml>").is_err());
        assert!(compile("<mjml><mj-body>").is_err());
    }

    #[test]
    fn test_missing_root_rejected() {
        let err = compile("<mj-body></mj-body>").unwrap_err();
        assert!(err.to_string().contains("expected <mjml> root"));
    }

    #[test]
    fn test_missing_body_rejected() {
        let err = compile("<mjml><mj-head></mj-head></mjml>").unwrap_err();
        assert!(err.to_string().contains("missing <mj-body>"));
    }

    #[test]
    fn test_image_requires_src() {
        let err = compile(
            "<mjml><mj-body><mj-section><mj-column><mj-image /></mj-column></mj-section></mj-body></mjml>",
        )
        .unwrap_err();
        assert!(err.to_string().contains("src"));
    }

    #[test]
    fn test_misplaced_element_rejected() {
        // mj-text straight inside a section, skipping the column.
        assert!(compile(
            "<mjml><mj-body><mj-section><mj-text>x</mj-text></mj-section></mj-body></mjml>"
        )
        .is_err());
    }

    #[test]
    fn test_inline_html_inside_text_is_preserved() {
        let html = compile(
            "<mjml><mj-body><mj-section><mj-column><mj-text>Visit <a href=\"https://example.com\">us</a></mj-text></mj-column></mj-section></mj-body></mjml>",
        )
        .unwrap();
        assert!(html.contains("<a href=\"https://example.com\">us</a>"));
    }

    #[test]
    fn test_comments_are_ignored() {
        let html = compile(
            "<mjml><!-- layout --><mj-body><mj-section><mj-column><mj-text>ok</mj-text></mj-column></mj-section></mj-body></mjml>",
        )
        .unwrap();
        assert!(html.contains("ok"));
        assert!(!html.contains("layout"));
    }

    #[test]
    fn test_render_pipeline() {
        let html = render(MINIMAL, &data(&[
            ("username", "Bob"),
            ("days_remaining", "7"),
            ("primary_color", "#000000"),
            ("secondary_color", "#ffffff"),
            ("logo_url", "https://cdn.example.com/l.png"),
        ]))
        .unwrap();
        assert!(html.contains("Hi Bob!"));
    }
}
