use std::path::Path;

use log::debug;
use url::Url;

use crate::block::Inline;
use crate::links::Link;
use crate::theme::{Color, FontAttributes, Style, Theme};
use crate::view::{Image, TextSpan, View};

/// Padding either side of an inline code chip (U+2002 EN SPACE).
const CODE_PAD: &str = "\u{2002}";

/// The ambient text style inline flattening starts from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct InlineStyle<'a> {
    pub font_family: Option<&'a str>,
    pub attributes: FontAttributes,
    pub foreground: Color,
    pub background: Color,
    pub font_size: f32,
    pub line_height: f32,
}

impl<'a> InlineStyle<'a> {
    pub fn new(style: &'a Style, foreground: Color) -> Self {
        Self {
            font_family: style.font_family.as_deref(),
            attributes: style.attributes,
            foreground,
            background: style.background_color,
            font_size: style.font_size,
            line_height: style.line_height,
        }
    }

    fn span(&self, text: &str) -> TextSpan {
        TextSpan {
            text: text.to_string(),
            font_family: self.font_family.map(str::to_string),
            attributes: self.attributes,
            foreground_color: Some(self.foreground),
            background_color: Some(self.background),
            font_size: Some(self.font_size),
            line_height: Some(self.line_height),
        }
    }
}

/// Everything one block's inline content turns into.
#[derive(Debug, Default)]
pub(crate) struct Flattened {
    pub spans: Vec<TextSpan>,
    /// Links in discovery order, for the block's tap handler
    pub links: Vec<Link>,
    /// Image views, to be placed after the block itself
    pub images: Vec<View>,
}

pub(crate) struct InlineRenderer<'a> {
    theme: &'a Theme,
    relative_url_host: Option<&'a str>,
}

impl<'a> InlineRenderer<'a> {
    pub fn new(theme: &'a Theme, relative_url_host: Option<&'a str>) -> Self {
        Self {
            theme,
            relative_url_host,
        }
    }

    pub fn render_inlines(&self, inlines: &[Inline], style: &InlineStyle<'_>) -> Flattened {
        let mut out = Flattened::default();
        for inline in inlines {
            self.render_inline(inline, style, &mut out);
        }
        out
    }

    fn render_inline(&self, inline: &Inline, style: &InlineStyle<'_>, out: &mut Flattened) {
        match inline {
            Inline::Literal(text) => out.spans.push(style.span(text)),
            Inline::Emphasis { double, children } => {
                let flag = if *double {
                    FontAttributes::BOLD
                } else {
                    FontAttributes::ITALIC
                };
                let emphasized = InlineStyle {
                    attributes: style.attributes | flag,
                    ..style.clone()
                };
                for child in children {
                    self.render_inline(child, &emphasized, out);
                }
            }
            Inline::LineBreak => out.spans.push(TextSpan::plain("\n")),
            Inline::Code(code) => self.render_code(code, out),
            Inline::Link {
                url,
                image,
                children,
            } => {
                let url = resolve_url(self.relative_url_host, url);
                if *image {
                    out.images.push(View::Image(Image {
                        vector: is_vector_image(&url),
                        source: url,
                    }));
                } else {
                    self.render_link(url, children, style, out);
                }
            }
            Inline::Unsupported(kind) => debug!("can't render {kind} inlines"),
        }
    }

    fn render_code(&self, code: &str, out: &mut Flattened) {
        let theme = &self.theme.code;
        let chip = |text: &str, attributes: FontAttributes| TextSpan {
            text: text.to_string(),
            font_family: theme.font_family.clone(),
            attributes,
            foreground_color: Some(theme.foreground_color),
            background_color: Some(theme.background_color),
            font_size: Some(theme.font_size),
            line_height: None,
        };
        out.spans.push(chip(CODE_PAD, FontAttributes::NONE));
        out.spans.push(chip(code, theme.attributes));
        out.spans.push(chip(CODE_PAD, FontAttributes::NONE));
    }

    fn render_link(
        &self,
        url: String,
        children: &[Inline],
        style: &InlineStyle<'_>,
        out: &mut Flattened,
    ) {
        let theme = &self.theme.link;
        let link_style = InlineStyle {
            font_family: theme.font_family.as_deref().or(style.font_family),
            attributes: theme.attributes,
            foreground: theme.foreground_color,
            background: theme.background_color,
            font_size: style.font_size,
            line_height: style.line_height,
        };
        let inner = self.render_inlines(children, &link_style);
        let text = inner.spans.iter().map(|span| span.text.as_str()).collect();

        out.images.extend(inner.images);
        out.links.extend(inner.links);
        out.links.push(Link { text, url });
        out.spans.extend(inner.spans);
    }
}

/// Make a link destination absolute.
///
/// Anything not starting with `http://` or `https://` is joined onto the
/// relative url host with exactly one `/` between them.
pub fn resolve_url(relative_url_host: Option<&str>, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    let host = relative_url_host.unwrap_or_default().trim_end_matches('/');
    format!("{host}/{}", url.trim_start_matches('/'))
}

/// Whether an image url points at an SVG document, judged by its path's extension.
pub fn is_vector_image(url: &str) -> bool {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or(url).to_string(),
    };
    Path::new(&path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}
