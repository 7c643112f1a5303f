//! The abstract view tree produced by rendering.
//!
//! These are plain values: a host toolkit maps each variant onto its own
//! widgets (a label, an image, a box, a framed panel, a stack). Nothing here
//! measures or paints.

use std::fmt::Write;

use serde::Serialize;

use crate::links::LinkTap;
use crate::theme::{Color, FontAttributes};

/// Outer spacing around a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Thickness {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Thickness {
    pub fn left(left: f32) -> Self {
        Self {
            left,
            ..Self::default()
        }
    }

    pub fn top(top: f32) -> Self {
        Self {
            top,
            ..Self::default()
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// One run of uniformly styled text. Unset fields inherit from the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextSpan {
    pub text: String,
    pub font_family: Option<String>,
    pub attributes: FontAttributes,
    pub foreground_color: Option<Color>,
    pub background_color: Option<Color>,
    pub font_size: Option<f32>,
    pub line_height: Option<f32>,
}

impl TextSpan {
    /// A span with no styling of its own.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextBlock {
    pub spans: Vec<TextSpan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_tap: Option<LinkTap>,
}

impl TextBlock {
    pub fn new(spans: Vec<TextSpan>) -> Self {
        Self {
            spans,
            on_tap: None,
        }
    }

    /// The visible text, spans concatenated in order.
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub source: String,
    /// Decode as SVG rather than a raster format
    pub vector: bool,
}

/// A solid rectangle: list bullets, quote bars and rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxView {
    /// `None` stretches along that axis
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub color: Color,
    pub margin: Thickness,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub corner_radius: f32,
    pub has_shadow: bool,
    pub padding: f32,
    pub background: Color,
    pub content: Box<View>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Container {
    pub orientation: Orientation,
    pub spacing: f32,
    pub margin: Thickness,
    pub background: Option<Color>,
    pub children: Vec<View>,
}

impl Container {
    pub fn vertical(spacing: f32) -> Self {
        Self {
            spacing,
            ..Self::default()
        }
    }

    pub fn horizontal() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum View {
    Text(TextBlock),
    Image(Image),
    Box(BoxView),
    Frame(Frame),
    Container(Container),
}

impl View {
    /// Direct children, in order.
    pub fn children(&self) -> &[View] {
        match self {
            View::Container(container) => &container.children,
            View::Frame(frame) => std::slice::from_ref(frame.content.as_ref()),
            View::Text(_) | View::Image(_) | View::Box(_) => &[],
        }
    }

    /// Append an indented, one-line-per-view description of this subtree.
    pub fn write_outline(&self, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        match self {
            View::Text(block) => {
                let _ = write!(out, "text {:?}", block.text());
                if let Some(tap) = &block.on_tap {
                    let _ = write!(out, " links={}", tap.links().len());
                }
            }
            View::Image(image) => {
                let kind = if image.vector { "svg" } else { "raster" };
                let _ = write!(out, "image {kind} {}", image.source);
            }
            View::Box(b) => {
                out.push_str("box");
                if let Some(width) = b.width {
                    let _ = write!(out, " w={width}");
                }
                if let Some(height) = b.height {
                    let _ = write!(out, " h={height}");
                }
                let _ = write!(out, " {}", b.color);
            }
            View::Frame(frame) => {
                let _ = write!(out, "frame pad={} bg={}", frame.padding, frame.background);
            }
            View::Container(container) => {
                let dir = match container.orientation {
                    Orientation::Vertical => "vstack",
                    Orientation::Horizontal => "hstack",
                };
                out.push_str(dir);
                if !container.margin.is_zero() {
                    let _ = write!(out, " margin-left={}", container.margin.left);
                }
                if let Some(bg) = container.background {
                    let _ = write!(out, " bg={bg}");
                }
            }
        }
        out.push('\n');
        for child in self.children() {
            child.write_outline(depth + 1, out);
        }
    }

    /// Visit this view and every descendant, depth first in document order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a View)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_indents_children() {
        let tree = View::Container(Container {
            children: vec![
                View::Text(TextBlock::new(vec![TextSpan::plain("hi")])),
                View::Frame(Frame {
                    corner_radius: 3.0,
                    has_shadow: false,
                    padding: 10.0,
                    background: Color::rgb(1, 2, 3),
                    content: Box::new(View::Image(Image {
                        source: "a.svg".to_string(),
                        vector: true,
                    })),
                }),
            ],
            ..Container::vertical(10.0)
        });
        let mut out = String::new();
        tree.write_outline(0, &mut out);
        assert_eq!(
            out,
            "vstack\n  text \"hi\"\n  frame pad=10 bg=#010203\n    image svg a.svg\n"
        );
    }

    #[test]
    fn walk_visits_in_document_order() {
        let tree = View::Container(Container {
            children: vec![
                View::Text(TextBlock::new(vec![TextSpan::plain("a")])),
                View::Container(Container {
                    children: vec![View::Text(TextBlock::new(vec![TextSpan::plain("b")]))],
                    ..Container::horizontal()
                }),
            ],
            ..Container::default()
        });
        let mut texts = Vec::new();
        tree.walk(&mut |view| {
            if let View::Text(block) = view {
                texts.push(block.text());
            }
        });
        assert_eq!(texts, ["a", "b"]);
    }

    #[test]
    fn serializes_with_kind_tags() {
        let view = View::Box(BoxView {
            width: None,
            height: Some(2.0),
            color: Color::rgb(0, 0, 0),
            margin: Thickness::default(),
        });
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["kind"], "box");
        assert_eq!(json["height"], 2.0);
        assert_eq!(json["color"], "#000000");
    }
}
