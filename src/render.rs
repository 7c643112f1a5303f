use log::{debug, trace};
use serde::Serialize;

use crate::block::{Block, Inline, ListItem};
use crate::inline::{InlineRenderer, InlineStyle};
use crate::links::LinkTap;
use crate::theme::{Color, Style, Theme};
use crate::view::{BoxView, Container, Frame, TextBlock, TextSpan, Thickness, View};

const CODE_CORNER_RADIUS: f32 = 3.0;
const BULLET_SIZE: f32 = 4.0;
const BULLET_TOP_MARGIN: f32 = 6.0;

/// Where blocks are currently rendered to, and the nesting they sit in.
///
/// Quotes and list items never modify the state they are given: they render
/// their children through a fresh state built by [`RenderState::nested`], so
/// the outer state is unchanged however the nested render ends.
#[derive(Debug)]
pub struct RenderState<'a> {
    container: &'a mut Vec<View>,
    quoted: bool,
    list_depth: u16,
}

impl<'a> RenderState<'a> {
    pub fn new(container: &'a mut Vec<View>) -> Self {
        Self {
            container,
            quoted: false,
            list_depth: 0,
        }
    }

    /// A state that renders into `container` with the same nesting flags.
    fn nested<'b>(&self, container: &'b mut Vec<View>) -> RenderState<'b> {
        RenderState {
            container,
            quoted: self.quoted,
            list_depth: self.list_depth,
        }
    }

    pub fn quoted(&self) -> bool {
        self.quoted
    }

    pub fn list_depth(&self) -> u16 {
        self.list_depth
    }

    pub fn views(&self) -> &[View] {
        self.container.as_slice()
    }
}

/// A rendered document: the root container plus the document-level styling
/// a host applies around it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMarkdown {
    pub content: Container,
    pub padding: f32,
    pub background: Color,
}

impl RenderedMarkdown {
    /// Every link tap in the document, in document order.
    pub fn link_taps(&self) -> Vec<&LinkTap> {
        let mut taps = Vec::new();
        for child in &self.content.children {
            child.walk(&mut |view| {
                if let View::Text(TextBlock {
                    on_tap: Some(tap), ..
                }) = view
                {
                    taps.push(tap);
                }
            });
        }
        taps
    }

    /// An indented text outline of the tree, one view per line.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for child in &self.content.children {
            child.write_outline(0, &mut out);
        }
        out
    }
}

/// Turns blocks into views for one theme and relative url host.
pub struct Renderer<'a> {
    theme: &'a Theme,
    inlines: InlineRenderer<'a>,
}

impl<'a> Renderer<'a> {
    pub fn new(theme: &'a Theme, relative_url_host: Option<&'a str>) -> Self {
        Self {
            theme,
            inlines: InlineRenderer::new(theme, relative_url_host),
        }
    }

    /// Render a whole document into a fresh tree.
    pub fn render(&self, blocks: &[Block]) -> RenderedMarkdown {
        let mut children = Vec::new();
        self.render_blocks(blocks, &mut RenderState::new(&mut children));
        RenderedMarkdown {
            content: Container {
                children,
                ..Container::vertical(self.theme.margin)
            },
            padding: self.theme.margin,
            background: self.theme.background_color,
        }
    }

    pub fn render_blocks(&self, blocks: &[Block], state: &mut RenderState<'_>) {
        for block in blocks {
            self.render_block(block, state);
        }
    }

    /// Append the views for one block to the state's container, followed by
    /// any images its inline content referenced.
    pub fn render_block(&self, block: &Block, state: &mut RenderState<'_>) {
        trace!("rendering {} block", block.kind());
        let images = match block {
            Block::Heading { level, content } => self.render_heading(*level, content, state),
            Block::Paragraph { content } => self.render_paragraph(content, state),
            Block::Quote { blocks } => {
                self.render_quote(blocks, state);
                Vec::new()
            }
            Block::Code { language, lines } => {
                if let Some(language) = language {
                    trace!("code block tagged {language}, rendered as plain text");
                }
                self.render_code(lines, state);
                Vec::new()
            }
            Block::List { ordered, items } => {
                self.render_list(*ordered, items, state);
                Vec::new()
            }
            Block::ThematicBreak => {
                self.render_thematic_break(state);
                Vec::new()
            }
            Block::Html(_) | Block::Unsupported(_) => {
                debug!("can't render {} blocks", block.kind());
                Vec::new()
            }
        };
        state.container.extend(images);
    }

    fn text_block(
        &self,
        content: &[Inline],
        style: &Style,
        state: &RenderState<'_>,
    ) -> (TextBlock, Vec<View>) {
        let foreground = if state.quoted {
            self.theme.quote.foreground_color
        } else {
            style.foreground_color
        };
        let flattened = self
            .inlines
            .render_inlines(content, &InlineStyle::new(style, foreground));
        let block = TextBlock {
            spans: flattened.spans,
            on_tap: LinkTap::new(flattened.links),
        };
        (block, flattened.images)
    }

    fn render_heading(
        &self,
        level: u8,
        content: &[Inline],
        state: &mut RenderState<'_>,
    ) -> Vec<View> {
        let style = self.theme.heading(level);
        let (label, images) = self.text_block(content, style, state);

        if style.border_size > 0.0 {
            let underline = View::Box(BoxView {
                width: None,
                height: Some(style.border_size),
                color: style.border_color,
                margin: Thickness::default(),
            });
            state.container.push(View::Container(Container {
                children: vec![View::Text(label), underline],
                ..Container::default()
            }));
        } else {
            state.container.push(View::Text(label));
        }
        images
    }

    fn render_paragraph(&self, content: &[Inline], state: &mut RenderState<'_>) -> Vec<View> {
        let (label, images) = self.text_block(content, &self.theme.paragraph, state);
        state.container.push(View::Text(label));
        images
    }

    fn render_thematic_break(&self, state: &mut RenderState<'_>) {
        let style = &self.theme.separator;
        if style.border_size > 0.0 {
            state.container.push(View::Box(BoxView {
                width: None,
                height: Some(style.border_size),
                color: style.border_color,
                margin: Thickness::default(),
            }));
        }
    }

    fn render_code(&self, lines: &[String], state: &mut RenderState<'_>) {
        let style = &self.theme.code;
        let label = TextBlock::new(vec![TextSpan {
            text: lines.join("\n"),
            font_family: style.font_family.clone(),
            attributes: style.attributes,
            foreground_color: Some(style.foreground_color),
            background_color: None,
            font_size: Some(style.font_size),
            line_height: Some(style.line_height),
        }]);
        state.container.push(View::Frame(Frame {
            corner_radius: CODE_CORNER_RADIUS,
            has_shadow: false,
            padding: self.theme.margin,
            background: style.background_color,
            content: Box::new(View::Text(label)),
        }));
    }

    fn render_list(&self, ordered: bool, items: &[ListItem], state: &mut RenderState<'_>) {
        let depth = state.list_depth + 1;
        for (i, item) in items.iter().enumerate() {
            self.render_list_item(ordered, i + 1, item, depth, state);
        }
    }

    fn render_list_item(
        &self,
        ordered: bool,
        index: usize,
        item: &ListItem,
        depth: u16,
        state: &mut RenderState<'_>,
    ) {
        let mut children = Vec::new();
        let mut inner = state.nested(&mut children);
        inner.list_depth = depth;
        self.render_blocks(&item.blocks, &mut inner);

        let paragraph = &self.theme.paragraph;
        let bullet = if ordered {
            View::Text(TextBlock::new(vec![TextSpan {
                text: format!("{index}."),
                foreground_color: Some(paragraph.foreground_color),
                font_size: Some(paragraph.font_size),
                line_height: Some(paragraph.line_height),
                ..TextSpan::default()
            }]))
        } else {
            View::Box(BoxView {
                width: Some(BULLET_SIZE),
                height: Some(BULLET_SIZE),
                color: paragraph.foreground_color,
                margin: Thickness::top(BULLET_TOP_MARGIN),
            })
        };

        let content = Container {
            children,
            ..Container::vertical(self.theme.margin)
        };
        state.container.push(View::Container(Container {
            margin: Thickness::left(f32::from(depth) * self.theme.margin),
            children: vec![bullet, View::Container(content)],
            ..Container::horizontal()
        }));
    }

    fn render_quote(&self, blocks: &[Block], state: &mut RenderState<'_>) {
        let mut children = Vec::new();
        let mut inner = state.nested(&mut children);
        inner.quoted = true;
        self.render_blocks(blocks, &mut inner);

        let style = &self.theme.quote;
        let content = Container {
            children,
            ..Container::vertical(self.theme.margin)
        };
        let quote = if style.border_size > 0.0 {
            let bar = View::Box(BoxView {
                width: Some(style.border_size),
                height: None,
                color: style.border_color,
                margin: Thickness::default(),
            });
            Container {
                background: Some(style.background_color),
                children: vec![bar, View::Container(content)],
                ..Container::horizontal()
            }
        } else {
            Container {
                background: Some(style.background_color),
                ..content
            }
        };
        state.container.push(View::Container(quote));
    }
}
