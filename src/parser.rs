use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::block::{Block, Inline, ListItem};

/// Parse markdown text into a tree of blocks.
///
/// Plain CommonMark plus YAML front matter, which is dropped.
pub fn parse(markdown: &str) -> Vec<Block> {
    let parser = Parser::new_ext(markdown, Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
    let mut blocks = Vec::new();
    let mut state = ParseState::default();

    for event in parser {
        process_event(event, &mut state, &mut blocks);
    }
    finish_text_block(&mut state, &mut blocks);

    blocks
}

#[derive(Default)]
struct ParseState {
    // Inline content of the heading/paragraph being built
    spans: Vec<Inline>,
    // Open emphasis/link frames, each with the spans collected before it opened
    span_stack: Vec<(InlineFrame, Vec<Inline>)>,
    // Heading or paragraph currently receiving inlines
    text_block: Option<TextBlockKind>,

    // Open quotes, lists and list items, innermost last
    containers: Vec<ContainerFrame>,

    // Code block state
    code: Option<CodeBuilder>,

    // Raw HTML block state
    html: Option<String>,

    // Nesting depth inside a construct that is dropped wholesale
    skip_depth: usize,
}

enum InlineFrame {
    Emphasis { double: bool },
    Link { url: String, image: bool },
}

#[derive(Clone, Copy)]
enum TextBlockKind {
    Heading(u8),
    Paragraph,
}

enum ContainerFrame {
    Quote(Vec<Block>),
    List { ordered: bool, items: Vec<ListItem> },
    Item(Vec<Block>),
}

struct CodeBuilder {
    language: Option<String>,
    content: String,
}

fn process_event(event: Event, state: &mut ParseState, blocks: &mut Vec<Block>) {
    if state.skip_depth > 0 {
        match event {
            Event::Start(_) => state.skip_depth += 1,
            Event::End(_) => state.skip_depth -= 1,
            _ => {}
        }
        return;
    }

    match event {
        // Headings and paragraphs
        Event::Start(Tag::Heading { level, .. }) => {
            finish_text_block(state, blocks);
            state.text_block = Some(TextBlockKind::Heading(heading_level_to_u8(level)));
        }
        Event::Start(Tag::Paragraph) => {
            finish_text_block(state, blocks);
            state.text_block = Some(TextBlockKind::Paragraph);
        }
        Event::End(TagEnd::Heading(_) | TagEnd::Paragraph) => {
            finish_text_block(state, blocks);
        }

        // Text content
        Event::Text(text) => {
            if let Some(code) = state.code.as_mut() {
                code.content.push_str(&text);
            } else {
                push_literal(state, &text);
            }
        }
        Event::Code(code) => push_inline(state, Inline::Code(code.into_string())),

        // Markdig-style: soft and hard breaks both end the visual line
        Event::SoftBreak | Event::HardBreak => push_inline(state, Inline::LineBreak),

        // Emphasis
        Event::Start(Tag::Emphasis) => open_inline(state, InlineFrame::Emphasis { double: false }),
        Event::Start(Tag::Strong) => open_inline(state, InlineFrame::Emphasis { double: true }),

        // Links and images
        Event::Start(Tag::Link { dest_url, .. }) => open_inline(
            state,
            InlineFrame::Link {
                url: dest_url.into_string(),
                image: false,
            },
        ),
        Event::Start(Tag::Image { dest_url, .. }) => open_inline(
            state,
            InlineFrame::Link {
                url: dest_url.into_string(),
                image: true,
            },
        ),
        Event::End(TagEnd::Emphasis | TagEnd::Strong | TagEnd::Link | TagEnd::Image) => {
            close_inline(state);
        }

        // Code blocks
        Event::Start(Tag::CodeBlock(kind)) => {
            finish_text_block(state, blocks);
            let language = match kind {
                CodeBlockKind::Fenced(lang) => {
                    let lang = lang.trim();
                    if lang.is_empty() {
                        None
                    } else {
                        Some(lang.to_string())
                    }
                }
                CodeBlockKind::Indented => None,
            };
            state.code = Some(CodeBuilder {
                language,
                content: String::new(),
            });
        }
        Event::End(TagEnd::CodeBlock) => {
            if let Some(code) = state.code.take() {
                let lines = code.content.lines().map(str::to_string).collect();
                push_block(
                    state,
                    blocks,
                    Block::Code {
                        language: code.language,
                        lines,
                    },
                );
            }
        }

        // Raw HTML
        Event::Start(Tag::HtmlBlock) => {
            finish_text_block(state, blocks);
            state.html = Some(String::new());
        }
        Event::Html(html) => match state.html.as_mut() {
            Some(raw) => raw.push_str(&html),
            None => push_inline(state, Inline::Unsupported("html".to_string())),
        },
        Event::End(TagEnd::HtmlBlock) => {
            if let Some(raw) = state.html.take() {
                push_block(state, blocks, Block::Html(raw));
            }
        }
        Event::InlineHtml(_) => push_inline(state, Inline::Unsupported("html".to_string())),

        // Quotes
        Event::Start(Tag::BlockQuote(_)) => {
            finish_text_block(state, blocks);
            state.containers.push(ContainerFrame::Quote(Vec::new()));
        }
        Event::End(TagEnd::BlockQuote(_)) => {
            finish_text_block(state, blocks);
            if let Some(ContainerFrame::Quote(inner)) = state.containers.pop() {
                push_block(state, blocks, Block::Quote { blocks: inner });
            }
        }

        // Lists
        Event::Start(Tag::List(first_item)) => {
            finish_text_block(state, blocks);
            state.containers.push(ContainerFrame::List {
                ordered: first_item.is_some(),
                items: Vec::new(),
            });
        }
        Event::End(TagEnd::List(_)) => {
            finish_text_block(state, blocks);
            if let Some(ContainerFrame::List { ordered, items }) = state.containers.pop() {
                push_block(state, blocks, Block::List { ordered, items });
            }
        }
        Event::Start(Tag::Item) => {
            finish_text_block(state, blocks);
            state.containers.push(ContainerFrame::Item(Vec::new()));
        }
        Event::End(TagEnd::Item) => {
            finish_text_block(state, blocks);
            if let Some(ContainerFrame::Item(inner)) = state.containers.pop()
                && let Some(ContainerFrame::List { items, .. }) = state.containers.last_mut()
            {
                items.push(ListItem { blocks: inner });
            }
        }

        // Front matter
        Event::Start(Tag::MetadataBlock(_)) => {
            finish_text_block(state, blocks);
            state.skip_depth = 1;
        }

        // Horizontal rule
        Event::Rule => {
            finish_text_block(state, blocks);
            push_block(state, blocks, Block::ThematicBreak);
        }

        // Inline constructs only reachable through parser extensions
        Event::FootnoteReference(_) => {
            push_inline(state, Inline::Unsupported("footnote reference".to_string()));
        }
        Event::InlineMath(_) => push_inline(state, Inline::Unsupported("math".to_string())),

        // Any other container: keep its place in the tree, drop its content
        Event::Start(tag) => {
            finish_text_block(state, blocks);
            push_block(state, blocks, Block::Unsupported(tag_kind(&tag).to_string()));
            state.skip_depth = 1;
        }
        Event::DisplayMath(_) => {
            finish_text_block(state, blocks);
            push_block(state, blocks, Block::Unsupported("math".to_string()));
        }

        // Ignore other events
        _ => {}
    }
}

fn push_block(state: &mut ParseState, blocks: &mut Vec<Block>, block: Block) {
    match state.containers.last_mut() {
        Some(ContainerFrame::Quote(inner) | ContainerFrame::Item(inner)) => inner.push(block),
        _ => blocks.push(block),
    }
}

fn push_inline(state: &mut ParseState, inline: Inline) {
    // Tight list items carry their text without a paragraph tag
    if state.text_block.is_none() {
        state.text_block = Some(TextBlockKind::Paragraph);
    }
    state.spans.push(inline);
}

fn push_literal(state: &mut ParseState, text: &str) {
    if let Some(Inline::Literal(last)) = state.spans.last_mut() {
        last.push_str(text);
    } else {
        push_inline(state, Inline::Literal(text.to_string()));
    }
}

fn open_inline(state: &mut ParseState, frame: InlineFrame) {
    if state.text_block.is_none() {
        state.text_block = Some(TextBlockKind::Paragraph);
    }
    state.span_stack.push((frame, std::mem::take(&mut state.spans)));
}

fn close_inline(state: &mut ParseState) {
    let children = std::mem::take(&mut state.spans);
    if let Some((frame, mut parent)) = state.span_stack.pop() {
        parent.push(match frame {
            InlineFrame::Emphasis { double } => Inline::Emphasis { double, children },
            InlineFrame::Link { url, image } => Inline::Link {
                url,
                image,
                children,
            },
        });
        state.spans = parent;
    }
}

fn finish_text_block(state: &mut ParseState, blocks: &mut Vec<Block>) {
    while !state.span_stack.is_empty() {
        close_inline(state);
    }
    let content = std::mem::take(&mut state.spans);
    match state.text_block.take() {
        Some(TextBlockKind::Heading(level)) => {
            push_block(state, blocks, Block::Heading { level, content });
        }
        Some(TextBlockKind::Paragraph) if !content.is_empty() => {
            push_block(state, blocks, Block::Paragraph { content });
        }
        _ => {}
    }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn tag_kind(tag: &Tag) -> &'static str {
    match tag {
        Tag::Table(_) | Tag::TableHead | Tag::TableRow | Tag::TableCell => "table",
        Tag::FootnoteDefinition(_) => "footnote definition",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(text: &str) -> Inline {
        Inline::Literal(text.to_string())
    }

    #[test]
    fn heading_and_paragraph() {
        assert_eq!(
            parse("## Title\n\nSome text."),
            vec![
                Block::Heading {
                    level: 2,
                    content: vec![lit("Title")],
                },
                Block::Paragraph {
                    content: vec![lit("Some text.")],
                },
            ]
        );
    }

    #[test]
    fn nested_emphasis_and_links() {
        let blocks = parse("a **b _c_** [d](/e)");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                content: vec![
                    lit("a "),
                    Inline::Emphasis {
                        double: true,
                        children: vec![
                            lit("b "),
                            Inline::Emphasis {
                                double: false,
                                children: vec![lit("c")],
                            },
                        ],
                    },
                    lit(" "),
                    Inline::Link {
                        url: "/e".to_string(),
                        image: false,
                        children: vec![lit("d")],
                    },
                ],
            }]
        );
    }

    #[test]
    fn images_are_links_flagged_as_image() {
        let blocks = parse("![logo](logo.svg)");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                content: vec![Inline::Link {
                    url: "logo.svg".to_string(),
                    image: true,
                    children: vec![lit("logo")],
                }],
            }]
        );
    }

    #[test]
    fn soft_and_hard_breaks_become_line_breaks() {
        let blocks = parse("one\ntwo  \nthree");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                content: vec![
                    lit("one"),
                    Inline::LineBreak,
                    lit("two"),
                    Inline::LineBreak,
                    lit("three"),
                ],
            }]
        );
    }

    #[test]
    fn code_block_lines() {
        let blocks = parse("```rust\nfoo\nbar\n```");
        assert_eq!(
            blocks,
            vec![Block::Code {
                language: Some("rust".to_string()),
                lines: vec!["foo".to_string(), "bar".to_string()],
            }]
        );
    }

    #[test]
    fn tight_list_items_get_paragraphs() {
        let blocks = parse("1. one\n2. two\n   - nested");
        let Block::List { ordered, items } = &blocks[0] else {
            panic!("expected list, got {blocks:?}");
        };
        assert!(*ordered);
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].blocks,
            vec![Block::Paragraph {
                content: vec![lit("one")],
            }]
        );
        assert!(matches!(
            items[1].blocks.as_slice(),
            [Block::Paragraph { .. }, Block::List { ordered: false, .. }]
        ));
    }

    #[test]
    fn quotes_nest() {
        let blocks = parse("> outer\n>\n> > inner");
        assert_eq!(
            blocks,
            vec![Block::Quote {
                blocks: vec![
                    Block::Paragraph {
                        content: vec![lit("outer")],
                    },
                    Block::Quote {
                        blocks: vec![Block::Paragraph {
                            content: vec![lit("inner")],
                        }],
                    },
                ],
            }]
        );
    }

    #[test]
    fn html_blocks_and_rules() {
        let blocks = parse("<div>\nhi\n</div>\n\n---\n");
        assert!(matches!(&blocks[0], Block::Html(raw) if raw.contains("<div>")));
        assert_eq!(blocks[1], Block::ThematicBreak);
    }

    #[test]
    fn inline_html_is_unsupported() {
        let blocks = parse("a <kbd>b</kbd>");
        let Block::Paragraph { content } = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(content.contains(&Inline::Unsupported("html".to_string())));
    }

    #[test]
    fn leading_rule_is_not_frontmatter() {
        assert_eq!(
            parse("---\n\nFirst paragraph.\n\n---\n\nSecond."),
            vec![
                Block::ThematicBreak,
                Block::Paragraph {
                    content: vec![lit("First paragraph.")],
                },
                Block::ThematicBreak,
                Block::Paragraph {
                    content: vec![lit("Second.")],
                },
            ]
        );
        assert_eq!(
            parse("---\n---\n"),
            vec![Block::ThematicBreak, Block::ThematicBreak]
        );
    }

    #[test]
    fn strips_frontmatter() {
        let blocks = parse("---\ntitle: x\n---\n\n# Body");
        assert_eq!(
            blocks,
            vec![Block::Heading {
                level: 1,
                content: vec![lit("Body")],
            }]
        );
    }
}
