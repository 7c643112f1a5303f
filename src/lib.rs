mod block;
mod error;
mod inline;
mod links;
mod markdown_view;
mod parser;
mod render;
mod theme;
mod view;

pub use block::{Block, Inline, ListItem};
pub use error::{ColorError, NavigateError, ThemeError};
pub use inline::{is_vector_image, resolve_url};
pub use links::{
    CHOOSE_LINK_CANCEL, CHOOSE_LINK_TITLE, CancelPrompt, ChoicePrompt, Link, LinkTap, Navigator,
    SystemNavigator, TapOutcome,
};
pub use markdown_view::MarkdownView;
pub use render::{RenderState, RenderedMarkdown, Renderer};
pub use theme::{Color, FontAttributes, Role, Style, Theme};
pub use view::{BoxView, Container, Frame, Image, Orientation, TextBlock, TextSpan, Thickness, View};

/// Parse markdown text into a vector of blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    parser::parse(markdown)
}

/// Render markdown with the light theme and no relative url host.
pub fn markdown_to_view(markdown: &str) -> RenderedMarkdown {
    markdown_to_view_with_theme(markdown, &Theme::light(), None)
}

/// Render markdown with a theme, resolving relative urls against `relative_url_host`.
pub fn markdown_to_view_with_theme(
    markdown: &str,
    theme: &Theme,
    relative_url_host: Option<&str>,
) -> RenderedMarkdown {
    let blocks = parse(markdown);
    Renderer::new(theme, relative_url_host).render(&blocks)
}
