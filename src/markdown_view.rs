use log::debug;

use crate::links::{CancelPrompt, ChoicePrompt, LinkTap, Navigator, SystemNavigator, TapOutcome};
use crate::parser;
use crate::render::{RenderedMarkdown, Renderer};
use crate::theme::Theme;

/// A Markdown document bound to a theme and link handlers.
///
/// Changing the markdown, the relative url host or the theme re-renders the
/// whole document. Changing the navigator or prompt only affects later taps.
pub struct MarkdownView {
    markdown: String,
    relative_url_host: Option<String>,
    theme: Theme,
    navigator: Box<dyn Navigator>,
    prompt: Box<dyn ChoicePrompt>,
    rendered: RenderedMarkdown,
}

impl Default for MarkdownView {
    fn default() -> Self {
        Self::new("")
    }
}

impl MarkdownView {
    /// A view using the light theme, the system opener and a prompt that
    /// always cancels.
    pub fn new(markdown: impl Into<String>) -> Self {
        let markdown = markdown.into();
        let theme = Theme::light();
        let rendered = render(&markdown, &theme, None);
        Self {
            markdown,
            relative_url_host: None,
            theme,
            navigator: Box::new(SystemNavigator),
            prompt: Box::new(CancelPrompt),
            rendered,
        }
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn set_markdown(&mut self, markdown: impl Into<String>) {
        self.markdown = markdown.into();
        self.refresh();
    }

    pub fn relative_url_host(&self) -> Option<&str> {
        self.relative_url_host.as_deref()
    }

    pub fn set_relative_url_host(&mut self, host: Option<String>) {
        self.relative_url_host = host;
        self.refresh();
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.refresh();
    }

    pub fn set_navigator(&mut self, navigator: impl Navigator + 'static) {
        self.navigator = Box::new(navigator);
    }

    pub fn set_prompt(&mut self, prompt: impl ChoicePrompt + 'static) {
        self.prompt = Box::new(prompt);
    }

    /// The tree from the most recent render.
    pub fn rendered(&self) -> &RenderedMarkdown {
        &self.rendered
    }

    /// Activate a tap handler with this view's navigator and prompt.
    pub fn activate(&self, tap: &LinkTap) -> TapOutcome {
        tap.activate(self.navigator.as_ref(), self.prompt.as_ref())
    }

    fn refresh(&mut self) {
        self.rendered = render(
            &self.markdown,
            &self.theme,
            self.relative_url_host.as_deref(),
        );
    }
}

fn render(markdown: &str, theme: &Theme, relative_url_host: Option<&str>) -> RenderedMarkdown {
    let blocks = parser::parse(markdown);
    debug!("rendering {} top-level blocks", blocks.len());
    Renderer::new(theme, relative_url_host).render(&blocks)
}
