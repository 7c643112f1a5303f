use log::debug;
use serde::Serialize;

use crate::error::NavigateError;

/// Title of the prompt shown when a tapped block holds several links.
pub const CHOOSE_LINK_TITLE: &str = "Open link";
pub const CHOOSE_LINK_CANCEL: &str = "Cancel";

/// A link found while flattening a block's inlines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// The link's visible text
    pub text: String,
    /// Destination, already resolved against the relative url host
    pub url: String,
}

/// Opens a url on behalf of the host.
pub trait Navigator {
    fn navigate(&self, url: &str) -> Result<(), NavigateError>;
}

impl<F> Navigator for F
where
    F: Fn(&str) -> Result<(), NavigateError>,
{
    fn navigate(&self, url: &str) -> Result<(), NavigateError> {
        self(url)
    }
}

/// Asks the user to pick one of several options.
pub trait ChoicePrompt {
    /// Returns the index of the chosen option, or `None` when cancelled.
    fn choose(&self, title: &str, cancel: &str, options: &[&str]) -> Option<usize>;
}

impl<F> ChoicePrompt for F
where
    F: Fn(&str, &str, &[&str]) -> Option<usize>,
{
    fn choose(&self, title: &str, cancel: &str, options: &[&str]) -> Option<usize> {
        self(title, cancel, options)
    }
}

/// A prompt that always cancels; used until the host installs a real one.
#[derive(Debug, Clone, Copy, Default)]
pub struct CancelPrompt;

impl ChoicePrompt for CancelPrompt {
    fn choose(&self, _title: &str, _cancel: &str, _options: &[&str]) -> Option<usize> {
        None
    }
}

/// Hands urls to the platform's default opener without waiting for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNavigator;

impl Navigator for SystemNavigator {
    fn navigate(&self, url: &str) -> Result<(), NavigateError> {
        if url.trim().is_empty() {
            return Err(NavigateError::EmptyUrl);
        }
        open::that_detached(url).map_err(|source| NavigateError::Launch {
            url: url.to_string(),
            source,
        })
    }
}

/// What happened when a link tap was activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    Navigated(String),
    Cancelled,
    /// The navigator failed; the error has been logged and dropped
    Failed(String),
}

/// The tap handler attached to a heading or paragraph that contains links.
///
/// Owns its own copy of the block's links, so re-rendering never changes
/// what an earlier tap opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LinkTap {
    links: Vec<Link>,
}

impl LinkTap {
    /// Returns `None` for an empty list: blocks without links get no handler.
    pub fn new(links: Vec<Link>) -> Option<Self> {
        if links.is_empty() {
            None
        } else {
            Some(Self { links })
        }
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// One link opens directly. Several links go through `prompt` first.
    pub fn activate(&self, navigator: &dyn Navigator, prompt: &dyn ChoicePrompt) -> TapOutcome {
        let link = match self.links.as_slice() {
            [only] => only,
            links => {
                let options: Vec<&str> = links.iter().map(|link| link.text.as_str()).collect();
                let Some(link) = prompt
                    .choose(CHOOSE_LINK_TITLE, CHOOSE_LINK_CANCEL, &options)
                    .and_then(|index| links.get(index))
                else {
                    return TapOutcome::Cancelled;
                };
                link
            }
        };

        match navigator.navigate(&link.url) {
            Ok(()) => TapOutcome::Navigated(link.url.clone()),
            Err(e) => {
                debug!("navigation to {} failed: {}", link.url, e);
                TapOutcome::Failed(link.url.clone())
            }
        }
    }
}
