//! Help page navigator.
//!
//! Resolves page ids against an injected [`DocumentSource`], renders and
//! rewrites the result, and keeps a single page container plus a history
//! stack in sync. Every navigation is issued a [`NavTicket`]; a completed
//! fetch may only update the container while its ticket is the latest one,
//! so overlapping navigations cannot leave an older page on screen.

use std::collections::BTreeSet;

use crate::error::HelpError;
use crate::history::{History, HistoryEntry};
use crate::markdown::{Fragment, Link, MarkdownRenderer, Rewriter};
use crate::source::{DocumentSource, SourceFormat, lookup, page_id};

/// Handle for one navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavTicket {
    generation: u64,
    id: String,
}

impl NavTicket {
    /// Page id the request resolves.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Navigator state.
#[derive(Debug, Clone, Default)]
pub enum NavState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Fetch and render in flight.
    Loading { ticket: NavTicket },
    /// Page shown in the container.
    Displayed { id: String },
    /// Latest request failed; the container keeps its previous content.
    Failed { id: String, error: HelpError },
}

/// Result of completing a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Displayed,
    Failed,
    /// A newer request was issued; the result was dropped.
    Stale,
}

/// Link handlers registered for one displayed fragment.
///
/// A subscription stays valid until its fragment is replaced. Clicks routed
/// through an older subscription are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSubscription {
    generation: u64,
    internal: BTreeSet<String>,
    external: BTreeSet<String>,
}

impl LinkSubscription {
    fn new(generation: u64, links: &[Link]) -> Self {
        let mut internal = BTreeSet::new();
        let mut external = BTreeSet::new();
        for link in links {
            match link {
                Link::Internal(href) => internal.insert(href.clone()),
                Link::External(href) => external.insert(href.clone()),
            };
        }
        Self {
            generation,
            internal,
            external,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Internal link targets handled by this subscription.
    pub fn internal_links(&self) -> impl Iterator<Item = &str> {
        self.internal.iter().map(String::as_str)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.internal.len() + self.external.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a link click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Click {
    /// External link: default action proceeds in a new browsing context.
    External { href: String },
    /// Internal link: default prevented, entry pushed and page displayed.
    Navigated { entry: HistoryEntry },
    /// No handler for this link (stale subscription or unknown href).
    Ignored,
}

/// Page currently shown in the container.
#[derive(Debug, Clone)]
pub struct DisplayedPage {
    id: String,
    key: String,
    fragment: Fragment,
    links: Vec<Link>,
    subscription: LinkSubscription,
}

impl DisplayedPage {
    /// Page id that was requested.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Source key that matched (the id or its `help_` fallback).
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn subscription(&self) -> &LinkSubscription {
        &self.subscription
    }

    /// Container content as HTML.
    pub fn html(&self) -> String {
        self.fragment.to_html()
    }
}

/// Resolved and rewritten page, not yet displayed.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    key: String,
    fragment: Fragment,
    links: Vec<Link>,
}

impl RenderedPage {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }
}

/// Resolves, renders and displays help pages.
pub struct Navigator<S> {
    source: S,
    renderer: MarkdownRenderer<'static>,
    rewriter: Rewriter,
    history: History,
    generation: u64,
    state: NavState,
    page: Option<DisplayedPage>,
}

impl<S: DocumentSource> Navigator<S> {
    /// Creates navigator over `source`.
    ///
    /// Image paths are percent-decoded only for markdown sources.
    pub fn new(source: S, rewriter: Rewriter) -> Self {
        let decode = source.format() == SourceFormat::Markdown;
        Self {
            source,
            renderer: MarkdownRenderer::new(),
            rewriter: rewriter.with_decode_images(decode),
            history: History::new(),
            generation: 0,
            state: NavState::Idle,
            page: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    /// Page in the container, if any.
    pub fn page(&self) -> Option<&DisplayedPage> {
        self.page.as_ref()
    }

    /// Error of the latest request, when it failed.
    pub fn last_error(&self) -> Option<&HelpError> {
        match &self.state {
            NavState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Fetches `id` (or `help_<id>`) and parses it into a fragment.
    ///
    /// Markdown sources are rendered to HTML first.
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` when neither key exists.
    pub fn resolve(&self, id: &str) -> Result<(String, Fragment), HelpError> {
        let (key, text) = lookup(&self.source, id)?;
        let html = match self.source.format() {
            SourceFormat::Markdown => self.renderer.render(&text),
            SourceFormat::Html => text,
        };
        Ok((key, Fragment::parse(&html)))
    }

    /// Rewrites images and links of a resolved fragment.
    pub fn rewrite(&self, fragment: Fragment) -> (Fragment, Vec<Link>) {
        self.rewriter.rewrite(fragment)
    }

    /// Resolves and rewrites `id` without touching the container.
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` when neither key exists.
    pub fn render(&self, id: &str) -> Result<RenderedPage, HelpError> {
        let (key, fragment) = self.resolve(id)?;
        let (fragment, links) = self.rewrite(fragment);
        Ok(RenderedPage {
            key,
            fragment,
            links,
        })
    }

    /// Starts a navigation request, superseding any request in flight.
    pub fn begin(&mut self, id: &str) -> NavTicket {
        self.generation += 1;
        let ticket = NavTicket {
            generation: self.generation,
            id: page_id(id).to_string(),
        };
        log::info!("navigate {}", ticket.id);
        self.state = NavState::Loading {
            ticket: ticket.clone(),
        };
        ticket
    }

    /// Whether `ticket` belongs to the latest request.
    pub fn is_current(&self, ticket: &NavTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Applies the result of a request.
    ///
    /// Results of superseded requests are dropped. A successful result
    /// replaces the container content; a failure keeps it.
    pub fn complete(
        &mut self,
        ticket: &NavTicket,
        result: Result<RenderedPage, HelpError>,
    ) -> Completion {
        if !self.is_current(ticket) {
            log::debug!(
                "Dropping stale result for {} (request {}, latest {})",
                ticket.id,
                ticket.generation,
                self.generation
            );
            return Completion::Stale;
        }

        match result {
            Ok(rendered) => {
                let subscription = LinkSubscription::new(ticket.generation, &rendered.links);
                self.page = Some(DisplayedPage {
                    id: ticket.id.clone(),
                    key: rendered.key,
                    fragment: rendered.fragment,
                    links: rendered.links,
                    subscription,
                });
                self.state = NavState::Displayed {
                    id: ticket.id.clone(),
                };
                Completion::Displayed
            }
            Err(error) => {
                log::warn!("Cannot display {}: {}", ticket.id, error);
                self.state = NavState::Failed {
                    id: ticket.id.clone(),
                    error,
                };
                Completion::Failed
            }
        }
    }

    /// Resolves, rewrites and displays `id`.
    ///
    /// Always re-fetches; nothing is cached between calls.
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` when neither key exists. The container
    /// keeps its previous content and the error stays in [`NavState::Failed`].
    pub fn display(&mut self, id: &str) -> Result<&DisplayedPage, HelpError> {
        let ticket = self.begin(id);
        let result = self.render(&ticket.id);
        match self.complete(&ticket, result) {
            Completion::Displayed => self
                .page
                .as_ref()
                .ok_or_else(|| HelpError::DocumentNotFound { id: ticket.id }),
            _ => Err(self
                .last_error()
                .cloned()
                .unwrap_or(HelpError::DocumentNotFound { id: ticket.id })),
        }
    }

    /// Initial load: navigates using whatever history state exists.
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` when the page cannot be resolved.
    pub fn start(&mut self, state: Option<HistoryEntry>) -> Result<&DisplayedPage, HelpError> {
        let id = state.as_ref().map(|entry| entry.id().to_string());
        self.history = History::with_state(state);
        self.display(id.as_deref().unwrap_or_default())
    }

    /// Replays navigation for a history state without pushing.
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` when the page cannot be resolved.
    pub fn popstate(&mut self, state: Option<&HistoryEntry>) -> Result<&DisplayedPage, HelpError> {
        let id = state.map(|entry| entry.id().to_string()).unwrap_or_default();
        self.display(&id)
    }

    /// Moves back in history and replays the state found there.
    ///
    /// # Returns
    ///
    /// False when there is nothing to go back to
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` when the page cannot be resolved.
    pub fn back(&mut self) -> Result<bool, HelpError> {
        match self.history.back() {
            Some(pop) => self.popstate(pop.state.as_ref()).map(|_| true),
            None => Ok(false),
        }
    }

    /// Moves forward in history and replays the state found there.
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` when the page cannot be resolved.
    pub fn forward(&mut self) -> Result<bool, HelpError> {
        match self.history.forward() {
            Some(pop) => self.popstate(pop.state.as_ref()).map(|_| true),
            None => Ok(false),
        }
    }

    /// Clicks a link in the displayed page.
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` when an internal link target cannot be
    /// resolved. The history entry is pushed regardless.
    pub fn click(&mut self, href: &str) -> Result<Click, HelpError> {
        match self.page.as_ref().map(|page| page.subscription.clone()) {
            Some(subscription) => self.dispatch(&subscription, href),
            None => Ok(Click::Ignored),
        }
    }

    /// Routes a click through `subscription`.
    ///
    /// Subscriptions of replaced fragments no longer handle clicks.
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` when an internal link target cannot be
    /// resolved.
    pub fn dispatch(
        &mut self,
        subscription: &LinkSubscription,
        href: &str,
    ) -> Result<Click, HelpError> {
        let active = self
            .page
            .as_ref()
            .is_some_and(|page| page.subscription.generation == subscription.generation);
        if !active {
            log::debug!("Ignoring click on {} from a replaced page", href);
            return Ok(Click::Ignored);
        }

        if subscription.external.contains(href) {
            return Ok(Click::External {
                href: href.to_string(),
            });
        }

        if !subscription.internal.contains(href) {
            return Ok(Click::Ignored);
        }

        let entry = HistoryEntry::new(href);
        self.history.push(entry.clone());
        self.display(href)?;
        Ok(Click::Navigated { entry })
    }
}
