//! Fragment-based page routing.
//!
//! The site selects its top-level page from the URL fragment. The browser's
//! location object is hidden behind the [`Navigator`] trait so the router can
//! run (and be tested) without a browser. [`MemoryNavigator`] is the in-process
//! implementation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// Top-level pages addressable by URL fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    Features,
    Programs,
    Mentors,
    Pricing,
    About,
    Careers,
    Blog,
    Contact,
    Help,
    Terms,
    Privacy,
    Faq,
    Join,
}

/// Every page, in navigation order.
pub const ALL_PAGES: [Page; 14] = [
    Page::Home,
    Page::Features,
    Page::Programs,
    Page::Mentors,
    Page::Pricing,
    Page::About,
    Page::Careers,
    Page::Blog,
    Page::Contact,
    Page::Help,
    Page::Terms,
    Page::Privacy,
    Page::Faq,
    Page::Join,
];

impl Page {
    /// Resolve a raw fragment (with or without its leading `#`).
    ///
    /// Empty and unrecognised fragments fall back to [`Page::Home`].
    pub fn from_fragment(raw: &str) -> Self {
        let name = raw.strip_prefix('#').unwrap_or(raw);
        match name {
            "features" => Self::Features,
            "programs" => Self::Programs,
            "mentors" => Self::Mentors,
            "pricing" => Self::Pricing,
            "about" => Self::About,
            "careers" => Self::Careers,
            "blog" => Self::Blog,
            "contact" => Self::Contact,
            "help" => Self::Help,
            "terms" => Self::Terms,
            "privacy" => Self::Privacy,
            "faq" => Self::Faq,
            "join" => Self::Join,
            _ => Self::Home,
        }
    }

    /// Fragment identifier without the leading `#`.
    pub fn fragment(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Features => "features",
            Self::Programs => "programs",
            Self::Mentors => "mentors",
            Self::Pricing => "pricing",
            Self::About => "about",
            Self::Careers => "careers",
            Self::Blog => "blog",
            Self::Contact => "contact",
            Self::Help => "help",
            Self::Terms => "terms",
            Self::Privacy => "privacy",
            Self::Faq => "faq",
            Self::Join => "join",
        }
    }

    /// Human-readable title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Features => "Features",
            Self::Programs => "Programs",
            Self::Mentors => "Mentors",
            Self::Pricing => "Pricing",
            Self::About => "About",
            Self::Careers => "Careers",
            Self::Blog => "Blog",
            Self::Contact => "Contact",
            Self::Help => "Help Center",
            Self::Terms => "Terms of Service",
            Self::Privacy => "Privacy Policy",
            Self::Faq => "FAQ",
            Self::Join => "Join",
        }
    }

    /// The site footer is hidden on the onboarding flow.
    pub fn shows_footer(self) -> bool {
        self != Self::Join
    }
}

// ---------------------------------------------------------------------------
// Navigation requests
// ---------------------------------------------------------------------------

/// A navigation a wizard asks its host to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "page", rename_all = "snake_case")]
pub enum NavigationRequest {
    /// Switch pages by rewriting the fragment.
    Fragment(Page),
    /// Full top-level navigation to the site root.
    Root,
}

impl NavigationRequest {
    /// The href a browser would follow for this request.
    pub fn href(self) -> String {
        match self {
            Self::Fragment(page) => format!("#{}", page.fragment()),
            Self::Root => "/".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Navigator
// ---------------------------------------------------------------------------

/// The environment's location and viewport primitives.
pub trait Navigator: Send + Sync {
    /// Current fragment, as stored (may still carry a leading `#`).
    fn fragment(&self) -> String;

    /// Receiver notified every time the fragment changes.
    fn subscribe(&self) -> watch::Receiver<String>;

    /// Rewrite the fragment. Subscribers are notified only on an actual change.
    fn set_fragment(&self, fragment: &str);

    /// Leave the single-page app and load the site root.
    fn navigate_root(&self);

    /// Reset the viewport scroll position.
    fn scroll_to_top(&self);

    /// Carry out a request produced by a wizard.
    fn apply(&self, request: NavigationRequest) {
        match request {
            NavigationRequest::Fragment(page) => self.set_fragment(page.fragment()),
            NavigationRequest::Root => self.navigate_root(),
        }
    }
}

/// In-process [`Navigator`] backed by a watch channel.
pub struct MemoryNavigator {
    fragment: watch::Sender<String>,
    scroll_resets: AtomicUsize,
    root_navigations: AtomicUsize,
}

impl MemoryNavigator {
    pub fn new(initial: &str) -> Self {
        let (fragment, _) = watch::channel(initial.to_string());
        Self {
            fragment,
            scroll_resets: AtomicUsize::new(0),
            root_navigations: AtomicUsize::new(0),
        }
    }

    /// How many times the viewport was scrolled back to the top.
    pub fn scroll_resets(&self) -> usize {
        self.scroll_resets.load(Ordering::Relaxed)
    }

    /// How many full navigations to the root were requested.
    pub fn root_navigations(&self) -> usize {
        self.root_navigations.load(Ordering::Relaxed)
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("")
    }
}

impl Navigator for MemoryNavigator {
    fn fragment(&self) -> String {
        self.fragment.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<String> {
        self.fragment.subscribe()
    }

    fn set_fragment(&self, fragment: &str) {
        let next = fragment.strip_prefix('#').unwrap_or(fragment);
        self.fragment.send_if_modified(|current| {
            if current == next {
                false
            } else {
                *current = next.to_string();
                true
            }
        });
    }

    fn navigate_root(&self) {
        self.root_navigations.fetch_add(1, Ordering::Relaxed);
        self.fragment.send_if_modified(|current| {
            if current.is_empty() {
                false
            } else {
                current.clear();
                true
            }
        });
    }

    fn scroll_to_top(&self) {
        self.scroll_resets.fetch_add(1, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Tracks which page is displayed, following fragment changes.
pub struct HashRouter<N: Navigator + ?Sized> {
    navigator: Arc<N>,
    changes: watch::Receiver<String>,
    page: Page,
}

impl<N: Navigator + ?Sized> HashRouter<N> {
    /// Subscribe to the navigator and resolve the initial page.
    pub fn mount(navigator: Arc<N>) -> Self {
        let changes = navigator.subscribe();
        let mut router = Self {
            navigator,
            changes,
            page: Page::Home,
        };
        router.handle_hash_change();
        router
    }

    /// Page currently displayed.
    pub fn page(&self) -> Page {
        self.page
    }

    /// Re-read the fragment, switch pages, and scroll to the top.
    pub fn handle_hash_change(&mut self) -> Page {
        self.page = Page::from_fragment(&self.navigator.fragment());
        self.navigator.scroll_to_top();
        tracing::debug!(page = self.page.fragment(), "Route resolved");
        self.page
    }

    /// Wait for the next fragment change and return the page it selects.
    ///
    /// Returns `None` once the navigator has been dropped.
    pub async fn changed(&mut self) -> Option<Page> {
        self.changes.changed().await.ok()?;
        self.changes.borrow_and_update();
        Some(self.handle_hash_change())
    }

    /// Ask the navigator to show `page`.
    pub fn go_to(&self, page: Page) {
        self.navigator.set_fragment(page.fragment());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
