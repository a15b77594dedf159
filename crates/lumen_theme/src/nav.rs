//! Header navigation
//!
//! The content layer hands the header a list of `navItems`, each wrapping a
//! link record. Links render in order, followed by the search link and the
//! theme toggle.

use crate::scheme::ColorScheme;
use crate::toggle::ThemeToggle;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::{Deserialize, Serialize};

/// Where a link points
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LinkTarget {
    /// A free-form URL
    #[serde(rename = "custom")]
    Url { url: String },
    /// A document in another collection, addressed by slug
    #[serde(rename_all = "camelCase")]
    Reference {
        relation_to: String,
        slug: Option<String>,
    },
}

impl LinkTarget {
    /// Resolved href; `None` for a reference whose document has no slug
    pub fn href(&self) -> Option<String> {
        match self {
            LinkTarget::Url { url } => Some(url.clone()),
            LinkTarget::Reference { relation_to, slug } => {
                let slug = slug.as_deref()?;
                if relation_to == "pages" {
                    Some(format!("/{}", slug))
                } else {
                    Some(format!("/{}/{}", relation_to, slug))
                }
            }
        }
    }
}

/// How a link opens
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkBehavior {
    #[default]
    SameTab,
    NewTab,
}

/// One header link
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    #[serde(flatten)]
    pub target: LinkTarget,
    #[serde(default)]
    pub behavior: LinkBehavior,
}

impl NavLink {
    fn render_into(&self, out: &mut String) {
        let Some(href) = self.target.href() else {
            tracing::warn!("nav link {:?} has no resolvable target, skipped", self.label);
            return;
        };
        out.push_str(&format!(
            "<a class=\"nav-link\" href=\"{}\"",
            encode_double_quoted_attribute(&href)
        ));
        if self.behavior == LinkBehavior::NewTab {
            out.push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
        }
        out.push_str(&format!(">{}</a>", encode_text(&self.label)));
    }
}

#[derive(Deserialize)]
struct NavItem {
    link: NavLink,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeaderDocument {
    #[serde(default)]
    nav_items: Vec<NavItem>,
}

/// The header's navigation list
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderNav {
    pub items: Vec<NavLink>,
}

impl HeaderNav {
    pub fn new(items: Vec<NavLink>) -> Self {
        Self { items }
    }

    /// Parse a header document (`{ "navItems": [{ "link": { .. } }] }`)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let document: HeaderDocument = serde_json::from_str(json)?;
        Ok(Self {
            items: document.nav_items.into_iter().map(|item| item.link).collect(),
        })
    }

    /// Render the links in order, then search, then the toggle
    pub fn render(&self, toggle: &ThemeToggle) -> String {
        let mut out = String::from("<nav class=\"header-nav\">");
        for link in &self.items {
            link.render_into(&mut out);
        }
        out.push_str("<a href=\"/search\"><span class=\"sr-only\">Search</span></a>");
        out.push_str(&toggle.render());
        out.push_str("</nav>");
        out
    }
}

/// Per-page override of the header's `data-theme`
///
/// A page (e.g. one with a dark hero) sets an override; navigation clears it.
/// The header keeps showing the last override until a page sets a new one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeaderTheme {
    requested: Option<ColorScheme>,
    applied: Option<ColorScheme>,
}

impl HeaderTheme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, theme: Option<ColorScheme>) {
        self.requested = theme;
        if let Some(theme) = theme {
            self.applied = Some(theme);
        }
    }

    /// The override requested by the current page, if any
    pub fn requested(&self) -> Option<ColorScheme> {
        self.requested
    }

    /// Route changed: drop the current page's request
    pub fn navigate(&mut self, path: &str) {
        tracing::trace!("header theme reset on route change to {}", path);
        self.requested = None;
    }

    /// Value for the header's `data-theme` attribute, absent if never set
    pub fn attribute(&self) -> Option<&'static str> {
        self.applied.map(ColorScheme::as_str)
    }
}
