//! Integration tests for the header navigation
//!
//! These tests verify that:
//! - Links render in document order, followed by search and the theme toggle
//! - The rendered toggle follows the shared preference
//! - References without a slug are dropped rather than rendered as dead links

use lumen_core::Gesture;
use lumen_theme::{
    HeaderNav, LinkBehavior, LinkTarget, NavLink, ThemeContext, ThemeToggle, ToggleConfig,
};

const HEADER: &str = r#"{
    "id": 1,
    "navItems": [
        {"id": "a", "link": {"type": "custom", "label": "Posts", "url": "/posts"}},
        {"id": "b", "link": {"type": "reference", "label": "About", "relationTo": "pages", "slug": "about"}},
        {"id": "c", "link": {"type": "custom", "label": "Source", "url": "https://example.com/repo", "behavior": "new-tab"}}
    ]
}"#;

#[test]
fn test_nav_renders_links_in_order_then_search_then_toggle() {
    let ctx = ThemeContext::in_memory(ToggleConfig::default());
    let toggle = ThemeToggle::mount(&ctx, Some("desktop"));
    let nav = HeaderNav::from_json(HEADER).unwrap();

    let html = nav.render(&toggle);

    let positions: Vec<usize> = [
        "href=\"/posts\"",
        "href=\"/about\"",
        "href=\"https://example.com/repo\"",
        "href=\"/search\"",
        "class=\"theme-toggle\"",
    ]
    .iter()
    .map(|needle| html.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{html}");

    assert_eq!(html.matches("target=\"_blank\"").count(), 1);
    assert!(html.contains("<span class=\"sr-only\">Search</span>"));
}

#[test]
fn test_nav_reflects_toggle_state() {
    let ctx = ThemeContext::in_memory(ToggleConfig::default());
    let toggle = ThemeToggle::mount(&ctx, Some("mobile"));
    let nav = HeaderNav::new(vec![NavLink {
        label: "Home & <News>".to_string(),
        target: LinkTarget::Url { url: "/".to_string() },
        behavior: LinkBehavior::SameTab,
    }]);

    toggle.handle_gesture(Gesture::Click);
    let html = nav.render(&toggle);

    assert!(html.contains("Home &amp; &lt;News&gt;"));
    assert!(html.contains("data-mode=\"dark\""));
    assert!(html.contains("theme-toggle-mask-mobile"));
}

#[test]
fn test_reference_without_slug_is_skipped() {
    let ctx = ThemeContext::in_memory(ToggleConfig::default());
    let toggle = ThemeToggle::mount(&ctx, None);
    let nav = HeaderNav::from_json(
        r#"{"navItems": [{"link": {"type": "reference", "label": "Draft", "relationTo": "posts"}}]}"#,
    )
    .unwrap();

    let html = nav.render(&toggle);
    assert!(!html.contains("Draft"));
    assert!(html.contains("href=\"/search\""));
}
