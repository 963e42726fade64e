// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Render targets with named slots.

use std::collections::HashMap;
use std::ops::Range;

/// Slot ids the dashboard fills.
pub mod slots {
    pub const COUNT: &str = "ytd-count";
    pub const DISTANCE: &str = "ytd-distance";
    pub const TIME: &str = "ytd-time";
    pub const PACE: &str = "ytd-pace";
    pub const ELEVATION: &str = "ytd-elevation";
    pub const LONGEST: &str = "ytd-longest";
    pub const UPDATED: &str = "strava-updated";
    /// Container for the recent-run list (and error/no-data messages)
    pub const CONTAINER: &str = "strava-container";
}

/// A page exposing named insertion points.
///
/// Writing to a slot the page does not have is a silent no-op, so the
/// dashboard can render into pages that only implement some of the slots.
pub trait RenderSink {
    /// Whether the page has a slot with this id.
    fn has_slot(&self, id: &str) -> bool;

    /// Replace the slot's content with `html`. Returns `false` if the slot
    /// does not exist.
    fn set_html(&mut self, id: &str, html: &str) -> bool;
}

/// An HTML document whose slots are elements identified by `id`.
#[derive(Debug, Clone)]
pub struct HtmlPage {
    html: String,
}

impl HtmlPage {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }
}

impl RenderSink for HtmlPage {
    fn has_slot(&self, id: &str) -> bool {
        inner_range(&self.html, id).is_some()
    }

    fn set_html(&mut self, id: &str, html: &str) -> bool {
        match inner_range(&self.html, id) {
            Some(range) => {
                self.html.replace_range(range, html);
                true
            }
            None => false,
        }
    }
}

/// Byte range of the content of the element with the given `id`.
///
/// Handles nested elements of the same tag name. Void and self-closing
/// elements have no content and are treated as missing.
fn inner_range(html: &str, id: &str) -> Option<Range<usize>> {
    let (tag_start, _) = find_id_attribute(html, id)?;

    let tag_name: String = html[tag_start + 1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    if tag_name.is_empty() {
        return None;
    }

    let open_end = tag_end(html, tag_start)?;
    if html[..open_end].ends_with("/>") {
        return None;
    }

    let open_pat = format!("<{}", tag_name);
    let close_pat = format!("</{}>", tag_name);
    let mut depth = 1usize;
    let mut cursor = open_end;

    loop {
        let close_at = cursor + html[cursor..].find(&close_pat)?;
        depth += count_opening_tags(&html[cursor..close_at], &open_pat);
        depth -= 1;
        if depth == 0 {
            return Some(open_end..close_at);
        }
        cursor = close_at + close_pat.len();
    }
}

/// Locate `id="..."` (or single-quoted) inside a tag.
///
/// Returns the offset of the tag's `<` and of the attribute.
fn find_id_attribute(html: &str, id: &str) -> Option<(usize, usize)> {
    let patterns = [format!("id=\"{}\"", id), format!("id='{}'", id)];

    patterns.iter().find_map(|pattern| {
        html.match_indices(pattern.as_str()).find_map(|(at, _)| {
            // Reject `data-id=` and friends.
            let preceded_by_space = html[..at]
                .chars()
                .next_back()
                .is_some_and(char::is_whitespace);
            if !preceded_by_space {
                return None;
            }

            let tag_start = html[..at].rfind('<')?;
            // The attribute must belong to the tag that is still open.
            if tag_end(html, tag_start)? <= at {
                return None;
            }
            Some((tag_start, at))
        })
    })
}

/// Offset just past the `>` closing the tag that starts at `tag_start`.
///
/// A `>` inside a quoted attribute value does not close the tag.
fn tag_end(html: &str, tag_start: usize) -> Option<usize> {
    let mut quote = None;
    for (i, c) in html[tag_start..].char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(tag_start + i + 1),
            _ => {}
        }
    }
    None
}

fn count_opening_tags(segment: &str, open_pat: &str) -> usize {
    segment
        .match_indices(open_pat)
        .filter(|(at, _)| {
            segment[at + open_pat.len()..]
                .chars()
                .next()
                .is_some_and(|c| c == '>' || c == '/' || c.is_whitespace())
        })
        .count()
}

/// In-memory sink keyed by slot id.
///
/// Only the slots created with [`SlotMap::with_slots`] exist.
#[derive(Debug, Clone, Default)]
pub struct SlotMap {
    slots: HashMap<String, String>,
}

impl SlotMap {
    pub fn with_slots<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            slots: ids
                .into_iter()
                .map(|id| (id.to_string(), String::new()))
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.slots.get(id).map(String::as_str)
    }
}

impl RenderSink for SlotMap {
    fn has_slot(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    fn set_html(&mut self, id: &str, html: &str) -> bool {
        match self.slots.get_mut(id) {
            Some(slot) => {
                *slot = html.to_string();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<main>
  <section class="stats">
    <span id="ytd-count">…</span>
    <div data-id="ytd-time">decoy</div>
    <span id='ytd-pace'></span>
    <img id="ytd-longest" src="x.png"/>
  </section>
  <div id="strava-container"><div class="run"><p>old</p></div></div>
  <footer id="footer">f</footer>
</main>"#;

    #[test]
    fn test_set_html_replaces_inner_content() {
        let mut page = HtmlPage::new(PAGE);

        assert!(page.set_html("ytd-count", "42"));
        assert!(page.as_str().contains(r#"<span id="ytd-count">42</span>"#));

        assert!(page.set_html("ytd-pace", "05:25 min/km"));
        assert!(page.as_str().contains("<span id='ytd-pace'>05:25 min/km</span>"));
    }

    #[test]
    fn test_nested_same_tag_content_is_replaced_whole() {
        let mut page = HtmlPage::new(PAGE);

        assert!(page.set_html("strava-container", "<p>new</p>"));
        assert!(page
            .as_str()
            .contains(r#"<div id="strava-container"><p>new</p></div>"#));
        assert!(!page.as_str().contains("old"));
        assert!(page.as_str().contains(r#"<footer id="footer">f</footer>"#));
    }

    #[test]
    fn test_missing_slots_are_skipped() {
        let mut page = HtmlPage::new(PAGE);

        assert!(!page.has_slot("ytd-elevation"));
        assert!(!page.set_html("ytd-elevation", "100 m"));
        // data-id does not count as an id
        assert!(!page.has_slot("ytd-time"));
        // self-closing elements have no content
        assert!(!page.has_slot("ytd-longest"));
        assert_eq!(page.as_str(), PAGE);
    }

    #[test]
    fn test_rendering_twice_is_idempotent() {
        let mut page = HtmlPage::new(PAGE);
        page.set_html("strava-container", "<div class=\"run\">a</div>");
        let once = page.as_str().to_string();

        page.set_html("strava-container", "<div class=\"run\">a</div>");
        assert_eq!(page.as_str(), once);
    }

    #[test]
    fn test_quoted_angle_bracket_does_not_close_tag() {
        let mut page = HtmlPage::new(
            r#"<div id="strava-container" title="a>b"><p>old</p></div><span title='x>y' id="ytd-count">0</span>"#,
        );

        assert!(page.set_html("strava-container", "<p>new</p>"));
        assert!(page.set_html("ytd-count", "7"));
        assert_eq!(
            page.as_str(),
            r#"<div id="strava-container" title="a>b"><p>new</p></div><span title='x>y' id="ytd-count">7</span>"#
        );
    }

    #[test]
    fn test_slot_map() {
        let mut sink = SlotMap::with_slots([slots::COUNT]);

        assert!(sink.set_html(slots::COUNT, "3"));
        assert!(!sink.set_html(slots::PACE, "x"));
        assert_eq!(sink.get(slots::COUNT), Some("3"));
        assert_eq!(sink.get(slots::PACE), None);
    }
}
