//! Pulls a function's synopsis and short description out of a page of
//! the PHP manual.
//!
//! The manual marks these up with stable class names, so extraction
//! anchors on the entry's `id` and those classes rather than on page
//! layout.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use super::{FunctionReference, ManualEntry};

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"<(?:[^>"']|"[^"]*"|'[^']*')*>"#).expect("tag regex"));
static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").expect("spaces regex"));

static WITH_ID: LazyLock<Selector> = LazyLock::new(|| Selector::parse("[id]").expect("id selector"));
static SYNOPSIS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".methodsynopsis.dc-description").expect("synopsis selector"));
static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".refnamediv p.refpurpose span.dc-title").expect("description selector"));

/// Strips tags, collapses whitespace runs to a single space, drops any
/// newline left over and trims.  Applying it twice changes nothing.
pub fn clean_string(value: &str) -> String {
    let stripped = TAG_RE.replace_all(value, "");
    let collapsed = SPACES_RE.replace_all(&stripped, " ");
    collapsed.replace('\n', "").trim().to_string()
}

/// Extracts the manual entry for `reference` from `html`.
///
/// Returns `None` when the page has no element with the reference as its
/// `id` (a search page, or another function's page), or when the entry
/// lacks a synopsis or a description.  Both are looked for inside the
/// element carrying the `id`, so a manual holding many entries answers
/// with the right one.  `name` is what the user asked for
/// and is carried into the entry untouched.
pub fn extract(html: &str, reference: &FunctionReference, name: &str) -> Option<ManualEntry> {
    let document = Html::parse_document(html);
    if !document.errors.is_empty() {
        trace!("Ignoring {} HTML parse errors for {}.", document.errors.len(), reference);
    }

    let entry = match document.select(&WITH_ID).find(|el| el.value().id() == Some(reference.as_str())) {
        Some(el) => el,
        None => {
            debug!("No element with id \"{}\".", reference);
            return None;
        },
    };

    let synopsis = match entry.select(&SYNOPSIS).next() {
        Some(el) => element_text(el),
        None => {
            debug!("No synopsis for {}.", reference);
            return None;
        },
    };

    let description = match entry.select(&DESCRIPTION).next() {
        Some(el) => element_text(el),
        None => {
            debug!("No description for {}.", reference);
            return None;
        },
    };

    Some(ManualEntry {
        name: name.to_string(),
        synopsis: synopsis,
        description: description,
    })
}

fn element_text(el: ElementRef) -> String {
    let text = clean_string(&unescape(&el.html()));
    text.replace("&lt;", "<").replace("&gt;", ">")
}

/// Undoes the entity escaping of serialized markup, except for `&lt;`
/// and `&gt;` which must survive tag stripping.
fn unescape(markup: &str) -> String {
    markup.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
