//! Template injection.
//!
//! The page template (`index.html`) is a complete, viewable HTML document
//! with placeholder copy. It has no placeholder syntax: each editable
//! region is located by the markup that surrounds it. A [`Slot`] pairs a
//! name with an *anchor* regex that has two named groups, `open` and
//! `close`. Injection keeps both groups verbatim and swaps whatever sits
//! between them for the slot's value.
//!
//! Values are resolved by slot name from a [`SlotValues`] table, which is
//! where the escaping rules live:
//!
//! | Slot | Value | Escaping |
//! |------|-------|----------|
//! | `hero.tagline` | tagline | trusted markup |
//! | `hero.subtitle` | subtitle | escaped |
//! | `about.text` | heading + two paragraphs | heading trusted, paragraphs escaped |
//! | `about.image` | `src` of the about image | URL, as is |
//! | `events` | rendered event cards | see [`crate::render`] |
//! | `gallery` | rendered gallery tiles | see [`crate::render`] |
//! | `contact.heading` | heading | trusted markup |
//! | `contact.address` | `address1<br />address2` | escaped |
//! | `contact.hours` | `hours1<br />hours2` | escaped |
//! | `contact.email` | email | escaped |
//! | `contact.instagram` | `href` of the Instagram link | URL, only when set |
//!
//! ## Skips are not errors
//!
//! If a slot's anchor does not match the template, the slot is skipped and a
//! warning is logged; the rest of the page is still injected. A slot with no
//! value (only `contact.instagram` can be absent) is skipped quietly and the
//! template's `#` link stays. Both cases are returned in
//! [`Injection::skipped`] so callers can report them.
//!
//! Each anchor replaces only its first match, and values are inserted
//! literally (a `$` in content is not a group reference).

use crate::content::SiteContent;
use crate::render::{escape_html, render_events, render_gallery};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// A named, anchor-located region of the template.
#[derive(Debug)]
pub struct Slot {
    pub name: &'static str,
    pub anchor: Regex,
}

impl Slot {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            anchor: Regex::new(pattern).expect("Invalid slot anchor regex"),
        }
    }
}

static SLOTS: LazyLock<Vec<Slot>> = LazyLock::new(|| {
    vec![
        Slot::new(
            "hero.tagline",
            r#"(?s)(?P<open><p class="hero-tagline[^"]*">).*?(?P<close></p>)"#,
        ),
        Slot::new(
            "hero.subtitle",
            r#"(?s)(?P<open><p class="hero-sub[^"]*">).*?(?P<close></p>)"#,
        ),
        Slot::new(
            "about.text",
            r#"(?s)(?P<open><div class="about-text[^"]*">).*?(?P<close></div>\s*<div class="about-image">)"#,
        ),
        Slot::new(
            "about.image",
            r#"(?P<open><div class="about-image">\s*<img\s+src=")[^"]*(?P<close>")"#,
        ),
        Slot::new(
            "events",
            r#"(?s)(?P<open><div class="events-grid">).*?(?P<close>\s*</div>\s*</div>\s*</section>\s*<!-- Gallery -->)"#,
        ),
        Slot::new(
            "gallery",
            r#"(?s)(?P<open><div class="gallery-grid"[^>]*>).*?(?P<close>\s*</div>\s*</div>\s*</section>\s*<!-- Find Us -->)"#,
        ),
        Slot::new(
            "contact.heading",
            r#"(?s)(?P<open><div class="find-info">\s*<h2 class="section-heading[^"]*">).*?(?P<close></h2>)"#,
        ),
        Slot::new(
            "contact.address",
            r#"(?s)(?P<open><h4>Address</h4>\s*<p>).*?(?P<close></p>)"#,
        ),
        Slot::new(
            "contact.hours",
            r#"(?s)(?P<open><h4>Hours</h4>\s*<p>).*?(?P<close></p>)"#,
        ),
        Slot::new(
            "contact.email",
            r#"(?s)(?P<open><h4>Contact</h4>\s*<p>).*?(?P<close></p>)"#,
        ),
        Slot::new(
            "contact.instagram",
            r##"(?P<open><a href=")#(?P<close>" aria-label="Instagram">)"##,
        ),
    ]
});

/// The slot table, in injection order.
pub fn slots() -> &'static [Slot] {
    &SLOTS
}

/// Slot values keyed by slot name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotValues {
    values: BTreeMap<&'static str, String>,
}

impl SlotValues {
    /// Resolve every slot value from loaded content, applying the escaping
    /// rules from the module docs.
    pub fn from_content(content: &SiteContent) -> Self {
        let SiteContent {
            hero,
            about,
            contact,
            gallery,
            events,
        } = content;

        let mut values = Self::default();
        values.insert("hero.tagline", hero.tagline.clone());
        values.insert("hero.subtitle", escape_html(&hero.subtitle));
        values.insert(
            "about.text",
            format!(
                "\n          <h2 class=\"section-heading\">{}</h2>\n          <p>{}</p>\n          <p>{}</p>\n        ",
                about.heading,
                escape_html(&about.paragraph1),
                escape_html(&about.paragraph2),
            ),
        );
        values.insert("about.image", about.image.clone());
        values.insert("events", format!("\n{}\n      ", render_events(events)));
        values.insert(
            "gallery",
            format!("\n{}\n      ", render_gallery(&gallery.images)),
        );
        values.insert("contact.heading", contact.heading.clone());
        values.insert(
            "contact.address",
            format!(
                "{}<br />{}",
                escape_html(&contact.address1),
                escape_html(&contact.address2)
            ),
        );
        values.insert(
            "contact.hours",
            format!(
                "{}<br />{}",
                escape_html(&contact.hours1),
                escape_html(&contact.hours2)
            ),
        );
        values.insert("contact.email", escape_html(&contact.email));
        if let Some(url) = contact.instagram() {
            values.insert("contact.instagram", url.to_string());
        }
        values
    }

    pub fn insert(&mut self, slot: &'static str, value: String) {
        self.values.insert(slot, value);
    }

    pub fn get(&self, slot: &str) -> Option<&str> {
        self.values.get(slot).map(String::as_str)
    }
}

/// Why a slot was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The anchor pattern did not match the template.
    AnchorNotFound,
    /// No value was supplied for the slot.
    FieldAbsent,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AnchorNotFound => write!(f, "anchor not found in template"),
            SkipReason::FieldAbsent => write!(f, "no value set"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSlot {
    pub slot: &'static str,
    pub reason: SkipReason,
}

/// Result of injecting values into a template.
#[derive(Debug, Clone)]
pub struct Injection {
    pub html: String,
    pub skipped: Vec<SkippedSlot>,
}

/// Apply every slot in table order to `template`.
pub fn inject(template: &str, values: &SlotValues) -> Injection {
    let mut html = template.to_string();
    let mut skipped = Vec::new();

    for slot in slots() {
        let Some(value) = values.get(slot.name) else {
            tracing::debug!("Slot {} has no value, leaving template default", slot.name);
            skipped.push(SkippedSlot {
                slot: slot.name,
                reason: SkipReason::FieldAbsent,
            });
            continue;
        };

        if !slot.anchor.is_match(&html) {
            tracing::warn!("Slot {} skipped: anchor not found in template", slot.name);
            skipped.push(SkippedSlot {
                slot: slot.name,
                reason: SkipReason::AnchorNotFound,
            });
            continue;
        }

        html = slot
            .anchor
            .replacen(&html, 1, |caps: &Captures| {
                format!("{}{}{}", &caps["open"], value, &caps["close"])
            })
            .into_owned();
    }

    Injection { html, skipped }
}
