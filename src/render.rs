//! HTML fragments for the repeated sections of the page.
//!
//! Events and gallery tiles are rendered with fixed string templates whose
//! indentation matches the surrounding template document, so the injected
//! output reads like hand-written markup.
//!
//! Plain-text fields go through [`escape_html`]; URLs are inserted as is.

use crate::content::{EventRecord, GalleryImage};

/// Escape `&`, `<` and `>` for inclusion in HTML text or attribute values.
///
/// `&` is replaced first so the entities produced for `<` and `>` are not
/// themselves re-escaped. Quotes are left alone.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render one event card.
pub fn render_event(event: &EventRecord) -> String {
    format!(
        r#"
        <article class="event-card">
          <div class="event-date">
            <span class="event-day">{day}</span>
            <span class="event-month">{month}</span>
          </div>
          <div class="event-info">
            <h3>{title}</h3>
            <p>{description}</p>
            <span class="event-time">{time}</span>
          </div>
        </article>"#,
        day = escape_html(&event.day),
        month = escape_html(&event.month),
        title = escape_html(&event.title),
        description = escape_html(&event.description),
        time = escape_html(&event.time),
    )
}

/// Render one gallery tile.
pub fn render_gallery_item(image: &GalleryImage) -> String {
    let class = if image.featured {
        "gallery-item gallery-item--large"
    } else {
        "gallery-item"
    };
    format!(
        r#"
        <div class="{class}">
          <img src="{src}" alt="{alt}" />
        </div>"#,
        src = image.image,
        alt = escape_html(&image.alt),
    )
}

/// Render all events, in the order given, newline separated.
pub fn render_events(events: &[EventRecord]) -> String {
    events.iter().map(render_event).collect::<Vec<_>>().join("\n")
}

/// Render all gallery tiles, in the order given, newline separated.
pub fn render_gallery(images: &[GalleryImage]) -> String {
    images
        .iter()
        .map(render_gallery_item)
        .collect::<Vec<_>>()
        .join("\n")
}
