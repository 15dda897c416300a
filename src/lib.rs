//! # MALT. site builder
//!
//! Builds the static website for MALT. from a hand-written HTML template and
//! a handful of JSON content files. Editors change the JSON (usually through
//! the CMS under `admin/`); the builder injects it into the template and
//! writes a deployable `_site/` directory.
//!
//! # Pipeline
//!
//! ```text
//! 1. Load     _data/         →  SiteContent     (typed, validated records)
//! 2. Render   SiteContent    →  SlotValues      (escaped text + HTML fragments)
//! 3. Inject   index.html     →  html            (anchor-located slots)
//! 4. Write    html + assets  →  _site/
//! ```
//!
//! Every run recomputes everything from the source files. There is no cache
//! and no incremental state, and the output bytes depend only on the inputs.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | Content records (hero, about, contact, gallery, events) and loading |
//! | [`render`] | HTML escaping and the event / gallery fragments |
//! | [`inject`] | Slot table and anchor-based injection into the template |
//! | [`assets`] | Copying static files and directories into the output |
//! | [`site`] | Build orchestration and the `check` dry run |
//! | [`config`] | Optional `site.toml` describing the source layout |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## The template stays a real page
//!
//! `index.html` is designed and previewed as plain HTML with placeholder copy.
//! Rather than sprinkling placeholder syntax through it, each editable region
//! is found by the markup around it (see [`inject`]). Renaming a class in the
//! template can therefore orphan a slot; when that happens the build logs a
//! warning and lists the slot under "Skipped" instead of failing.
//!
//! ## Trusted headings
//!
//! Headings and the hero tagline are inserted verbatim so editors can use
//! `<em>` for the site's typographic accents. All other text is escaped. The
//! split is fixed per field in [`inject::SlotValues::from_content`].

pub mod assets;
pub mod config;
pub mod content;
pub mod inject;
pub mod output;
pub mod render;
pub mod site;

#[cfg(test)]
pub(crate) mod test_helpers;
