//! Content records and loading.
//!
//! Every piece of editable copy on the site lives in a JSON file under the
//! data directory (`_data/` by default):
//!
//! ```text
//! _data/
//! ├── hero.json        # HeroContent
//! ├── about.json       # AboutContent
//! ├── contact.json     # ContactInfo
//! ├── gallery.json     # Gallery { images: [GalleryImage] }
//! └── events/          # one EventRecord per *.json file
//!     ├── jazz-night.json
//!     └── quiz.json
//! ```
//!
//! Records are deserialized into explicit structs, so a file with a missing
//! or mistyped field fails at load time with [`DataError::Parse`] instead of
//! leaking an empty value into the page. Unknown keys are ignored: the CMS
//! that edits these files is free to store extra bookkeeping fields.
//!
//! ## Trusted markup vs plain text
//!
//! A few fields (hero tagline, about heading, contact heading) are *trusted
//! markup*: editors may put `<em>` and friends in them and they are inserted
//! verbatim. Everything else is plain text and gets escaped on the way into
//! the page. The field docs below say which is which; the escaping itself
//! happens in [`crate::inject::SlotValues`] and [`crate::render`].

use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const HERO_FILE: &str = "hero.json";
pub const ABOUT_FILE: &str = "about.json";
pub const CONTACT_FILE: &str = "contact.json";
pub const GALLERY_FILE: &str = "gallery.json";
pub const EVENTS_DIR: &str = "events";

#[derive(Error, Debug)]
pub enum DataError {
    #[error("missing content file: {}", path.display())]
    Missing { path: PathBuf },
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid content in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot list events directory {}: {source}", path.display())]
    EventsDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Hero banner copy.
#[derive(Debug, Clone, Deserialize)]
pub struct HeroContent {
    /// Trusted markup.
    pub tagline: String,
    /// Plain text.
    pub subtitle: String,
}

/// "About" section copy.
#[derive(Debug, Clone, Deserialize)]
pub struct AboutContent {
    /// Trusted markup.
    pub heading: String,
    /// Plain text.
    pub paragraph1: String,
    /// Plain text.
    pub paragraph2: String,
    /// Image URL or site-relative path, inserted into `src` as is.
    pub image: String,
}

/// "Find Us" section copy.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactInfo {
    /// Trusted markup.
    pub heading: String,
    pub address1: String,
    pub address2: String,
    pub hours1: String,
    pub hours2: String,
    pub email: String,
    /// Instagram profile URL. When absent or empty the template's
    /// placeholder link is left alone.
    #[serde(default)]
    pub instagram_url: Option<String>,
}

impl ContactInfo {
    /// The Instagram URL, if one is set and non-empty.
    pub fn instagram(&self) -> Option<&str> {
        self.instagram_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// A single listing in the "What's On" grid. All text fields are plain text.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub day: String,
    pub month: String,
    pub title: String,
    pub description: String,
    pub time: String,
    /// Display position; lower sorts first. `null` and absent both mean 0.
    #[serde(default)]
    pub order: Option<i64>,
}

impl EventRecord {
    pub fn sort_key(&self) -> i64 {
        self.order.unwrap_or(0)
    }
}

/// One tile of the gallery grid.
#[derive(Debug, Clone, Deserialize)]
pub struct GalleryImage {
    /// Image URL, inserted into `src` as is.
    pub image: String,
    /// Plain text.
    pub alt: String,
    /// Featured images get the large grid tile.
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Gallery {
    pub images: Vec<GalleryImage>,
}

/// A full snapshot of the site's content, loaded fresh for each build.
#[derive(Debug, Clone)]
pub struct SiteContent {
    pub hero: HeroContent,
    pub about: AboutContent,
    pub contact: ContactInfo,
    pub gallery: Gallery,
    /// Already in display order (see [`sort_events`]).
    pub events: Vec<EventRecord>,
}

impl SiteContent {
    /// Load every content source under `data_dir`.
    ///
    /// Any missing or malformed source aborts the load; there is no partial
    /// result.
    pub fn load(data_dir: &Path) -> Result<Self, DataError> {
        let hero = read_record(&data_dir.join(HERO_FILE))?;
        let about = read_record(&data_dir.join(ABOUT_FILE))?;
        let contact = read_record(&data_dir.join(CONTACT_FILE))?;
        let gallery = read_record(&data_dir.join(GALLERY_FILE))?;

        let mut events = load_events(&data_dir.join(EVENTS_DIR))?;
        sort_events(&mut events);

        Ok(Self {
            hero,
            about,
            contact,
            gallery,
            events,
        })
    }
}

/// Read and deserialize a single JSON record.
pub fn read_record<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => DataError::Missing {
            path: path.to_path_buf(),
        },
        _ => DataError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;
    serde_json::from_str(&text).map_err(|source| DataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load every `*.json` file in the events directory, in file-name order.
///
/// The result is NOT sorted by `order`; call [`sort_events`] for that.
pub fn load_events(dir: &Path) -> Result<Vec<EventRecord>, DataError> {
    let dir_error = |source| DataError::EventsDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(dir_error)? {
        let path = entry.map_err(dir_error)?.path();
        let is_json = path
            .file_name()
            .map(|name| name.to_string_lossy().ends_with(".json"))
            .unwrap_or(false);
        if is_json && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    files.iter().map(|path| read_record(path)).collect()
}

/// Order events for display: ascending `order`, ties keep their input order.
pub fn sort_events(events: &mut [EventRecord]) {
    // `sort_by_key` is stable, which the tie rule depends on.
    events.sort_by_key(EventRecord::sort_key);
}
