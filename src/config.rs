//! Site layout configuration.
//!
//! Everything has a default, so a source tree laid out like this builds with
//! no configuration at all:
//!
//! ```text
//! ./
//! ├── site.toml        # optional, see below
//! ├── index.html       # page template
//! ├── style.css        # static files, copied to the output root
//! ├── script.js
//! ├── _data/           # content (see `content`)
//! ├── images/          # static directories, copied recursively
//! └── admin/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! data_dir = "_data"        # Content JSON files
//! template = "index.html"   # Page template
//! output_dir = "_site"      # Build output
//!
//! [assets]
//! files = ["style.css", "script.js"]
//! dirs = ["images", "admin"]
//! ```
//!
//! All paths are relative to the source root. Config files are sparse:
//! override just the keys you need. Unknown keys are rejected to catch typos
//! early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "site.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Source layout loaded from `site.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory holding the content JSON files.
    pub data_dir: String,
    /// The page template that content is injected into.
    pub template: String,
    /// Where the built site is written.
    pub output_dir: String,
    /// Static files and directories copied into the output.
    pub assets: AssetsConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            data_dir: "_data".to_string(),
            template: "index.html".to_string(),
            output_dir: "_site".to_string(),
            assets: AssetsConfig::default(),
        }
    }
}

/// Static assets shipped alongside the generated page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Individual files, copied to the same relative path in the output.
    pub files: Vec<String>,
    /// Directories, copied recursively.
    pub dirs: Vec<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            files: vec!["style.css".to_string(), "script.js".to_string()],
            dirs: vec!["images".to_string(), "admin".to_string()],
        }
    }
}

impl SiteConfig {
    /// Validate that every path stays inside the source root and that the
    /// output does not overwrite it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("data_dir", &self.data_dir),
            ("template", &self.template),
            ("output_dir", &self.output_dir),
        ] {
            check_relative(key, value)?;
        }
        if Path::new(&self.output_dir)
            .components()
            .all(|c| c == Component::CurDir)
        {
            return Err(ConfigError::Validation(
                "output_dir must not be the source root".into(),
            ));
        }
        for file in &self.assets.files {
            check_relative("assets.files", file)?;
        }
        for dir in &self.assets.dirs {
            check_relative("assets.dirs", dir)?;
        }

        // The output must not land inside a tree that the build reads from.
        let output = normalized(&self.output_dir);
        let sources = std::iter::once(("data_dir", &self.data_dir))
            .chain(self.assets.dirs.iter().map(|dir| ("assets.dirs", dir)));
        for (key, dir) in sources {
            if output.starts_with(normalized(dir)) {
                return Err(ConfigError::Validation(format!(
                    "output_dir {:?} must not be inside {key} entry {dir:?}",
                    self.output_dir
                )));
            }
        }
        Ok(())
    }
}

/// `value` with `.` components dropped, for component-wise prefix checks.
fn normalized(value: &str) -> PathBuf {
    Path::new(value)
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect()
}

fn check_relative(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{key} must not be empty")));
    }
    let path = Path::new(value);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(ConfigError::Validation(format!(
            "{key} must be a relative path inside the source root, got {value:?}"
        )));
    }
    Ok(())
}

/// Load `site.toml` from the source root.
///
/// A missing file yields the defaults. Present values override the defaults
/// key by key, unknown keys are rejected, and the result is validated.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    let config = match fs::read_to_string(&config_path) {
        Ok(content) => toml::from_str(&content)?,
        Err(e) if e.kind() == ErrorKind::NotFound => SiteConfig::default(),
        Err(e) => return Err(e.into()),
    };
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `site.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# MALT. site configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Paths are relative to the directory
# containing this file. Unknown keys will cause an error.

# Content JSON files: hero.json, about.json, contact.json, gallery.json and
# one file per event under events/.
data_dir = "_data"

# Page template. Content is injected into its hero, about, events, gallery
# and find-us sections.
template = "index.html"

# Build output. Created if missing; existing files are overwritten.
output_dir = "_site"

# ---------------------------------------------------------------------------
# Static assets
# ---------------------------------------------------------------------------
[assets]
# Files copied to the same path in the output. Missing files are skipped.
files = ["style.css", "script.js"]

# Directories copied recursively. Missing directories are skipped.
dirs = ["images", "admin"]
"##
}
