//! Build orchestration.
//!
//! A build is a straight pipeline over a fixed snapshot of the source tree:
//!
//! ```text
//! 1. Load     _data/*.json, _data/events/*.json  →  SiteContent
//! 2. Render   SiteContent                        →  SlotValues
//! 3. Inject   index.html + SlotValues            →  html
//! 4. Write    html → _site/index.html, then copy static assets
//! ```
//!
//! Steps 1–3 touch nothing on disk, so any content or template error aborts
//! the build before the output directory is created or modified. The output
//! is a pure function of the inputs: no timestamps, no random IDs.

use crate::assets::{self, AssetError, CopiedAssets};
use crate::config::{self, ConfigError, SiteConfig};
use crate::content::{DataError, SiteContent};
use crate::inject::{self, SkippedSlot, SlotValues};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

pub const OUTPUT_DOCUMENT: &str = "index.html";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot read template {}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Assets(#[from] AssetError),
}

/// What the injection step produced, before anything is written.
#[derive(Debug, Clone)]
pub struct RenderSummary {
    pub events: usize,
    pub gallery_images: usize,
    pub skipped: Vec<SkippedSlot>,
}

#[derive(Debug, Clone)]
pub struct BuildReport {
    pub summary: RenderSummary,
    pub output_dir: PathBuf,
    /// Path of the written page.
    pub document: PathBuf,
    pub assets: CopiedAssets,
}

/// A source tree ready to build.
#[derive(Debug, Clone)]
pub struct Site {
    root: PathBuf,
    config: SiteConfig,
    output_dir: PathBuf,
}

impl Site {
    /// Load `site.toml` (if any) from `root`.
    ///
    /// `output_override` replaces the configured output directory; it is
    /// used as given rather than resolved against `root`. Either way the
    /// output must not be the source root or sit inside the data directory
    /// or a static directory.
    pub fn open(root: &Path, output_override: Option<&Path>) -> Result<Self, BuildError> {
        let config = config::load_config(root)?;
        let output_dir = match output_override {
            Some(dir) => dir.to_path_buf(),
            None => root.join(&config.output_dir),
        };
        check_output_dir(root, &config, &output_dir)?;
        Ok(Self {
            root: root.to_path_buf(),
            config,
            output_dir,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Run the full pipeline and write the site.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let (html, summary) = self.render()?;

        fs::create_dir_all(&self.output_dir).map_err(|source| BuildError::Filesystem {
            path: self.output_dir.clone(),
            source,
        })?;
        let document = self.output_dir.join(OUTPUT_DOCUMENT);
        fs::write(&document, html).map_err(|source| BuildError::Filesystem {
            path: document.clone(),
            source,
        })?;
        tracing::debug!("Wrote {}", document.display());

        let assets = assets::copy_static(
            &self.root,
            &self.output_dir,
            &self.config.assets.files,
            &self.config.assets.dirs,
        )?;

        Ok(BuildReport {
            summary,
            output_dir: self.output_dir.clone(),
            document,
            assets,
        })
    }

    /// Load and inject without writing anything.
    pub fn check(&self) -> Result<RenderSummary, BuildError> {
        self.render().map(|(_, summary)| summary)
    }

    fn render(&self) -> Result<(String, RenderSummary), BuildError> {
        let content = SiteContent::load(&self.root.join(&self.config.data_dir))?;
        tracing::debug!(
            "Loaded {} events and {} gallery images",
            content.events.len(),
            content.gallery.images.len()
        );

        let template_path = self.root.join(&self.config.template);
        let template =
            fs::read_to_string(&template_path).map_err(|source| BuildError::Template {
                path: template_path.clone(),
                source,
            })?;

        let values = SlotValues::from_content(&content);
        let injection = inject::inject(&template, &values);

        let summary = RenderSummary {
            events: content.events.len(),
            gallery_images: content.gallery.images.len(),
            skipped: injection.skipped,
        };
        Ok((injection.html, summary))
    }
}

/// Reject an output directory that would overwrite the inputs of the build.
fn check_output_dir(
    root: &Path,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<(), BuildError> {
    let output = resolve(output_dir)?;
    if output == resolve(root)? {
        return Err(ConfigError::Validation(format!(
            "output directory {} is the source root",
            output_dir.display()
        ))
        .into());
    }
    for dir in std::iter::once(&config.data_dir).chain(&config.assets.dirs) {
        let source = root.join(dir);
        if output.starts_with(resolve(&source)?) {
            return Err(ConfigError::Validation(format!(
                "output directory {} is inside {}",
                output_dir.display(),
                source.display()
            ))
            .into());
        }
    }
    Ok(())
}

/// Absolute, symlink-free form of `path`, which need not exist yet: the
/// nearest existing ancestor is canonicalized and the rest appended.
fn resolve(path: &Path) -> Result<PathBuf, BuildError> {
    let fs_error = |source: std::io::Error| BuildError::Filesystem {
        path: path.to_path_buf(),
        source,
    };
    let absolute = std::path::absolute(path).map_err(fs_error)?;
    let mut existing = absolute.as_path();
    let mut resolved = loop {
        match existing.canonicalize() {
            Ok(canonical) => break canonical,
            Err(e) if e.kind() == ErrorKind::NotFound => match existing.parent() {
                Some(parent) => existing = parent,
                None => return Err(fs_error(e)),
            },
            Err(e) => return Err(fs_error(e)),
        }
    };
    let rest = absolute.strip_prefix(existing).unwrap_or(Path::new(""));
    for part in rest.components() {
        match part {
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => resolved.push(name),
            _ => {}
        }
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inject::SkipReason;
    use crate::test_helpers::*;
    use serde_json::json;

    fn build_fixture(root: &Path) -> (BuildReport, String) {
        let report = Site::open(root, None).unwrap().build().unwrap();
        let html = read_output(&report);
        (report, html)
    }

    #[test]
    fn build_writes_document_and_assets() {
        let tmp = setup_fixtures();
        let (report, _) = build_fixture(tmp.path());

        let out = tmp.path().join("_site");
        assert_eq!(report.output_dir, out);
        assert!(out.join("index.html").is_file());
        assert!(out.join("style.css").is_file());
        assert!(out.join("script.js").is_file());
        assert!(out.join("images/gallery/bar.svg").is_file());
        assert!(out.join("admin/config.yml").is_file());
        assert_eq!(report.summary.events, 4);
        assert_eq!(report.summary.gallery_images, 3);
    }

    #[test]
    fn build_twice_is_byte_identical() {
        let tmp = setup_fixtures();
        let (_, first) = build_fixture(tmp.path());
        let (_, second) = build_fixture(tmp.path());
        assert_eq!(first, second);
    }

    #[test]
    fn every_fixture_anchor_matches() {
        let tmp = setup_fixtures();
        let (report, _) = build_fixture(tmp.path());
        assert!(
            report
                .summary
                .skipped
                .iter()
                .all(|s| s.reason != SkipReason::AnchorNotFound),
            "unexpected skips: {:?}",
            report.summary.skipped
        );
    }

    #[test]
    fn plain_text_fields_are_escaped_once() {
        let tmp = setup_fixtures();
        let (_, html) = build_fixture(tmp.path());

        assert!(html.contains("Craft beer &amp; small plates &lt;since 2019&gt;"));
        assert!(html.contains("<h3>Jazz &amp; Blues</h3>"));
        assert!(html.contains("<p>Mon &amp; Tue: closed<br />Wed–Sun: 4pm &gt; late</p>"));
        assert!(html.contains("twelve taps &amp; a kitchen"));
        assert!(html.contains(r#"alt="Twelve taps &amp; a chalkboard""#));
        assert!(!html.contains("&amp;amp;"));
        assert!(!html.contains("&amp;lt;"));
    }

    #[test]
    fn trusted_markup_passes_through() {
        let tmp = setup_fixtures();
        let (_, html) = build_fixture(tmp.path());

        assert!(html.contains(r#"<p class="hero-tagline fade-in">Pour <em>slowly</em>.</p>"#));
        assert!(html.contains(r#"<h2 class="section-heading">About <em>MALT.</em></h2>"#));
        assert!(html.contains(r#"<h2 class="section-heading">Find <em>us</em> here</h2>"#));
    }

    #[test]
    fn events_render_in_display_order() {
        let tmp = setup_fixtures();
        let (_, html) = build_fixture(tmp.path());

        let open_mic = position_of(&html, "<h3>Open Mic</h3>");
        let quiz = position_of(&html, "<h3>Quiz Night</h3>");
        let vinyl = position_of(&html, "<h3>Vinyl Sunday</h3>");
        let jazz = position_of(&html, "<h3>Jazz &amp; Blues</h3>");
        assert!(open_mic < quiz && quiz < vinyl && vinyl < jazz);
        // Template placeholders are gone.
        assert!(!html.contains("Placeholder event"));
    }

    #[test]
    fn event_ties_follow_file_order() {
        let tmp = setup_fixtures();
        let events = tmp.path().join("_data/events");
        for entry in std::fs::read_dir(&events).unwrap() {
            std::fs::remove_file(entry.unwrap().path()).unwrap();
        }
        write_event(&events, "a.json", "A", Some(3));
        write_event(&events, "b.json", "B", Some(1));
        write_event(&events, "c.json", "C", Some(1));
        write_event(&events, "d.json", "D", None);

        let (_, html) = build_fixture(tmp.path());
        let order: Vec<usize> = ["D", "B", "C", "A"]
            .iter()
            .map(|t| position_of(&html, &format!("<h3>{t}</h3>")))
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]), "{order:?}");
    }

    #[test]
    fn featured_gallery_image_gets_large_tile() {
        let tmp = setup_fixtures();
        let (_, html) = build_fixture(tmp.path());

        assert!(html.contains(
            "<div class=\"gallery-item gallery-item--large\">\n          <img src=\"images/gallery/bar.svg\""
        ));
        assert!(html.contains(
            "<div class=\"gallery-item\">\n          <img src=\"images/gallery/taps.svg\""
        ));
        assert_eq!(html.matches("gallery-item--large").count(), 1);
    }

    #[test]
    fn instagram_link_is_set_when_present() {
        let tmp = setup_fixtures();
        let (_, html) = build_fixture(tmp.path());
        assert!(html.contains(
            r#"<a href="https://instagram.com/malt.bar" aria-label="Instagram">"#
        ));
    }

    #[test]
    fn missing_instagram_keeps_placeholder_link() {
        let tmp = setup_fixtures();
        write_data(
            tmp.path(),
            "contact.json",
            json!({
                "heading": "Find us",
                "address1": "1 Quay St",
                "address2": "Harbourside",
                "hours1": "Daily",
                "hours2": "Late",
                "email": "hello@malt.bar"
            }),
        );

        let (report, html) = build_fixture(tmp.path());
        assert!(html.contains(r##"<a href="#" aria-label="Instagram">"##));
        assert!(report.summary.skipped.iter().any(|s| s.slot == "contact.instagram"
            && s.reason == SkipReason::FieldAbsent));
    }

    #[test]
    fn missing_anchor_is_reported_and_build_continues() {
        let tmp = setup_fixtures();
        let template_path = tmp.path().join("index.html");
        let template = std::fs::read_to_string(&template_path).unwrap();
        std::fs::write(
            &template_path,
            template.replace("<h4>Hours</h4>", "<h4>Opening times</h4>"),
        )
        .unwrap();

        let (report, html) = build_fixture(tmp.path());
        assert!(report.summary.skipped.contains(&SkippedSlot {
            slot: "contact.hours",
            reason: SkipReason::AnchorNotFound,
        }));
        // Other slots still applied.
        assert!(html.contains("hello@malt.bar"));
    }

    #[test]
    fn missing_content_aborts_before_writing() {
        let tmp = setup_fixtures();
        std::fs::remove_file(tmp.path().join("_data/hero.json")).unwrap();

        let err = Site::open(tmp.path(), None).unwrap().build().unwrap_err();
        assert!(matches!(err, BuildError::Data(DataError::Missing { .. })));
        assert!(!tmp.path().join("_site").exists());
    }

    #[test]
    fn missing_template_is_error() {
        let tmp = setup_fixtures();
        std::fs::remove_file(tmp.path().join("index.html")).unwrap();

        let err = Site::open(tmp.path(), None).unwrap().build().unwrap_err();
        assert!(matches!(err, BuildError::Template { .. }));
        assert!(!tmp.path().join("_site").exists());
    }

    #[test]
    fn check_writes_nothing() {
        let tmp = setup_fixtures();
        let summary = Site::open(tmp.path(), None).unwrap().check().unwrap();
        assert_eq!(summary.events, 4);
        assert!(!tmp.path().join("_site").exists());
    }

    #[test]
    fn output_override_is_used() {
        let tmp = setup_fixtures();
        let out = tmp.path().join("elsewhere");
        let report = Site::open(tmp.path(), Some(out.as_path())).unwrap().build().unwrap();
        assert_eq!(report.document, out.join("index.html"));
        assert!(!tmp.path().join("_site").exists());
    }

    fn assert_rejected_output(result: Result<Site, BuildError>) {
        assert!(
            matches!(result, Err(BuildError::Config(ConfigError::Validation(_)))),
            "{result:?}"
        );
    }

    #[test]
    fn output_override_at_source_root_is_rejected() {
        let tmp = setup_fixtures();
        let style = std::fs::read(tmp.path().join("style.css")).unwrap();

        assert_rejected_output(Site::open(tmp.path(), Some(tmp.path())));
        let dotted = tmp.path().join("images/..");
        assert_rejected_output(Site::open(tmp.path(), Some(dotted.as_path())));

        assert_eq!(std::fs::read(tmp.path().join("style.css")).unwrap(), style);
        assert!(!tmp.path().join("_site").exists());
    }

    #[test]
    fn output_override_inside_static_dir_is_rejected() {
        let tmp = setup_fixtures();
        let out = tmp.path().join("images/site");
        assert_rejected_output(Site::open(tmp.path(), Some(out.as_path())));
        assert!(!out.exists());
    }

    #[test]
    fn output_override_inside_data_dir_is_rejected() {
        let tmp = setup_fixtures();
        let out = tmp.path().join("_data/events/out");
        assert_rejected_output(Site::open(tmp.path(), Some(out.as_path())));
    }

    #[test]
    fn configured_output_inside_static_dir_is_rejected() {
        let tmp = setup_fixtures();
        std::fs::write(tmp.path().join("site.toml"), "output_dir = \"admin/site\"\n").unwrap();
        assert_rejected_output(Site::open(tmp.path(), None));
    }

    #[test]
    fn output_override_outside_source_dirs_is_allowed() {
        let tmp = setup_fixtures();
        let out = tmp.path().join("images-site");
        let site = Site::open(tmp.path(), Some(out.as_path())).unwrap();
        assert_eq!(site.output_dir(), out.as_path());
    }

    #[test]
    fn config_controls_layout() {
        let tmp = setup_fixtures();
        std::fs::rename(tmp.path().join("_data"), tmp.path().join("content")).unwrap();
        std::fs::write(
            tmp.path().join("site.toml"),
            "data_dir = \"content\"\noutput_dir = \"public\"\n\n[assets]\ndirs = []\n",
        )
        .unwrap();

        let report = Site::open(tmp.path(), None).unwrap().build().unwrap();
        assert_eq!(report.document, tmp.path().join("public/index.html"));
        assert!(report.assets.dirs.is_empty());
        assert!(!tmp.path().join("public/images").exists());
    }

    #[test]
    fn rebuild_overwrites_stale_output() {
        let tmp = setup_fixtures();
        let out = tmp.path().join("_site");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("style.css"), "/* stale */ ".repeat(100)).unwrap();

        build_fixture(tmp.path());
        assert_eq!(
            std::fs::read(out.join("style.css")).unwrap(),
            std::fs::read(tmp.path().join("style.css")).unwrap()
        );
    }
}
