//! Asset scanner: walks the report tree and loads every servable file.
//!
//! Files directly at the report root are the shell (entry page, app script,
//! stylesheet) and are handled by the inliner; only files below the root
//! become assets for the mock server.

use crate::errors::{FuseError, FuseResult};
use crate::models::Asset;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Shell files that must exist at the report root before any work starts.
pub const REQUIRED_FILES: [&str; 3] = ["index.html", "app.js", "styles.css"];

/// Mime type used when a recognized extension has no table entry.
/// Unreachable with the current table; kept as the lookup default.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain;charset=UTF-8";

/// Extensions whose content is read as bytes and embedded base64-encoded.
const BASE64_EXTENSIONS: [&str; 6] = ["png", "jpeg", "jpg", "gif", "html", "htm"];

/// Fixed extension-to-mime table. `jpg` stays `image/jpg`, not `image/jpeg`.
const CONTENT_TYPES: [(&str, &str); 11] = [
    ("txt", "text/plain;charset=UTF-8"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("csv", "text/csv"),
    ("css", "text/css"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("png", "image/png"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpg"),
    ("gif", "image/gif"),
];

/// Look up the mime type for a recognized extension.
pub fn content_type_for(ext: &str) -> Option<&'static str> {
    CONTENT_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// Whether the extension belongs to the fixed servable set.
pub fn is_allowed_extension(ext: &str) -> bool {
    content_type_for(ext).is_some()
}

/// Whether the extension's content is embedded as a base64 data URI.
pub fn is_base64_extension(ext: &str) -> bool {
    BASE64_EXTENSIONS.contains(&ext)
}

/// The text after the final `.` of a file name. A dotless name is its own
/// extension, so it fails the allowed-extension check and gets skipped.
fn extension_of(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Everything the scan stage learned about the report tree.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub assets: Vec<Asset>,
    pub skipped: u64,
    pub bytes_read: u64,
}

pub struct AssetScanner {
    root: PathBuf,
    quiet: bool,
}

impl AssetScanner {
    pub fn new(root: &Path, quiet: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            quiet,
        }
    }

    /// Fail fast when one of the mandatory shell files is absent.
    pub fn verify_required_files(&self) -> FuseResult<()> {
        log::info!("Checking report folder contents at {:?}", self.root);
        for file in REQUIRED_FILES {
            let path = self.root.join(file);
            if !path.exists() {
                return Err(FuseError::missing(path));
            }
        }
        Ok(())
    }

    /// Walk the report tree and load every servable file below the root.
    pub fn collect_assets(&self) -> FuseResult<ScanOutcome> {
        log::debug!("Scanning {:?} for data files", self.root);

        let entries: Vec<_> = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Error accessing entry: {}", e);
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .collect();

        let progress = self.progress_bar(entries.len() as u64);
        let mut outcome = ScanOutcome::default();

        for entry in entries {
            progress.inc(1);
            let path = entry.path();

            let rel = match path.strip_prefix(&self.root) {
                Ok(rel) => rel,
                Err(_) => continue,
            };
            // Shell files live at the root and are never mock-served
            if rel.parent().map_or(true, |p| p.as_os_str().is_empty()) {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            let ext = extension_of(&name);
            if !is_allowed_extension(ext) {
                log::warn!(
                    "Unsupported extension '{}' (file: {}), skipping",
                    ext,
                    path.display()
                );
                outcome.skipped += 1;
                continue;
            }
            let mime = content_type_for(ext).unwrap_or(DEFAULT_CONTENT_TYPE);

            let url = rel.to_string_lossy().replace('\\', "/");
            log::trace!("Loading asset: {}", url);

            let asset = if is_base64_extension(ext) {
                let bytes = fs::read(path).map_err(|e| FuseError::io(e, path.to_path_buf()))?;
                outcome.bytes_read += bytes.len() as u64;
                Asset::binary(url, mime.to_string(), BASE64.encode(&bytes))
            } else {
                let text = fs::read_to_string(path)
                    .map_err(|e| FuseError::io(e, path.to_path_buf()))?;
                outcome.bytes_read += text.len() as u64;
                Asset::text(url, mime.to_string(), text)
            };
            outcome.assets.push(asset);
        }

        progress.finish_and_clear();
        log::info!("Found {} data files", outcome.assets.len());
        Ok(outcome)
    }

    fn progress_bar(&self, total: u64) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(total);
        if let Ok(bar_style) = ProgressStyle::with_template(
            "{prefix} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({percent}%)",
        ) {
            bar.set_style(bar_style.progress_chars("█▉▊▋▌▍▎▏  "));
        }
        bar.set_prefix(style("📦 SCAN").green().bold().to_string());
        bar
    }
}
