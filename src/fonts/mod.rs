//! Font loading for the styled PDF renderer.
//!
//! The styled renderer needs a serif TrueType family with regular, bold,
//! italic and bold-italic faces.  The files are looked up under
//! `assets/fonts` next to the crate manifest, or under the directory named by
//! the `NEWSLETTER_FONTS_DIR` environment variable.  When the family is
//! absent the PDF pipeline falls back to the simplified renderer, which uses
//! built-in PDF fonts and needs no files at all.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{self, FontData, FontFamily};

/// Name of the bundled serif font family (metrically Times-compatible).
pub const SERIF_FONT_FAMILY_NAME: &str = "Liberation Serif";

/// Environment variable overriding the font directory.
pub const FONTS_DIR_ENV: &str = "NEWSLETTER_FONTS_DIR";

const FONT_FILES: &[&str] = &[
    "LiberationSerif-Regular.ttf",
    "LiberationSerif-Bold.ttf",
    "LiberationSerif-Italic.ttf",
    "LiberationSerif-BoldItalic.ttf",
];

fn font_directory() -> PathBuf {
    match env::var_os(FONTS_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts"),
    }
}

fn missing_files(directory: &Path) -> Vec<PathBuf> {
    FONT_FILES
        .iter()
        .map(|name| directory.join(name))
        .filter(|candidate| !candidate.is_file())
        .collect()
}

/// Loads the serif family used by the styled PDF renderer.
pub fn serif_font_family() -> Result<FontFamily<FontData>, Error> {
    let directory = font_directory();
    let missing = missing_files(&directory);
    if !missing.is_empty() {
        let display_list = missing
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(Error::new(
            format!(
                "Missing serif font files: {}. Place the Liberation Serif faces under assets/fonts or set {}.",
                display_list, FONTS_DIR_ENV
            ),
            io::Error::new(io::ErrorKind::NotFound, "serif font files not found"),
        ));
    }

    fonts::from_files(&directory, SERIF_FONT_FAMILY_NAME, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                SERIF_FONT_FAMILY_NAME,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

/// Indicates whether all faces of the serif family are present on disk.
pub fn fonts_available() -> bool {
    missing_files(&font_directory()).is_empty()
}
