//! Image lookup for uploaded assets.
//!
//! The [`ImageStore`] maps `image_reference` tokens from the event table to
//! uploaded image bytes.  A reference that matches no stored file under any
//! supported extension resolves to the fixed placeholder image instead of
//! failing, so every record stays displayable.

use std::collections::BTreeMap;
use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Rgb};
use log::debug;
use once_cell::sync::Lazy;

use crate::model::RecordImage;

/// File extensions accepted for uploaded images, matched case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

const PLACEHOLDER_WIDTH: u32 = 320;
const PLACEHOLDER_HEIGHT: u32 = 200;
const PLACEHOLDER_BORDER: u32 = 4;

static PLACEHOLDER_PNG: Lazy<Vec<u8>> = Lazy::new(render_placeholder_png);

/// Returns the fixed placeholder image used for unresolvable references.
pub fn placeholder_png() -> &'static [u8] {
    &PLACEHOLDER_PNG
}

fn render_placeholder_png() -> Vec<u8> {
    let buffer = ImageBuffer::from_fn(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT, |x, y| {
        let on_border = x < PLACEHOLDER_BORDER
            || y < PLACEHOLDER_BORDER
            || x >= PLACEHOLDER_WIDTH - PLACEHOLDER_BORDER
            || y >= PLACEHOLDER_HEIGHT - PLACEHOLDER_BORDER;
        if on_border {
            Rgb([148, 163, 184])
        } else {
            Rgb([234, 236, 240])
        }
    });

    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(buffer)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .expect("in-memory PNG encoding of the placeholder cannot fail");
    bytes
}

/// Read-only store of uploaded images keyed by their original file name.
#[derive(Clone, Debug, Default)]
pub struct ImageStore {
    files: BTreeMap<String, Vec<u8>>,
}

impl ImageStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from `(file name, bytes)` pairs.
    pub fn from_files<I, N, B>(files: I) -> Self
    where
        I: IntoIterator<Item = (N, B)>,
        N: Into<String>,
        B: Into<Vec<u8>>,
    {
        let mut store = Self::new();
        for (name, bytes) in files {
            store.insert(name, bytes);
        }
        store
    }

    /// Adds an uploaded file to the store, replacing any previous entry.
    pub fn insert(&mut self, file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(file_name.into(), bytes.into());
    }

    /// Returns the number of stored files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns whether the store holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Resolves an `image_reference` token to image bytes.
    ///
    /// The token is matched case-insensitively against stored file names,
    /// either as the full name or as the stem with any supported extension.
    /// A miss is not an error: the record gets the placeholder marker.
    pub fn resolve(&self, reference: &str) -> RecordImage {
        let reference = reference.trim();
        if reference.is_empty() {
            return RecordImage::Placeholder;
        }

        for (name, bytes) in &self.files {
            if file_matches(name, reference) {
                return RecordImage::Resolved(bytes.clone());
            }
        }

        debug!("no uploaded image matches reference `{reference}`, using placeholder");
        RecordImage::Placeholder
    }
}

fn file_matches(file_name: &str, reference: &str) -> bool {
    let Some((stem, extension)) = file_name.rsplit_once('.') else {
        return false;
    };
    if !SUPPORTED_EXTENSIONS
        .iter()
        .any(|supported| extension.eq_ignore_ascii_case(supported))
    {
        return false;
    }
    file_name.eq_ignore_ascii_case(reference) || stem.eq_ignore_ascii_case(reference)
}
