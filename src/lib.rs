//! Core entry point for the newsletter-press crate.
//!
//! The crate turns validated tabular event rows plus an in-memory image store
//! into two synchronized newsletter artifacts: an editable DOCX document and a
//! print-ready PDF.  Both renderers consume the same [`model::DocumentModel`],
//! assembled once per generation run.

pub mod assets;
pub mod docx;
pub mod fonts;
pub mod model;
pub mod pdf;
pub mod pipeline;
pub mod schema;
pub mod sections;
