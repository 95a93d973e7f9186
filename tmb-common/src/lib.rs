//! # TMB Common Library
//!
//! Shared code for the topic model browser:
//! - Document records and metadata table parsing
//! - Corpus model and read-only accessors
//! - Bibliography partitioning (major/minor sort)
//! - Citation formatting, labels and links
//! - View configuration and bootstrap configuration loading
//! - Artifact events and SSE helpers

pub mod bib;
pub mod cite;
pub mod config;
pub mod document;
pub mod error;
pub mod events;
pub mod model;
pub mod sse;
pub mod vis;

pub use bib::{partition, BibSort, MajorSort, MinorSort, Ordering};
pub use document::DocumentRecord;
pub use error::{Error, Result};
pub use model::{Artifact, Corpus, DocumentSource};
pub use vis::VisConfig;
