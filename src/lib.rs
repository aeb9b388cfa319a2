//! Dimora: a small self-hosted rental listings site.
//!
//! The listing record set is fixed and in-memory; the interesting parts are
//! how pages over it are generated (eagerly at startup, on demand, and with
//! timed revalidation) and the search-friendly output around them (metadata,
//! structured data, sitemap and robots directives).

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
