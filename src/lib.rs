//! Structured rich-text document rendering for a self-hosted blog and portfolio site.
//!
//! A document is a JSON tree of typed nodes with optional attributes, children
//! and inline marks. [`application::render`] turns it into presentational
//! markup; [`domain::articles`] models the listing payloads around it.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
