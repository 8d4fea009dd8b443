//! Masking configuration client for student roster data.
//!
//! Infers a semantic type for each field from sample records, derives a
//! default masking rule per type, lets callers edit rules within the set each
//! type permits, and drives a remote masking service to preview or apply the
//! configuration.

pub mod cli;
pub mod config;
pub mod error;
pub mod masking;
pub mod record;
pub mod service;
pub mod state;
pub mod storage;
pub mod view;
