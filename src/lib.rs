//! Tracekit: traceability corpus toolkit
//!
//! Loads heterogeneous requirement/source-code corpora, reconciles their
//! ground-truth link files, and assembles per-requirement context bundles
//! sized to a token budget for LLM consumption.

pub mod cli;
pub mod core;
pub mod corpus;
