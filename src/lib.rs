//! Newsletter triage: turn noisy HTML emails into clean text, pick out the
//! links worth reading, and let a language model decide which emails matter
//! to the reader.

pub mod boilerplate;
pub mod config;
pub mod extractor;
pub mod links;
pub mod mailbox;
pub mod oracle;
pub mod parsing;
pub mod patterns;
pub mod preferences;
pub mod relevance;
pub mod sampler;
