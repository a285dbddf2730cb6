//! Pagesmith: Website Content Generation
//!
//! Turns a company name and a topic into a complete page: researched keywords,
//! generated copy, generated imagery, and a fixed ten-block layout document
//! written to `content/data.json` in the workspace.

pub mod artifact;
pub mod cli;
pub mod concurrency;
pub mod config;
pub mod content;
pub mod document;
pub mod error;
pub mod gateway;
pub mod generator;
pub mod image;
pub mod logging;
pub mod orchestrator;
pub mod prompts;
pub mod provider;
pub mod research;
pub mod retry;
pub mod template;
pub mod types;
pub mod usage;
