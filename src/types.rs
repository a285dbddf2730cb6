//! Run inputs shared across pipelines.

use crate::usage::UsageContext;
use serde::{Deserialize, Serialize};

/// Immutable input to one generation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub company: String,
    pub topic: String,
    pub industry: String,
    /// Long-tail keyword the page is written around
    pub keyword: String,
    pub title: String,
    /// One-line postal address
    pub location: String,
}

impl GenerationRequest {
    /// Ledger attribution: rows are keyed by company and the user's topic.
    pub fn usage_context(&self) -> UsageContext {
        UsageContext {
            company: self.company.clone(),
            keyword: self.topic.clone(),
        }
    }
}
