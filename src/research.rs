//! Keyword research
//!
//! Derives everything a run needs beyond the user's input: the industry, a
//! postal address, a set of long-tail keywords (one of which is picked at
//! random), and a page title for that keyword.

use crate::error::ApiError;
use crate::gateway::TextGateway;
use crate::prompts;
use crate::provider::CompletionOptions;
use crate::types::GenerationRequest;
use crate::usage::{Stage, UsageContext};
use rand::seq::SliceRandom;
use tracing::{debug, info};

pub struct Researcher {
    text: TextGateway,
}

impl Researcher {
    pub fn new(text: TextGateway) -> Self {
        Self { text }
    }

    pub async fn research(&self, company: &str, topic: &str) -> Result<GenerationRequest, ApiError> {
        let context = UsageContext {
            company: company.to_string(),
            keyword: topic.to_string(),
        };

        let industry = self
            .text
            .chat(
                Stage::IndustryIdentification,
                prompts::industry(topic),
                CompletionOptions::precise(),
                &context,
            )
            .await?;
        debug!(industry = %industry, "Industry identified");

        let location = self
            .text
            .chat(
                Stage::LocationIdentification,
                prompts::location(topic),
                CompletionOptions::precise(),
                &context,
            )
            .await?;
        debug!(location = %location, "Location identified");

        let raw_keywords = self
            .text
            .chat(
                Stage::KeywordClusters,
                prompts::long_tail_keywords(topic),
                CompletionOptions::precise(),
                &context,
            )
            .await?;
        let keywords = parse_keywords(&raw_keywords);
        let keyword = keywords
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| ApiError::ResearchFailed("no keywords in response".to_string()))?;
        info!(keyword = %keyword, candidates = keywords.len(), "Keyword selected");

        let title = self
            .text
            .chat(
                Stage::TitleGeneration,
                prompts::title(company, &keyword),
                CompletionOptions::creative(),
                &context,
            )
            .await?
            .replace('"', "");

        Ok(GenerationRequest {
            company: company.to_string(),
            topic: topic.to_string(),
            industry: industry.trim().to_string(),
            keyword,
            title: title.trim().to_string(),
            location: location.trim().to_string(),
        })
    }
}

/// One keyword per non-blank line, without quotes or list numbering.
pub fn parse_keywords(response: &str) -> Vec<String> {
    response
        .lines()
        .map(|line| strip_numbering(&line.replace('"', "")).trim().to_string())
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

/// Drop a leading `N.` and the whitespace after it.
fn strip_numbering(line: &str) -> &str {
    let trimmed = line.trim_start();
    let digits = trimmed.len() - trimmed.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return trimmed;
    }
    match trimmed[digits..].strip_prefix('.') {
        Some(rest) => rest.trim_start(),
        None => trimmed,
    }
}
