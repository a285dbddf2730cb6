//! Stub services implementing the public provider traits.

use async_trait::async_trait;
use pagesmith::config::{SiteConfig, Workspace};
use pagesmith::error::ServiceError;
use pagesmith::generator::SiteGenerator;
use pagesmith::provider::{
    ChatMessage, CompletionOptions, CompletionResponse, GeneratedImage, ImageFetcher,
    ImageProvider, TextProvider, TokenUsage,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const LOGO_CONCEPT: &str = "A sleek geometric coffee bean in deep brown and cream";
pub const TITLE: &str = "The Espresso Experts";

pub const BODY: &str = r#"Here is the content you asked for:
{
    "banner": {
        "h1": "Coffee worth waking up for",
        "h2": "Small batch roasts from Acme",
        "button": [{"name": "Shop Now", "layout": 1}, {"name": "Contact Us", "layout": 2}]
    },
    "about": {"h2": "About Us", "p": "We roast every week."},
    "blogs": {
        "h2": "Insights",
        "post": [
            {"h3": "Roasting", "p": "Low and slow."},
            {"h3": "Brewing", "p": "Grind fresh."},
            {"h3": "Storage", "p": "Keep it airtight."}
        ]
    },
    "faq": {
        "h2": "Frequently Asked Questions",
        "question": [
            {"id": 1, "h3": "Do you ship?", "p": "Nationwide."},
            {"id": 2, "h3": "Decaf?", "p": "Yes."}
        ]
    },
    "blog2": {"h2": "Our Mission", "p": "Better mornings."}
}
Let me know if you need changes."#;

/// Answer for the last message of a request, keyed on the prompt wording.
pub fn scripted_answer(prompt: &str) -> String {
    let answer = if prompt.contains("logo concept") {
        LOGO_CONCEPT
    } else if prompt.contains("description of an image") {
        "Steaming espresso cup, close-up, warm morning light."
    } else if prompt.contains("website content") {
        BODY
    } else if prompt.contains("meta description") {
        "Fresh small batch coffee from Acme."
    } else if prompt.contains("industry") {
        "Food and Beverage"
    } else if prompt.contains("address") {
        "5 Main St, 10001, Springfield, IL, USA"
    } else if prompt.contains("long-tail keywords") {
        "1. \"espresso beans online\""
    } else {
        "\"The Espresso Experts\""
    };
    answer.to_string()
}

type Script = dyn Fn(&str) -> Result<String, ServiceError> + Send + Sync;

/// Text service answering from a script; optionally stalls on prompts containing a marker.
pub struct ScriptedText {
    script: Box<Script>,
    stall_on: Option<(&'static str, Duration)>,
    calls: AtomicUsize,
}

impl ScriptedText {
    pub fn new(script: impl Fn(&str) -> Result<String, ServiceError> + Send + Sync + 'static) -> Self {
        Self {
            script: Box::new(script),
            stall_on: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn happy() -> Self {
        Self::new(|prompt| Ok(scripted_answer(prompt)))
    }

    pub fn stalling_on(mut self, marker: &'static str, delay: Duration) -> Self {
        self.stall_on = Some((marker, delay));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextProvider for ScriptedText {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<CompletionResponse, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let prompt = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        if let Some((marker, delay)) = self.stall_on {
            if prompt.contains(marker) {
                tokio::time::sleep(delay).await;
            }
        }
        let content = (self.script)(&prompt)?;
        Ok(CompletionResponse {
            content,
            model: options.model.unwrap_or_else(|| "stub".to_string()),
            usage: TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            },
        })
    }

    fn provider_name(&self) -> &str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

/// Image service answering with a numbered URL per call.
#[derive(Default)]
pub struct NumberedImages {
    calls: AtomicUsize,
}

impl NumberedImages {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageProvider for NumberedImages {
    async fn generate(&self, _prompt: &str, _size: &str) -> Result<GeneratedImage, ServiceError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(GeneratedImage::Url(format!("https://images.test/{}", n)))
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}

/// Fetcher that "downloads" a URL as its own text, except for the listed URLs.
#[derive(Default)]
pub struct EchoFetcher {
    missing: HashSet<String>,
}

impl EchoFetcher {
    pub fn missing(urls: &[&str]) -> Self {
        Self {
            missing: urls.iter().map(|u| u.to_string()).collect(),
        }
    }
}

#[async_trait]
impl ImageFetcher for EchoFetcher {
    async fn fetch_base64(&self, url: &str) -> Option<String> {
        if self.missing.contains(url) {
            None
        } else {
            Some(format!("b64:{}", url))
        }
    }
}

/// Configuration with fast, deterministic retries.
pub fn test_config() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.retry.initial_delay_ms = 1;
    config.retry.jitter = false;
    config.retry.text_max_retries = 3;
    config.retry.image_max_retries = 2;
    config
}

pub struct Harness {
    pub workspace: TempDir,
    pub text: Arc<ScriptedText>,
    pub images: Arc<NumberedImages>,
    pub generator: SiteGenerator,
}

pub fn harness(config: &SiteConfig, text: ScriptedText, fetcher: EchoFetcher) -> Harness {
    let workspace = TempDir::new().unwrap();
    let text = Arc::new(text);
    let images = Arc::new(NumberedImages::default());
    let generator = SiteGenerator::from_providers(
        config,
        Workspace::new(workspace.path()),
        text.clone(),
        images.clone(),
        Arc::new(fetcher),
    )
    .unwrap();
    Harness {
        workspace,
        text,
        images,
        generator,
    }
}
