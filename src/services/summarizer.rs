//! Webpage summarization for bookmark descriptions.
//!
//! Fetches a page, reduces its HTML to plain text with regular expressions,
//! and asks an OpenAI-compatible chat-completions endpoint for a short
//! summary. Purely optional: no bookmark operation waits on it.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{json, Value};

use crate::types::errors::SummaryError;
use crate::types::settings::SummarizerSettings;

const SYSTEM_PROMPT: &str =
    "You summarize web pages for a bookmark manager. Reply with two or three plain sentences.";

struct Patterns {
    blocks: Regex,
    comments: Regex,
    breaks: Regex,
    tags: Regex,
    spaces: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        blocks: Regex::new(r"(?is)<(script|style|noscript|template|svg|head)\b[^>]*>.*?</\s*(script|style|noscript|template|svg|head)\s*>")
            .expect("static regex"),
        comments: Regex::new(r"(?s)<!--.*?-->").expect("static regex"),
        breaks: Regex::new(r"(?i)<\s*(br|/p|/div|/li|/h[1-6]|/tr)\b[^>]*>").expect("static regex"),
        tags: Regex::new(r"<[^>]*>").expect("static regex"),
        spaces: Regex::new(r"\s+").expect("static regex"),
    })
}

/// Strips markup from `html` and collapses whitespace.
pub fn html_to_text(html: &str) -> String {
    let p = patterns();
    let text = p.blocks.replace_all(html, " ");
    let text = p.comments.replace_all(&text, " ");
    let text = p.breaks.replace_all(&text, " ");
    let text = p.tags.replace_all(&text, " ");
    let text = decode_entities(&text);
    p.spaces.replace_all(&text, " ").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Cuts `text` to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Chat-completions request body for summarizing `page_text` taken from `url`.
pub fn build_request_body(settings: &SummarizerSettings, url: &str, page_text: &str) -> Value {
    let content = truncate_chars(page_text, settings.max_input_chars);
    json!({
        "model": settings.model,
        "messages": [
            {"role": "system", "content": SYSTEM_PROMPT},
            {"role": "user", "content": format!("Summarize this page ({}):\n\n{}", url, content)},
        ],
        "max_tokens": 200,
        "temperature": 0.3,
    })
}

/// Pulls the summary text out of a chat-completions response.
pub fn parse_response(body: &Value) -> Result<String, SummaryError> {
    if let Some(message) = body.pointer("/error/message").and_then(Value::as_str) {
        return Err(SummaryError::ProviderError(message.to_string()));
    }
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SummaryError::ProviderError("response has no summary text".to_string()))
}

/// Only absolute http(s) URLs can be fetched.
pub fn check_url(url: &str) -> Result<(), SummaryError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(SummaryError::InvalidUrl(url.to_string()))
    }
}

/// HTTP summarizer using `reqwest`.
#[cfg(feature = "network")]
pub struct HttpSummarizer {
    client: reqwest::Client,
    settings: SummarizerSettings,
    api_key: String,
}

#[cfg(feature = "network")]
impl HttpSummarizer {
    /// Builds a summarizer, reading the API key from `settings.api_key_env`.
    pub fn from_settings(settings: &SummarizerSettings) -> Result<Self, SummaryError> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| SummaryError::MissingApiKey(settings.api_key_env.clone()))?;
        Self::new(settings.clone(), api_key)
    }

    pub fn new(settings: SummarizerSettings, api_key: String) -> Result<Self, SummaryError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .user_agent(concat!("cozyhub/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SummaryError::NetworkError(e.to_string()))?;
        Ok(Self { client, settings, api_key })
    }

    /// Fetches `url` and returns a short natural-language summary of it.
    pub async fn summarize(&self, url: &str) -> Result<String, SummaryError> {
        check_url(url)?;

        let html = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SummaryError::NetworkError(e.to_string()))?
            .text()
            .await
            .map_err(|e| SummaryError::NetworkError(e.to_string()))?;

        let text = html_to_text(&html);
        if text.is_empty() {
            return Err(SummaryError::EmptyPage(url.to_string()));
        }
        tracing::debug!(url, chars = text.chars().count(), "page text extracted");

        let body: Value = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(&self.api_key)
            .json(&build_request_body(&self.settings, url, &text))
            .send()
            .await
            .map_err(|e| SummaryError::NetworkError(e.to_string()))?
            .json()
            .await
            .map_err(|e| SummaryError::ProviderError(e.to_string()))?;

        parse_response(&body)
    }
}
