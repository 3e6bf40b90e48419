use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Client;
use serde::{Deserialize, Serialize};

use studio_core::model::LearnerProfile;

use crate::error::CoachError;

const SYSTEM_PROMPT: &str = "You provide practical learning guidance for investing education. \
                             Do not provide personalized financial advice.";

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct CoachConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl CoachConfig {
    /// Reads the coaching credential from the environment.
    ///
    /// A missing or blank `STUDIO_AI_API_KEY` disables coaching; everything
    /// else in the system keeps working without it.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("STUDIO_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("STUDIO_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("STUDIO_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

//
// ─── GUIDANCE ──────────────────────────────────────────────────────────────────
//

/// Structured coaching guidance. Any subset of the fields may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachGuidance {
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub next_step: Option<String>,
}

/// Guidance or its explicit absence.
///
/// Callers get this instead of a `Result` so the "coach is unavailable"
/// case cannot be forgotten: progression carries on either way.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum CoachOutcome {
    Ready(CoachGuidance),
    Unavailable,
}

impl CoachOutcome {
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, CoachOutcome::Ready(_))
    }

    #[must_use]
    pub fn guidance(&self) -> Option<&CoachGuidance> {
        match self {
            CoachOutcome::Ready(guidance) => Some(guidance),
            CoachOutcome::Unavailable => None,
        }
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Adapter for the external text-generation coach.
///
/// The request embeds the learner profile and the next recommended lesson
/// titles (titles, not ids). Requests are last-wins: when a newer request
/// starts before an older one resolves, the older response is discarded as
/// `CoachError::Superseded`.
#[derive(Clone)]
pub struct CoachService {
    client: Client,
    config: Option<CoachConfig>,
    generation: Arc<AtomicU64>,
}

impl CoachService {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(CoachConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<CoachConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Requests coaching guidance for the profile and upcoming lesson titles.
    ///
    /// # Errors
    ///
    /// Returns `CoachError` when coaching is disabled, the title list is
    /// empty, the request fails, the response cannot be parsed, or a newer
    /// request superseded this one.
    pub async fn request_guidance(
        &self,
        profile: &LearnerProfile,
        next_lessons: &[String],
    ) -> Result<CoachGuidance, CoachError> {
        let config = self.config.as_ref().ok_or(CoachError::Disabled)?;
        if next_lessons.is_empty() {
            return Err(CoachError::NoLessons);
        }

        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let prompt = format!(
            "You are an investing learning coach. Provide concise educational guidance only.\n\
             Learner profile: {}\n\
             Next lessons: {}\n\
             Return JSON with keys: headline, summary, nextStep.",
            serde_json::to_string(profile)?,
            serde_json::to_string(next_lessons)?,
        );

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.3,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CoachError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(CoachError::EmptyResponse)?;

        let guidance: CoachGuidance = serde_json::from_str(content.trim())?;

        // Last request wins: a newer request started while this one was in
        // flight, so this response is stale.
        if self.generation.load(Ordering::SeqCst) != ticket {
            return Err(CoachError::Superseded);
        }

        Ok(guidance)
    }

    /// Like `request_guidance`, but absorbs every failure into
    /// `CoachOutcome::Unavailable`. The progression core never sees a
    /// coaching error.
    pub async fn fetch_guidance(
        &self,
        profile: &LearnerProfile,
        next_lessons: &[String],
    ) -> CoachOutcome {
        match self.request_guidance(profile, next_lessons).await {
            Ok(guidance) => CoachOutcome::Ready(guidance),
            Err(err) => {
                tracing::debug!("coaching guidance unavailable: {err}");
                CoachOutcome::Unavailable
            }
        }
    }
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    response_format: ResponseFormat,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[tokio::test]
    async fn disabled_service_reports_disabled() {
        let service = CoachService::new(None);
        assert!(!service.enabled());

        let err = service
            .request_guidance(
                &LearnerProfile::new(4, 3, 6),
                &titles(&["Estimating Fair Value"]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::Disabled));
    }

    #[tokio::test]
    async fn empty_lesson_list_is_a_client_error() {
        let service = CoachService::new(Some(CoachConfig {
            base_url: "http://localhost:0".into(),
            api_key: "test-key".into(),
            model: "test-model".into(),
        }));

        let err = service
            .request_guidance(&LearnerProfile::new(4, 3, 6), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::NoLessons));
    }

    #[tokio::test]
    async fn fetch_guidance_absorbs_failures() {
        let service = CoachService::new(None);
        let outcome = service
            .fetch_guidance(
                &LearnerProfile::new(4, 3, 6),
                &titles(&["Estimating Fair Value"]),
            )
            .await;
        assert_eq!(outcome, CoachOutcome::Unavailable);
        assert!(outcome.guidance().is_none());
    }

    #[tokio::test]
    async fn unreachable_upstream_is_absorbed_not_propagated() {
        let service = CoachService::new(Some(CoachConfig {
            base_url: "http://127.0.0.1:9".into(),
            api_key: "test-key".into(),
            model: "test-model".into(),
        }));

        let outcome = service
            .fetch_guidance(
                &LearnerProfile::new(4, 3, 6),
                &titles(&["Estimating Fair Value"]),
            )
            .await;
        assert_eq!(outcome, CoachOutcome::Unavailable);
    }

    #[test]
    fn guidance_parses_partial_payloads() {
        let guidance: CoachGuidance =
            serde_json::from_str(r#"{"summary":"Focus on valuation basics."}"#).unwrap();
        assert_eq!(guidance.headline, None);
        assert_eq!(
            guidance.summary.as_deref(),
            Some("Focus on valuation basics.")
        );
        assert_eq!(guidance.next_step, None);

        let full: CoachGuidance = serde_json::from_str(
            r#"{"headline":"Start here","summary":"Valuation first.","nextStep":"Open the fair value module."}"#,
        )
        .unwrap();
        assert_eq!(full.next_step.as_deref(), Some("Open the fair value module."));
    }
}
