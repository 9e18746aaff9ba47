use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::{json, Value};
use travelbot_core::{Itinerary, PlanNarrative, PlanSummary, Preference};

use crate::config::OpenAiConfig;
use crate::NarrativeGenerator;

const SYSTEM_PROMPT: &str = "You are a realistic travel planner. Read the traveller preferences (pref) and the recommended itinerary (plan) and write a concise, friendly explanation. Respond with JSON only, in this shape:\n\n{\n  \"narrative\": \"natural-language description\",\n  \"summary\": {\n    \"for_who\": \"one line on who this itinerary suits\",\n    \"highlights\": [\"highlight 1\", \"highlight 2\", \"highlight 3\"],\n    \"warnings\": [\"caution 1\", \"caution 2\"]\n  }\n}\n\nThe narrative should be 4 to 8 sentences describing the overall mood and character of the trip.";

#[derive(Debug, Clone)]
pub struct OpenAiNarrator {
    http_client: Client,
    runtime: Option<OpenAiConfig>,
}

impl OpenAiNarrator {
    pub fn new(runtime: Option<OpenAiConfig>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(config) = runtime.as_ref() {
            builder = builder.timeout(config.timeout);
        }
        let http_client = builder
            .build()
            .context("failed to build narrative HTTP client")?;

        Ok(Self {
            http_client,
            runtime,
        })
    }
}

impl NarrativeGenerator for OpenAiNarrator {
    fn llm_enabled(&self) -> bool {
        self.runtime.is_some()
    }

    async fn generate(&self, pref: &Preference, itinerary: &Itinerary) -> Result<PlanNarrative> {
        let runtime = self
            .runtime
            .as_ref()
            .context("OpenAI runtime is not configured")?;

        let user_content = serde_json::to_string(&json!({ "pref": pref, "plan": itinerary }))
            .context("failed to encode narrative context")?;
        let payload = json!({
            "model": runtime.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_content }
            ],
            "temperature": 0.4,
            "response_format": { "type": "json_object" }
        });

        let response = self
            .http_client
            .post(format!("{}/chat/completions", runtime.base_url))
            .bearer_auth(runtime.api_key.as_str())
            .json(&payload)
            .send()
            .await
            .context("OpenAI request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI non-success status {}: {}", status.as_u16(), body);
        }

        let body: Value = response.json().await.context("OpenAI parse failed")?;
        let content = extract_message_content(&body).context("OpenAI message content missing")?;
        Ok(parse_narrative_content(content))
    }
}

fn extract_message_content(payload: &Value) -> Option<&str> {
    payload
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
}

/// Content that is not the requested JSON shape becomes the narrative as-is.
pub fn parse_narrative_content(content: &str) -> PlanNarrative {
    serde_json::from_str::<PlanNarrative>(content).unwrap_or_else(|_| PlanNarrative {
        narrative: content.to_string(),
        summary: PlanSummary::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_structured_model_output() {
        let parsed = parse_narrative_content(
            r#"{"narrative":"Two easy days.","summary":{"for_who":"Night owls","highlights":["a","b","c"],"warnings":["x","y"]}}"#,
        );
        assert_eq!(parsed.narrative, "Two easy days.");
        assert_eq!(parsed.summary.for_who, "Night owls");
        assert_eq!(parsed.summary.highlights.len(), 3);
    }

    #[test]
    fn free_text_output_becomes_narrative() {
        let parsed = parse_narrative_content("Just a paragraph.");
        assert_eq!(parsed.narrative, "Just a paragraph.");
        assert_eq!(parsed.summary, PlanSummary::default());
    }

    #[test]
    fn reads_first_choice_content() {
        let body = json!({
            "choices": [{ "message": { "role": "assistant", "content": "{\"narrative\":\"hi\"}" } }]
        });
        assert_eq!(extract_message_content(&body), Some("{\"narrative\":\"hi\"}"));
        assert_eq!(extract_message_content(&json!({ "choices": [] })), None);
    }

    #[test]
    fn narrator_without_key_is_disabled() {
        let narrator = OpenAiNarrator::new(None).unwrap();
        assert!(!narrator.llm_enabled());
    }
}
