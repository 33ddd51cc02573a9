use crate::domain::models::{AnalysisResponse, AnalyzerConfig, CollectedData, ScenarioState};
use crate::domain::ports::errors::AnalyzerError;
use crate::domain::ports::ScenarioAnalyzer;
use crate::infrastructure::analyzer::prompt::{build_system_prompt, build_user_prompt};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// HTTP client for the hosted reasoning service (Anthropic messages API).
#[derive(Debug)]
pub struct HttpScenarioAnalyzer {
    client: reqwest::Client,
    config: AnalyzerConfig,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

impl HttpScenarioAnalyzer {
    /// Build a client with the configured per-request timeout.
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        if config.api_key.is_empty() {
            return Err(AnalyzerError::NotConfigured(
                "analyzer.api_key is empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AnalyzerError::Request(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Extract the outermost JSON object from free-form response text.
    ///
    /// The service is instructed to reply with bare JSON but occasionally
    /// wraps it in prose or a code fence.
    fn extract_json(text: &str) -> Result<&str, AnalyzerError> {
        let start = text.find('{').ok_or(AnalyzerError::NoJsonPayload)?;
        let end = text.rfind('}').ok_or(AnalyzerError::NoJsonPayload)?;
        if end < start {
            return Err(AnalyzerError::NoJsonPayload);
        }
        Ok(&text[start..=end])
    }

    fn parse_response(text: &str) -> Result<AnalysisResponse, AnalyzerError> {
        let payload = Self::extract_json(text)?;
        let response: AnalysisResponse = serde_json::from_str(payload)
            .map_err(|e| AnalyzerError::MalformedResponse(e.to_string()))?;

        let updated = &response.scenario_update.updated;
        let sum = updated.a + updated.b + updated.c + updated.d;
        if !(80.0..=120.0).contains(&sum) {
            return Err(AnalyzerError::MalformedResponse(format!(
                "probabilities sum to {sum}, expected ~100"
            )));
        }
        for id in crate::domain::models::ScenarioId::ALL {
            let p = updated.get(id);
            if !(0.0..=100.0).contains(&p) {
                return Err(AnalyzerError::MalformedResponse(format!(
                    "scenario {id} probability {p} out of range"
                )));
            }
        }

        Ok(response)
    }
}

#[async_trait]
impl ScenarioAnalyzer for HttpScenarioAnalyzer {
    async fn analyze(
        &self,
        current_state: Option<&ScenarioState>,
        data: &CollectedData,
    ) -> Result<AnalysisResponse, AnalyzerError> {
        let last_check = current_state.map_or_else(
            || "initial".to_string(),
            |s| s.timestamp.to_rfc3339(),
        );

        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "system": build_system_prompt(current_state),
            "messages": [{
                "role": "user",
                "content": build_user_prompt(data, &last_check),
            }],
        });

        debug!(
            model = %self.config.model,
            news = data.news_count,
            "requesting scenario analysis"
        );

        let response = self
            .client
            .post(format!("{}/v1/messages", self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnalyzerError::Timeout(self.config.timeout_secs)
                } else {
                    AnalyzerError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(status = %status, "reasoning service returned an error");
            return Err(AnalyzerError::Request(format!(
                "status {status}: {detail}"
            )));
        }

        let messages: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AnalyzerError::MalformedResponse(e.to_string()))?;

        let text = messages
            .content
            .iter()
            .find(|block| block.block_type == "text")
            .map(|block| block.text.as_str())
            .ok_or(AnalyzerError::NoJsonPayload)?;

        Self::parse_response(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ScenarioAlertLevel;

    fn valid_payload() -> String {
        r#"{
            "alert_level": "HIGH",
            "summary": "Escalation near the strait.",
            "variable_changes": [
                {"variable": "chokepoint_status", "old_value": "open",
                 "new_value": "restricted", "confidence": 0.8, "source": "news"}
            ],
            "scenario_update": {
                "previous": {"A": 25, "B": 40, "C": 30, "D": 5},
                "updated": {"A": 15, "B": 35, "C": 45, "D": 5},
                "primary_scenario": "C",
                "reasoning": "Two independent reports of transit interference."
            },
            "market_impact": {"oil": "up", "equities": "down", "shipping": "up"},
            "alert_message": "Chokepoint now restricted."
        }"#
        .to_string()
    }

    #[test]
    fn parses_bare_json() {
        let response = HttpScenarioAnalyzer::parse_response(&valid_payload()).unwrap();
        assert_eq!(response.alert_level, ScenarioAlertLevel::High);
        assert_eq!(response.scenario_update.updated.c, 45.0);
        assert_eq!(response.variable_changes.len(), 1);
    }

    #[test]
    fn parses_json_wrapped_in_prose() {
        let wrapped = format!("Here is my assessment:\n```json\n{}\n```\nDone.", valid_payload());
        let response = HttpScenarioAnalyzer::parse_response(&wrapped).unwrap();
        assert_eq!(response.scenario_update.primary_scenario.as_str(), "C");
    }

    #[test]
    fn rejects_text_without_json() {
        let err = HttpScenarioAnalyzer::parse_response("no structured data here").unwrap_err();
        assert!(matches!(err, AnalyzerError::NoJsonPayload));
    }

    #[test]
    fn rejects_probabilities_far_from_100() {
        let payload = valid_payload().replace(
            r#""updated": {"A": 15, "B": 35, "C": 45, "D": 5}"#,
            r#""updated": {"A": 5, "B": 5, "C": 5, "D": 5}"#,
        );
        let err = HttpScenarioAnalyzer::parse_response(&payload).unwrap_err();
        assert!(matches!(err, AnalyzerError::MalformedResponse(_)));
    }

    #[test]
    fn rejects_unknown_alert_level() {
        let payload = valid_payload().replace("\"HIGH\"", "\"SEVERE\"");
        let err = HttpScenarioAnalyzer::parse_response(&payload).unwrap_err();
        assert!(matches!(err, AnalyzerError::MalformedResponse(_)));
    }

    #[test]
    fn empty_api_key_is_rejected_at_construction() {
        let err = HttpScenarioAnalyzer::new(AnalyzerConfig::default()).unwrap_err();
        assert!(matches!(err, AnalyzerError::NotConfigured(_)));
    }
}
