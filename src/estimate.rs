use crate::config::Settings;
use crate::errors::TrackerError;
use futures::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const ESTIMATOR_INSTRUCTION: &str = "You are a carbon emissions calculator. Based on a given activity, \
respond ONLY with the estimated CO2 emission in kilograms as a number (no units, no explanation).";

// `Unparsable` counts as 0.0 kg in totals but is never a confirmed zero.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimateOutcome {
    Estimated { kg: f64, raw: String },
    Unparsable { raw: String },
}

impl EstimateOutcome {
    pub fn kg(&self) -> f64 {
        match self {
            EstimateOutcome::Estimated { kg, .. } => *kg,
            EstimateOutcome::Unparsable { .. } => 0.0,
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            EstimateOutcome::Estimated { raw, .. } | EstimateOutcome::Unparsable { raw } => raw,
        }
    }

    pub fn is_estimated(&self) -> bool {
        matches!(self, EstimateOutcome::Estimated { .. })
    }
}

// Drops everything but digits and points, then reads the longest
// `digits[.digits]` prefix: "3.4 kg." is 3.4, "1.5 to 2.5" is 1.52.
pub fn parse_estimate(content: &str) -> EstimateOutcome {
    let mut seen_point = false;
    let prefix: String = content
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .take_while(|c| {
            if *c == '.' {
                if seen_point {
                    return false;
                }
                seen_point = true;
            }
            true
        })
        .collect();
    match prefix.parse::<f64>() {
        Ok(kg) if kg.is_finite() => EstimateOutcome::Estimated {
            kg,
            raw: content.to_string(),
        },
        _ => EstimateOutcome::Unparsable {
            raw: content.to_string(),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanSummary {
    pub total_kg: f64,
    pub unestimated: usize,
}

pub fn summarize_plan(outcomes: &[Result<EstimateOutcome, TrackerError>]) -> PlanSummary {
    let mut total_kg = 0.0;
    let mut unestimated = 0;
    for outcome in outcomes {
        match outcome {
            Ok(EstimateOutcome::Estimated { kg, .. }) => total_kg += kg,
            _ => unestimated += 1,
        }
    }
    PlanSummary {
        total_kg: crate::aggregate::round2(total_kg),
        unestimated,
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EstimationClient {
    client: Client,
    url: String,
    api_key: Option<String>,
    model: Option<String>,
}

impl EstimationClient {
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(settings.estimator_timeout)
            .build()?;
        Ok(Self {
            client,
            url: settings.estimator_url.clone(),
            api_key: settings.estimator_api_key.clone(),
            model: settings.estimator_model.clone(),
        })
    }

    pub async fn estimate(&self, description: &str) -> Result<EstimateOutcome, TrackerError> {
        let messages = vec![
            ChatMessage {
                role: "system",
                content: ESTIMATOR_INSTRUCTION,
            },
            ChatMessage {
                role: "user",
                content: description,
            },
        ];
        let outcome = match self.complete(messages).await? {
            Some(content) => parse_estimate(&content),
            None => EstimateOutcome::Unparsable { raw: String::new() },
        };
        match &outcome {
            EstimateOutcome::Estimated { kg, .. } => debug!(kg, "estimated activity"),
            EstimateOutcome::Unparsable { raw } => {
                warn!(raw = %raw, "estimator returned a non-numeric answer")
            }
        }
        Ok(outcome)
    }

    pub async fn estimate_many(
        &self,
        descriptions: &[String],
    ) -> Vec<Result<EstimateOutcome, TrackerError>> {
        join_all(descriptions.iter().map(|text| self.estimate(text))).await
    }

    pub async fn ask(&self, message: &str) -> Result<String, TrackerError> {
        let messages = vec![ChatMessage {
            role: "user",
            content: message,
        }];
        self.complete(messages)
            .await?
            .map(|reply| reply.trim().to_string())
            .ok_or_else(|| TrackerError::EstimationUnavailable("unexpected response format".into()))
    }

    async fn complete(&self, messages: Vec<ChatMessage<'_>>) -> Result<Option<String>, TrackerError> {
        let body = CompletionRequest {
            model: self.model.as_deref(),
            messages,
        };
        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| TrackerError::EstimationUnavailable(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::EstimationUnavailable(format!(
                "completion endpoint returned {status}"
            )));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|err| TrackerError::EstimationUnavailable(err.to_string()))?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}
