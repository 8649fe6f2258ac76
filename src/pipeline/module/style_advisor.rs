use std::time::Duration;
use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::json;
use crate::error::errors::ProviderError;
use crate::pipeline::module::feature_classifier::ClassificationResult;

const PROVIDER: &str = "gemini";
const MAX_ENTITY_PASSES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HairstyleProposal {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiProposal {
    pub summary: String,
    pub hairstyle_proposals: Vec<HairstyleProposal>,
}

/// Produces styling copy from the classification labels only.
#[async_trait]
pub trait StyleAdvisor: Send + Sync {
    async fn propose(&self, analysis: &ClassificationResult) -> Result<AiProposal, ProviderError>;
}

pub fn build_prompt(analysis: &ClassificationResult) -> String {
    format!(
        r#"You are a top professional hair stylist AI. Analyse the customer's diagnosis below and propose the best hairstyles.

# Customer diagnosis
- Face shape: {face_shape}
- Skin base color: {base_color}
- Shoulder line: {shoulder_line}

# Output format (JSON, all keys required)
{{
  "summary": "(an overall styling comment of about 100 characters based on the diagnosis)",
  "hairstyleProposals": [
    {{"name": "(concrete hairstyle name 1)", "description": "(short description of the style)"}},
    {{"name": "(concrete hairstyle name 2)", "description": "(short description of the style)"}}
  ]
}}
"#,
        face_shape = analysis.face_shape,
        base_color = analysis.personal_color.base_color,
        shoulder_line = analysis.shoulder_line,
    )
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Gemini `generateContent` over the public REST API.
#[derive(Debug, Clone)]
pub struct GeminiStyleAdvisor {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiStyleAdvisor {
    pub fn new(base_url: &str, model: &str, api_key: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ProviderError::Transport { provider: PROVIDER, source })?;
        Ok(GeminiStyleAdvisor {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.trim().to_string(),
        })
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl StyleAdvisor for GeminiStyleAdvisor {
    async fn propose(&self, analysis: &ClassificationResult) -> Result<AiProposal, ProviderError> {
        let payload = json!({
            "contents": [{"role": "user", "parts": [{"text": build_prompt(analysis)}]}],
            "generationConfig": {"responseMimeType": "application/json"},
        });

        info!("requesting styling proposal from {}", self.model);
        let response = self.client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .map_err(|source| ProviderError::Transport { provider: PROVIDER, source })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| ProviderError::Transport { provider: PROVIDER, source })?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            })
        }

        let resp: GenerateContentResponse = serde_json::from_slice(&body)
            .map_err(|source| ProviderError::Malformed { provider: PROVIDER, source })?;
        let text = resp.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse { provider: PROVIDER })?;
        debug!("gemini replied with {} characters", text.len());

        parse_proposal(&text)
    }
}

/// Parses the model reply, tolerating a surrounding markdown code fence.
pub fn parse_proposal(text: &str) -> Result<AiProposal, ProviderError> {
    let proposal: AiProposal = serde_json::from_str(strip_code_fence(text))
        .map_err(|source| ProviderError::Malformed { provider: PROVIDER, source })?;
    Ok(AiProposal {
        summary: decode_html_entities(&proposal.summary),
        hairstyle_proposals: proposal.hairstyle_proposals
            .into_iter()
            .map(|p| HairstyleProposal {
                name: decode_html_entities(&p.name),
                description: decode_html_entities(&p.description),
            })
            .collect(),
    })
}

fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

/// Decodes HTML entities repeatedly, since models sometimes escape twice.
pub fn decode_html_entities(s: &str) -> String {
    let mut decoded = s.to_string();
    for _ in 0..MAX_ENTITY_PASSES {
        let next = decode_entities_once(&decoded);
        if next == decoded {
            break
        }
        decoded = next;
    }
    decoded
}

fn decode_entities_once(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let decoded = tail
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}
