use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::models::{ExclusionSet, TrackCandidate};

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

const SYSTEM_PROMPT: &str = "You are a Spotify assistant helping the user create music playlists. \
You should generate a list of artists and songs you consider fit the text prompt. \
The output should be a JSON array formatted like this: {\"song\": <song_title>, \"artist\": <artist_name>}. \
Do not return anything else than the JSON array.";

const EXAMPLE_ASK: &str = "Give me 5 very sad songs";

const EXAMPLE_REPLY: &str = r#"[
 {"song": "Bohemian Rhapsody", "artist": "Queen"},
 {"song": "Hotel California", "artist": "Eagles"},
 {"song": "Smells Like Teen Spirit", "artist": "Nirvana"},
 {"song": "Billie Jean", "artist": "Michael Jackson"},
 {"song": "Stairway to Heaven", "artist": "Led Zeppelin"}
]"#;

/// Source of (song, artist) candidates for a prompt. The exclusion set is an
/// advisory hint folded into the prompt, not a guarantee on the output.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        count: usize,
        exclusions: &ExclusionSet,
    ) -> Result<Vec<TrackCandidate>>;
}

/// Candidate generator backed by the OpenAI chat-completions API.
pub struct OpenAiGenerator {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl OpenAiGenerator {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }
}

/// Output-token headroom for a reply of `count` songs, generous enough for
/// JSON formatting overhead on short song/artist names. Counts are bounded
/// by request validation; saturate rather than wrap for anything larger.
pub fn max_completion_tokens(count: usize) -> u32 {
    let tokens = (count as u64).saturating_mul(20).saturating_add(250);
    tokens.min(u32::MAX as u64) as u32
}

/// The final user turn. The exclusion clause is appended only when there is
/// something to exclude.
pub fn build_user_message(prompt: &str, count: usize, exclusions: &ExclusionSet) -> String {
    let mut message = format!("Give me {} songs matching this prompt: {}", count, prompt);
    if let Some(excluded) = exclusions.describe() {
        message.push_str(&format!(", which are not part of this list: {}", excluded));
    }
    message
}

/// A completion with no choices at all is a malformed reply from the
/// service, not an empty suggestion list.
fn extract_content(completion: ChatCompletionResponse) -> Result<String> {
    completion
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| AppError::Generation("completion contained no choices".to_string()))
}

/// Parse the model reply as a JSON array of {song, artist} records. A reply
/// that does not parse yields an empty list, not an error; callers treat
/// "no candidates" as a recoverable outcome.
pub fn parse_candidates(content: &str) -> Vec<TrackCandidate> {
    match serde_json::from_str::<Vec<TrackCandidate>>(content) {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!("Could not parse completion as a candidate array: {}", e);
            Vec::new()
        }
    }
}

#[async_trait]
impl CandidateSource for OpenAiGenerator {
    async fn generate(
        &self,
        prompt: &str,
        count: usize,
        exclusions: &ExclusionSet,
    ) -> Result<Vec<TrackCandidate>> {
        let user_message = build_user_message(prompt, count, exclusions);
        debug!("Requesting {} candidates from {}", count, self.model);

        let response = self
            .client
            .post(COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "max_tokens": max_completion_tokens(count),
                "messages": [
                    {"role": "system", "content": SYSTEM_PROMPT},
                    {"role": "user", "content": EXAMPLE_ASK},
                    {"role": "assistant", "content": EXAMPLE_REPLY},
                    {"role": "user", "content": user_message},
                ],
            }))
            .send()
            .await
            .map_err(|e| AppError::Completion(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Completion(format!(
                "API returned status: {} - {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Completion(format!("Failed to parse response: {}", e)))?;

        let content = extract_content(completion)?;

        Ok(parse_candidates(&content))
    }
}
