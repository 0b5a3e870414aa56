use nuance_types::WordEntry;
use serde_json::json;

use super::GeminiClient;
use super::wire::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::{AiError, WordCatalog};

const SYSTEM_INSTRUCTION: &str = "\
You are an expert Quranic scholar and linguist fluent in Bengali and Arabic.
Your task is to explain the nuances of different Arabic words used in the Quran related to a specific topic provided by the user.

For each word, provide:
1. The Arabic spelling (with vowels/tashkeel).
2. Bengali Transliteration.
3. Literal Bengali Meaning.
4. Deep Nuance (The specific context or shade of meaning this word implies in the Quran, distinct from synonyms).
5. A representative Surah and Verse number (e.g., সূরা আল-বাকারা ২:২).

Return the response strictly as a JSON array.";

fn topic_prompt(topic: &str) -> String {
    format!(
        "Topic: \"{topic}\". Provide 3 to 5 distinct Quranic words related to this topic in Bengali."
    )
}

/// Output contract enforced by the service
fn response_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "arabic": { "type": "STRING", "description": "Arabic word with tashkeel" },
                "transliteration": { "type": "STRING", "description": "Bengali pronunciation" },
                "meaning": { "type": "STRING", "description": "Literal meaning in Bengali" },
                "nuance": {
                    "type": "STRING",
                    "description": "Detailed explanation of the word's usage and depth in Bengali"
                },
                "reference": { "type": "STRING", "description": "Surah Name and Verse Number in Bengali" },
                "category": {
                    "type": "STRING",
                    "description": "The general topic category (e.g., Soul, Time)"
                }
            },
            "required": ["arabic", "transliteration", "meaning", "nuance", "reference"]
        }
    })
}

/// Empty text means "no entries", anything else must match the schema
fn parse_entries(text: &str) -> Result<Vec<WordEntry>, AiError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(text).map_err(|e| AiError::ResponseFormat(e.to_string()))
}

#[async_trait::async_trait]
impl WordCatalog for GeminiClient {
    async fn fetch_by_topic(&self, topic: &str) -> Result<Vec<WordEntry>, AiError> {
        self.ensure_credential()?;

        let contents = [Content::user(topic_prompt(topic))];
        let request = GenerateContentRequest {
            system_instruction: Content::system(SYSTEM_INSTRUCTION),
            contents: &contents,
            generation_config: Some(GenerationConfig::json(response_schema())),
        };

        tracing::debug!("fetching words for topic '{topic}'");
        let response = self
            .post(
                &self.endpoint("generateContent"),
                &request,
                Some(self.request_timeout()),
            )
            .await?;

        let raw = response.text().await?;
        let body: GenerateContentResponse = serde_json::from_str(&raw)
            .map_err(|e| AiError::ResponseFormat(format!("Bad response envelope: {e}")))?;
        body.ensure_not_blocked()?;

        let entries = parse_entries(&body.text())?;
        tracing::info!("topic '{topic}': {} entries", entries.len());
        Ok(entries)
    }
}
