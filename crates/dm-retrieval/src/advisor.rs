//! Delivery-method recommendation on top of the prompt assembler.

use std::sync::Arc;

use dm_core::catalog::render_catalog;
use dm_core::config::{AdvisorConfig, NoResultsPolicy};
use dm_core::BusinessProfile;
use serde::{Deserialize, Serialize};

use crate::assembler::{PromptPayload, RetrievalPromptAssembler, Source, QUERY_HEADING};
use crate::error::{Result, RetrievalError};
use crate::generator::{GenerationRequest, TextGenerator};

const ANSWER_FORMAT: &str = "Answer in this format:

Recommended Delivery Method:
Why This Fits:
- Industry & Goal Alignment:
- Data & Complexity Alignment:
- Hosting Alignment:
Alternative Option:";

pub const GROUNDED_INSTRUCTIONS: &str = "You are an AI solution architect.

Base your answer only on the retrieved knowledge base entries below. Do not
assume anything they do not state. Each entry lists a Delivery Method, Simple
Description, Typical Best For, Hosting Control and Complexity.

1. Compare the business profile with each retrieved delivery method.
2. Weigh industry and goal against Typical Best For, data size and AI
   experience against Complexity, and deployment preferences against Hosting
   Control.
3. Pick exactly one delivery method and justify it from the retrieved fields.
4. If nothing aligns well, say so plainly.";

pub const UNGROUNDED_INSTRUCTIONS: &str = "You are an AI solution architect.

Compare the business profile with every delivery method listed below.

1. Weigh industry fit, goal alignment, data scale, AI experience against
   Complexity, and deployment preferences against Hosting Control.
2. Pick exactly one delivery method from the list. Do not invent new ones.
3. Keep the reasoning short.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendMode {
    /// Ground the prompt in retrieved catalog entries.
    #[default]
    Grounded,
    /// List the whole catalog without retrieval.
    Ungrounded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub answer: String,
    /// Mode actually used; differs from the request after a fallback.
    pub mode: RecommendMode,
    pub sources: Vec<Source>,
}

pub struct Advisor {
    assembler: RetrievalPromptAssembler,
    generator: Arc<dyn TextGenerator>,
    top_k: usize,
    temperature: f32,
    no_results: NoResultsPolicy,
}

impl Advisor {
    pub fn new(
        assembler: RetrievalPromptAssembler,
        generator: Arc<dyn TextGenerator>,
        config: &AdvisorConfig,
    ) -> Self {
        Self {
            assembler,
            generator,
            top_k: config.retrieval.top_k,
            temperature: config.generation.temperature,
            no_results: config.retrieval.no_results,
        }
    }

    /// Prompt for `profile` in the requested mode, and the mode actually used.
    pub async fn prompt_for(
        &self,
        profile: &BusinessProfile,
        mode: RecommendMode,
    ) -> Result<(RecommendMode, PromptPayload)> {
        let query = profile.query_text();
        match mode {
            RecommendMode::Ungrounded => Ok((RecommendMode::Ungrounded, ungrounded_prompt(&query))),
            RecommendMode::Grounded => {
                match self.assembler.compose(&grounded_instructions(), &query, self.top_k).await {
                    Ok(payload) => Ok((RecommendMode::Grounded, payload)),
                    Err(RetrievalError::NoResults) if self.no_results == NoResultsPolicy::Ungrounded => {
                        tracing::warn!("no grounding records retrieved, falling back to ungrounded prompt");
                        Ok((RecommendMode::Ungrounded, ungrounded_prompt(&query)))
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    pub async fn recommend(&self, profile: &BusinessProfile, mode: RecommendMode) -> Result<Recommendation> {
        let (used, payload) = self.prompt_for(profile, mode).await?;
        let request = GenerationRequest {
            prompt: payload.text,
            temperature: self.temperature,
        };
        tracing::info!(
            generator = self.generator.name(),
            mode = ?used,
            sources = payload.sources.len(),
            "requesting recommendation"
        );
        let answer = self.generator.generate(&request).await?;
        Ok(Recommendation {
            answer,
            mode: used,
            sources: payload.sources,
        })
    }
}

fn grounded_instructions() -> String {
    format!("{GROUNDED_INSTRUCTIONS}\n\n{ANSWER_FORMAT}")
}

/// Full-catalog prompt used when no retrieval is performed.
pub fn ungrounded_prompt(query_text: &str) -> PromptPayload {
    PromptPayload {
        text: format!(
            "{UNGROUNDED_INSTRUCTIONS}\n\n{ANSWER_FORMAT}\n\n{}\n{}\n{}\n",
            render_catalog().trim_end(),
            QUERY_HEADING,
            query_text.trim_end(),
        ),
        sources: Vec::new(),
    }
}
