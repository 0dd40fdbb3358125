//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::segmenter::Segmenter;
use engram_domain::traits::LlmProvider;
use engram_domain::SemanticStructure;
use engram_llm::response::parse_structured;
use engram_llm::PromptTemplate;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// The Extractor turns raw text into an aggregated semantic structure by
/// driving the oracle once per chunk.
pub struct Extractor<L>
where
    L: LlmProvider,
{
    llm: L,
    template: PromptTemplate,
    segmenter: Segmenter,
}

impl<L> Extractor<L>
where
    L: LlmProvider,
    L::Error: std::fmt::Display,
{
    /// Create a new Extractor.
    ///
    /// Configuration problems are fatal here; a partially-wired extractor
    /// is never returned.
    pub fn new(
        llm: L,
        template: PromptTemplate,
        config: &ExtractorConfig,
    ) -> Result<Self, ExtractorError> {
        config.validate()?;
        let segmenter = Segmenter::new(config.chunk_size, config.overlap, config.strategy)?;
        Ok(Self {
            llm,
            template,
            segmenter,
        })
    }

    /// Extract a semantic structure from text.
    ///
    /// Chunks are processed strictly sequentially; each chunk's records are
    /// concatenated onto the running aggregate in emission order, with no
    /// deduplication. A failed oracle call or unparseable response drops
    /// that one chunk's contribution and extraction continues, so the batch
    /// always makes forward progress.
    pub fn extract(&self, text: &str) -> SemanticStructure {
        let chunks = self.segmenter.segment(text);
        info!(
            "extracting semantic structure: {} chars in {} chunks",
            text.chars().count(),
            chunks.len()
        );

        let mut structure = SemanticStructure::default();

        for (idx, chunk) in chunks.iter().enumerate() {
            debug!(
                "processing chunk {}/{} ({} chars)",
                idx + 1,
                chunks.len(),
                chunk.size
            );

            // Literal substitution: operator templates embed JSON examples
            // whose braces must never be treated as placeholders.
            let prompt = self.template.render(&[("input_text", &chunk.content)]);

            let response = match self.llm.generate(&prompt) {
                Ok(response) => response,
                Err(e) => {
                    warn!(
                        "chunk {}/{} dropped, oracle call failed: {}",
                        idx + 1,
                        chunks.len(),
                        e
                    );
                    continue;
                }
            };

            match parse_structured(&response) {
                Ok(value) => structure.absorb(&value),
                Err(e) => {
                    warn!("chunk {}/{} dropped: {}", idx + 1, chunks.len(), e);
                }
            }
        }

        info!(
            "extraction complete: {} entities, {} events, {} roles, {} states, {} actions",
            structure.entities.len(),
            structure.events.len(),
            structure.roles.len(),
            structure.states.len(),
            structure.actions.len()
        );
        structure
    }

    /// Derive prospective follow-up questions from the extracted roles,
    /// states, actions and spatiotemporal context with one oracle call, and
    /// append them to `forward_falling_questions`.
    ///
    /// Non-fatal: an unparseable or non-array response adds nothing.
    pub fn derive_forward_questions(&self, structure: &mut SemanticStructure) {
        let context = json!({
            "roles": structure.roles,
            "states": structure.states,
            "actions": structure.actions,
            "spatiotemporal_context": structure.spatiotemporal_context,
        });

        let context_json = match serde_json::to_string_pretty(&context) {
            Ok(context_json) => context_json,
            Err(e) => {
                warn!("forward-question derivation skipped, context not serializable: {}", e);
                return;
            }
        };

        let prompt = format!(
            "{}\n\nSemantic structure:\n{}",
            FORWARD_QUESTION_INSTRUCTIONS, context_json
        );

        let response = match self.llm.generate(&prompt) {
            Ok(response) => response,
            Err(e) => {
                warn!("forward-question derivation skipped, oracle call failed: {}", e);
                return;
            }
        };

        match parse_structured(&response) {
            Ok(Value::Array(questions)) => {
                info!("derived {} forward-falling questions", questions.len());
                structure.forward_falling_questions.extend(questions);
            }
            Ok(_) => {
                warn!("forward-question response is not a list, adding nothing");
            }
            Err(e) => {
                warn!("forward-question derivation dropped: {}", e);
            }
        }
    }
}

const FORWARD_QUESTION_INSTRUCTIONS: &str = r#"You are a semantic reasoning expert. From the roles, state changes, actions and spatiotemporal context below, derive every reasonable forward-falling question the narrative implies (for example: after an arrest, when will charges be filed, where will the trial be held, will bail be granted).

Output a JSON array only, no additional text. Each element must have this shape:

{
  "question": "the prospective question",
  "related_entities": ["entity names this question concerns"],
  "reasoning_context": "why the structure implies this question"
}"#;
