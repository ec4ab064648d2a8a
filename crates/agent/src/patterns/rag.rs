//! RAG pattern: answer a question from the firm's documents.
//!
//! # Flow
//!
//! 1. Reject a blank question
//! 2. With no documents at all, answer with a fixed notice
//! 3. Rank the documents; with none relevant, answer with a fixed notice
//!    and never call the provider
//! 4. Assemble the context block and build the grounded prompt
//! 5. Call the provider under a timeout
//! 6. Return the trimmed answer, or a fixed apology if generation failed,
//!    with the ranked documents attached as sources either way

use std::sync::Arc;
use std::time::Duration;

use lexdesk_config::{AppConfig, AssistantConfig};
use lexdesk_core::document::Document;
use lexdesk_core::error::{Error, ProviderError, Result};
use lexdesk_core::message::Message;
use lexdesk_core::provider::{Provider, ProviderRequest, Usage};
use lexdesk_core::store::DocumentStore;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::context::token;
use crate::context::{AssemblyMetadata, ContextAssembler, ContextConfig};
use crate::retrieval::{LexicalRanker, RankingProfile};

/// Returned when the collection is empty.
pub const NO_DOCUMENTS_ANSWER: &str = "I don't have access to any documents yet. Please upload \
     case documents first. Once documents are available, I'll be able to answer questions about \
     their content.";

/// Returned when ranking keeps nothing.
pub const NO_RELEVANT_DOCUMENTS_ANSWER: &str = "I couldn't find any relevant documents to answer \
     your question. Please try rephrasing your query with different keywords or check if the \
     necessary documents have been uploaded to the system.";

/// Returned when the provider fails, times out or answers with nothing.
pub const GENERATION_FAILED_ANSWER: &str = "I apologize, but I encountered a technical error \
     while processing your request. Please try again, and if the problem persists, contact \
     system support.";

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// How a question was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RagOutcome {
    /// The provider produced an answer.
    Answered,
    /// The collection was empty.
    NoDocuments,
    /// No document scored above the threshold.
    NoRelevantDocuments,
    /// The provider failed; the answer is the fixed apology.
    GenerationFailed { reason: String },
}

/// Result of a question.
#[derive(Debug, Clone, Serialize)]
pub struct RagAnswer {
    /// The answer text shown to the user.
    pub answer: String,
    /// Ranked documents the answer was drawn from, best first.
    pub sources: Vec<Document>,
    pub outcome: RagOutcome,
    /// Context assembly metadata, when a context was built.
    pub context_metadata: Option<AssemblyMetadata>,
    /// Token usage reported by the provider.
    pub usage: Option<Usage>,
}

impl RagAnswer {
    fn fixed(answer: &str, outcome: RagOutcome) -> Self {
        Self {
            answer: answer.to_string(),
            sources: Vec::new(),
            outcome,
            context_metadata: None,
            usage: None,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.outcome == RagOutcome::Answered
    }

    /// One line describing the sources, for display under the answer.
    pub fn source_note(&self) -> String {
        match self.sources.len() {
            0 => "Tip: try rephrasing your question with different keywords, or check that the \
                  relevant documents have been uploaded."
                .to_string(),
            1 => "Source: this answer is based on 1 document.".to_string(),
            n => format!("Sources: this answer synthesizes information from {n} documents."),
        }
    }
}

/// Answers questions over a document collection.
pub struct RagAssistant {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    top_p: Option<f32>,
    top_k: Option<u32>,
    max_tokens: Option<u32>,
    timeout: Duration,
    ranker: LexicalRanker,
    assembler: ContextAssembler,
    assistant: AssistantConfig,
}

impl RagAssistant {
    /// Create an assistant with the `basic` ranker and default limits.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.3,
            top_p: None,
            top_k: None,
            max_tokens: None,
            timeout: DEFAULT_TIMEOUT,
            ranker: LexicalRanker::default(),
            assembler: ContextAssembler::default(),
            assistant: AssistantConfig::default(),
        }
    }

    /// Build from loaded configuration: model, sampling, timeout, ranking
    /// preset with overrides, excerpt limit and firm details.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Result<Self> {
        let ranker = LexicalRanker::new(RankingProfile::from_config(&config.retrieval)?)?;
        let assembler = ContextAssembler::new(ContextConfig::from_config(&config.retrieval))?;
        let model = if config.default_model.trim().is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            config.default_model.clone()
        };

        Ok(Self {
            provider,
            model,
            temperature: config.generation.temperature,
            top_p: Some(config.generation.top_p),
            top_k: Some(config.generation.top_k),
            max_tokens: config.generation.max_tokens,
            timeout: Duration::from_secs(config.provider.timeout_secs),
            ranker,
            assembler,
            assistant: config.assistant.clone(),
        })
    }

    pub fn with_ranker(mut self, ranker: LexicalRanker) -> Self {
        self.ranker = ranker;
        self
    }

    pub fn with_assembler(mut self, assembler: ContextAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn with_sampling(mut self, temperature: f32, top_p: Option<f32>, top_k: Option<u32>) -> Self {
        self.temperature = temperature;
        self.top_p = top_p;
        self.top_k = top_k;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Bound on a single provider call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_assistant(mut self, assistant: AssistantConfig) -> Self {
        self.assistant = assistant;
        self
    }

    pub fn ranker(&self) -> &LexicalRanker {
        &self.ranker
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Answer `question` from `documents`.
    ///
    /// Only a blank question is an error. Provider failures become a
    /// `GenerationFailed` outcome with the fixed apology as the answer.
    pub async fn ask(&self, question: &str, documents: &[Document]) -> Result<RagAnswer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::invalid_argument("question must not be blank"));
        }

        if documents.is_empty() {
            info!("RAG: no documents available");
            return Ok(RagAnswer::fixed(NO_DOCUMENTS_ANSWER, RagOutcome::NoDocuments));
        }

        info!(
            model = %self.model,
            preset = %self.ranker.profile().preset,
            documents = documents.len(),
            "RAG: starting retrieval"
        );

        // ── Step 1: Rank ──
        let ranked = self.ranker.rank(question, documents);
        if ranked.is_empty() {
            info!("RAG: no relevant documents");
            return Ok(RagAnswer::fixed(
                NO_RELEVANT_DOCUMENTS_ANSWER,
                RagOutcome::NoRelevantDocuments,
            ));
        }

        // ── Step 2: Assemble context ──
        let assembled = self.assembler.assemble(ranked.iter().copied());
        let sources: Vec<Document> = ranked.into_iter().cloned().collect();
        let messages = self.build_messages(question, &assembled.text);

        debug!(
            sources = sources.len(),
            prompt_tokens = token::estimate_messages_tokens(&messages),
            "RAG: prompt built"
        );

        // ── Step 3: Generate ──
        let (answer, outcome, usage) = match self.generate(messages).await {
            Ok((text, usage)) => {
                info!(
                    sources = sources.len(),
                    answer_len = text.len(),
                    "RAG: response generated"
                );
                (text, RagOutcome::Answered, usage)
            }
            Err(e) => {
                warn!(error = %e, sources = sources.len(), "RAG: generation failed, using fallback");
                (
                    GENERATION_FAILED_ANSWER.to_string(),
                    RagOutcome::GenerationFailed {
                        reason: e.to_string(),
                    },
                    None,
                )
            }
        };

        Ok(RagAnswer {
            answer,
            sources,
            outcome,
            context_metadata: Some(assembled.metadata),
            usage,
        })
    }

    /// Answer from every document in `store`.
    pub async fn ask_store(&self, question: &str, store: &dyn DocumentStore) -> Result<RagAnswer> {
        let documents = store.list().await?;
        self.ask(question, &documents).await
    }

    /// The system instructions and the user turn carrying the context.
    pub fn build_messages(&self, question: &str, context: &str) -> Vec<Message> {
        let system = format!(
            "You are an expert AI Legal Assistant for {firm}, a law firm in {jurisdiction}.\n\n\
             INSTRUCTIONS:\n\
             - Answer the user's question based EXCLUSIVELY on the provided document content\n\
             - Be precise, professional, and comprehensive in your response\n\
             - If information spans multiple documents, synthesize it coherently\n\
             - Always cite specific document names when referencing information\n\
             - If the answer cannot be found in the documents, clearly state this limitation\n\
             - Consider {jurisdiction} legal context where relevant\n\
             - Structure your response with clear sections if answering complex questions",
            firm = self.assistant.firm_name,
            jurisdiction = self.assistant.jurisdiction,
        );
        let user = format!(
            "AVAILABLE DOCUMENTS:\n{context}\n\nUSER'S QUESTION: \"{question}\"\n\nRESPONSE:"
        );
        vec![Message::system(system), Message::user(user)]
    }

    async fn generate(
        &self,
        messages: Vec<Message>,
    ) -> std::result::Result<(String, Option<Usage>), ProviderError> {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            max_tokens: self.max_tokens,
        };

        let response = tokio::time::timeout(self.timeout, self.provider.complete(request))
            .await
            .map_err(|_| {
                ProviderError::Timeout(format!(
                    "no response from {} within {}s",
                    self.provider.name(),
                    self.timeout.as_secs()
                ))
            })??;

        let text = response.message.content.trim();
        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok((text.to_string(), response.usage))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
