pub mod chunker;
pub mod embed;
pub mod extract;
pub mod store;

use std::sync::Arc;

use crate::config::{EmbeddingsConfig, QdrantConfig};
use crate::errors::{TaskDeskError, TaskDeskResult};
use crate::llm::LlmClient;
use crate::pdf::embed::EmbeddingsClient;
use crate::pdf::store::QdrantStore;

const CHUNK_SIZE: usize = 1000;
const CHUNK_OVERLAP: usize = 200;
const TOP_K: usize = 5;

const QA_SYSTEM_PROMPT: &str = "You are a helpful assistant. Answer the user's question based \
only on the provided context.";

/// PDF ingestion and retrieval-augmented Q&A: extraction and chunking happen
/// locally, embedding, storage and answering are delegated to external
/// services.
pub struct PdfService {
    embeddings: EmbeddingsClient,
    store: QdrantStore,
    llm: Arc<LlmClient>,
}

#[derive(Debug)]
pub struct PdfAnswer {
    pub response: String,
    pub context: String,
    pub chunks_found: usize,
}

impl PdfService {
    pub fn new(
        embeddings: &EmbeddingsConfig,
        qdrant: &QdrantConfig,
        llm: Arc<LlmClient>,
    ) -> Self {
        Self {
            embeddings: EmbeddingsClient::new(embeddings),
            store: QdrantStore::new(qdrant),
            llm,
        }
    }

    /// Extract, chunk, embed, upsert. Returns the number of chunks added.
    pub async fn ingest(&self, filename: &str, bytes: &[u8]) -> TaskDeskResult<usize> {
        tracing::info!(filename, size = bytes.len(), "processing upload");
        let text = extract::extract_text(bytes)?;
        let chunks = chunker::split_text(&text, CHUNK_SIZE, CHUNK_OVERLAP);
        if chunks.is_empty() {
            return Err(TaskDeskError::Pdf(format!(
                "no extractable text in {filename}"
            )));
        }

        let vectors = self.embeddings.embed(&chunks).await?;
        let vector_size = vectors
            .first()
            .map(Vec::len)
            .ok_or_else(|| TaskDeskError::Pdf("embeddings returned no vectors".to_string()))?;
        self.store.ensure_collection(vector_size).await?;
        self.store.upsert_chunks(&chunks, &vectors).await?;

        tracing::info!(filename, chunks = chunks.len(), "pdf ingested");
        Ok(chunks.len())
    }

    /// Embed the question, fetch the nearest chunks, answer from them.
    pub async fn answer(&self, question: &str) -> TaskDeskResult<PdfAnswer> {
        tracing::info!(question, "processing search query");
        let vector = self
            .embeddings
            .embed(&[question.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TaskDeskError::Pdf("embeddings returned no vectors".to_string()))?;

        let chunks = self.store.search(&vector, TOP_K).await?;
        let context = chunks.join("\n");
        tracing::info!(chunks = chunks.len(), "found relevant chunks");

        let response = self
            .llm
            .chat(
                QA_SYSTEM_PROMPT,
                &format!("Context:\n{context}\n\nQuestion: {question}"),
            )
            .await?;

        Ok(PdfAnswer {
            response,
            context,
            chunks_found: chunks.len(),
        })
    }
}
