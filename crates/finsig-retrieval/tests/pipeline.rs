//! End-to-end retrieval pipeline test: HTTP embedder (wiremock), in-memory
//! index, and simulated generation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use finsig_index::{
    delete_document, index_document, ChunkingConfig, HttpEmbedder, MemoryIndex, VectorIndex,
};
use finsig_retrieval::{GenerationClient, Retriever, NO_MATCH_ANSWER};

/// Embedding mock: 2-dimensional vectors, axis picked by keyword, one
/// vector per input.
fn keyword_embedding_response(request: &Request) -> ResponseTemplate {
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    let vectors: Vec<Vec<f64>> = body["inputs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|input| {
            if input.as_str().unwrap_or_default().contains("revenue") {
                vec![1.0, 0.0]
            } else {
                vec![0.0, 1.0]
            }
        })
        .collect();
    ResponseTemplate::new(200).set_body_json(json!(vectors))
}

async fn embed_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embed"))
        .respond_with(keyword_embedding_response)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn index_then_query_then_delete_round_trip() {
    let server = embed_server().await;
    let embedder = Arc::new(HttpEmbedder::new(&server.uri(), 5).unwrap());
    let index = Arc::new(MemoryIndex::new(2));

    let text = "Total revenue reached $12.4B, up 9% year over year. \
                Operating expenses held steady across all segments.";
    let config = ChunkingConfig {
        chunk_size: 60,
        overlap: 10,
    };
    let indexed = index_document(
        embedder.as_ref(),
        index.as_ref(),
        7,
        text,
        &config,
        HashMap::new(),
    )
    .await
    .unwrap();
    assert!(indexed >= 2, "expected at least two chunks, got {indexed}");

    let retriever = Retriever::new(
        embedder,
        Arc::clone(&index) as Arc<dyn VectorIndex>,
        GenerationClient::simulated(),
        4,
        Duration::from_secs(5),
    );

    let result = retriever.query("what was revenue?", Some(7), None).await;
    assert_ne!(result.answer, NO_MATCH_ANSWER);
    assert!(result.context.contains("[Source 1]"));
    assert!(result.confidence.is_some());
    assert!(result.sources.iter().all(|s| s.document_id == 7));

    let removed = delete_document(index.as_ref(), 7).await;
    assert_eq!(removed, indexed);

    let after = retriever.query("what was revenue?", Some(7), None).await;
    assert_eq!(after.answer, NO_MATCH_ANSWER);
    assert!(after.sources.is_empty());
}
