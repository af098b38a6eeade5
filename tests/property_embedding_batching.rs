//! Property-based tests for batched embedding
//!
//! For any input size and batch size, the service returns exactly one vector
//! per input, in input order, identical to embedding each text on its own.

use std::sync::Arc;

use proptest::prelude::*;
use ragline::adapters::embeddings::LexicalEmbeddingProvider;
use ragline::services::EmbeddingService;

fn texts_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::string::string_regex("[a-z ]{0,40}").expect("Valid regex"),
        0..120,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn proptest_batching_preserves_order(texts in texts_strategy(), batch_size in 1usize..60) {
        let provider = Arc::new(LexicalEmbeddingProvider::new(64).unwrap());
        let service = EmbeddingService::new(provider.clone(), batch_size).unwrap();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let vectors = runtime.block_on(service.embed_documents(&texts)).unwrap();

        prop_assert_eq!(vectors.len(), texts.len());
        for (text, vector) in texts.iter().zip(&vectors) {
            prop_assert_eq!(vector, &provider.embed_text(text));
        }
    }
}
