use super::*;
use crate::embedding::backend::dot;

fn stub() -> MiniLmEmbedder {
    MiniLmEmbedder::load(MiniLmConfig::stub()).expect("stub embedder should load")
}

#[test]
fn test_stub_reports_mode_and_dim() {
    let embedder = stub();
    assert!(embedder.is_stub());
    assert_eq!(embedder.mode(), EmbedderMode::Stub);
    assert_eq!(embedder.embedding_dim(), MINILM_EMBEDDING_DIM);
}

#[test]
fn test_stub_embeddings_are_unit_length() {
    let embedder = stub();
    let vectors = embedder
        .embed(&["connect the repository to the tracker", "add retries"])
        .unwrap();

    assert_eq!(vectors.len(), 2);
    for v in &vectors {
        assert_eq!(v.len(), MINILM_EMBEDDING_DIM);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "norm was {}", norm);
    }
}

#[test]
fn test_stub_is_deterministic() {
    let embedder = stub();
    let a = embedder.embed_one("webhook signature validation").unwrap();
    let b = embedder.embed_one("webhook signature validation").unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_stub_is_case_and_punctuation_insensitive() {
    let embedder = stub();
    let a = embedder.embed_one("Fix LOGIN, timeout!").unwrap();
    let b = embedder.embed_one("fix login timeout").unwrap();
    assert!((dot(&a, &b) - 1.0).abs() < 1e-5);
}

#[test]
fn test_stub_lexical_overlap_ranks_higher() {
    let embedder = stub();
    let query = embedder
        .embed_one("payment gateway timeout handling")
        .unwrap();
    let close = embedder
        .embed_one("handle timeout in the payment gateway")
        .unwrap();
    let far = embedder.embed_one("update onboarding copy").unwrap();

    assert!(embedder.similarity(&query, &close) > embedder.similarity(&query, &far));
}

#[test]
fn test_stub_empty_text_is_zero_vector() {
    let embedder = stub();
    let v = embedder.embed_one("").unwrap();
    assert!(v.iter().all(|x| *x == 0.0));
}

#[test]
fn test_empty_batch_returns_empty() {
    let embedder = stub();
    assert!(embedder.embed(&[]).unwrap().is_empty());
}

#[test]
fn test_stub_custom_dimension() {
    let embedder = MiniLmEmbedder::load(MiniLmConfig::stub().with_embedding_dim(32)).unwrap();
    assert_eq!(embedder.embedding_dim(), 32);
    assert_eq!(embedder.embed_one("abc").unwrap().len(), 32);
}

#[test]
fn test_config_rejects_zero_seq_len() {
    let result = MiniLmEmbedder::load(MiniLmConfig::stub().with_max_seq_len(0));
    assert!(matches!(result, Err(EmbeddingError::InvalidConfig { .. })));
}

#[test]
fn test_config_requires_model_dir_without_stub() {
    let result = MiniLmEmbedder::load(MiniLmConfig::default());
    assert!(matches!(result, Err(EmbeddingError::InvalidConfig { .. })));
}

#[test]
fn test_missing_model_dir_is_not_found() {
    let result = MiniLmEmbedder::load(MiniLmConfig::new("/nonexistent/minilm"));
    assert!(matches!(result, Err(EmbeddingError::ModelNotFound { .. })));
}

#[test]
fn test_missing_model_files_reported() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.json"), "{}").unwrap();

    let config = MiniLmConfig::new(dir.path());
    assert_eq!(
        config.missing_file(),
        Some(dir.path().join("model.safetensors"))
    );

    let result = MiniLmEmbedder::load(config);
    match result {
        Err(EmbeddingError::ModelNotFound { path }) => {
            assert!(path.ends_with("model.safetensors"));
        }
        other => panic!("expected ModelNotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_load_failures_are_classified() {
    let err = MiniLmEmbedder::load(MiniLmConfig::new("/nonexistent/minilm"))
        .err()
        .expect("load should fail");
    assert!(err.is_load_failure());

    let runtime = EmbeddingError::OutputMismatch {
        expected: 3,
        actual: 2,
    };
    assert!(!runtime.is_load_failure());
    assert_eq!(
        runtime.to_string(),
        "embedding backend returned 2 vectors for 3 inputs"
    );
}

#[cfg(not(any(feature = "metal", feature = "cuda")))]
#[test]
fn test_cpu_build_selects_cpu_device() {
    assert!(matches!(
        crate::embedding::device::select_device(),
        candle_core::Device::Cpu
    ));
}
