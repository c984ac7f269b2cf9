use super::*;
use crate::constants::{ENCODER_HIDDEN_DIM, MAX_SEQ_LEN};
use std::path::PathBuf;

mod config_tests {
    use super::*;

    #[test]
    fn test_encoder_config_default() {
        let config = EncoderConfig::default();
        assert_eq!(config.max_seq_len, MAX_SEQ_LEN);
        assert_eq!(config.hidden_size, ENCODER_HIDDEN_DIM);
        assert!(!config.testing_stub);
        assert!(config.model_dir.as_os_str().is_empty());
    }

    #[test]
    fn test_encoder_config_stub_validates() {
        assert!(EncoderConfig::stub().validate().is_ok());
    }

    #[test]
    fn test_stub_zero_hidden_size_rejected() {
        let config = EncoderConfig {
            hidden_size: 0,
            ..EncoderConfig::stub()
        };
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_zero_max_seq_len_rejected() {
        let config = EncoderConfig {
            max_seq_len: 0,
            ..EncoderConfig::stub()
        };
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_missing_model_files_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = EncoderConfig::new(dir.path().join("bert-model"), dir.path());

        match config.validate() {
            Err(EmbeddingError::ModelNotFound { path }) => {
                assert!(path.ends_with("config.json"));
            }
            other => panic!("expected ModelNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_tokenizer_reported() {
        let dir = tempfile::tempdir().unwrap();
        let model_dir = dir.path().join("bert-model");
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(model_dir.join("config.json"), "{}").unwrap();
        std::fs::write(model_dir.join("model.safetensors"), b"").unwrap();

        let tokenizer_dir = dir.path().join("bert-tokenizer");
        std::fs::create_dir_all(&tokenizer_dir).unwrap();

        let config = EncoderConfig::new(&model_dir, &tokenizer_dir);
        match config.validate() {
            Err(EmbeddingError::ModelNotFound { path }) => {
                assert_eq!(path, tokenizer_dir.join("tokenizer.json"));
            }
            other => panic!("expected ModelNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_tokenizer_file_accepts_explicit_file() {
        let config = EncoderConfig::new("/m", "/t/tokenizer.json");
        assert_eq!(config.tokenizer_file(), PathBuf::from("/t/tokenizer.json"));
    }

    #[test]
    fn test_load_rejects_corrupt_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "not json").unwrap();
        std::fs::write(dir.path().join("model.safetensors"), b"garbage").unwrap();
        std::fs::write(dir.path().join("tokenizer.json"), "not json either").unwrap();

        let err = BertEncoder::load(EncoderConfig::new(dir.path(), dir.path())).unwrap_err();
        assert!(matches!(err, EmbeddingError::ModelLoadFailed { .. }));
    }
}

mod stub_tests {
    use super::*;

    fn stub() -> BertEncoder {
        BertEncoder::load(EncoderConfig::stub()).expect("stub loads")
    }

    #[test]
    fn test_stub_reports_mode() {
        let encoder = stub();
        assert!(encoder.is_stub());
        assert_eq!(encoder.hidden_size(), ENCODER_HIDDEN_DIM);
        assert!(format!("{:?}", encoder).contains("Stub"));
    }

    #[test]
    fn test_stub_embedding_has_hidden_width() {
        let embedding = stub().embed("essay great").unwrap();
        assert_eq!(embedding.len(), ENCODER_HIDDEN_DIM);
        assert!(embedding.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_stub_is_deterministic() {
        let encoder = stub();
        assert_eq!(
            encoder.embed("essay great").unwrap(),
            encoder.embed("essay great").unwrap()
        );
    }

    #[test]
    fn test_stub_distinguishes_texts() {
        let encoder = stub();
        assert_ne!(
            encoder.embed("essay great").unwrap(),
            encoder.embed("essay poor").unwrap()
        );
    }

    #[test]
    fn test_empty_text_yields_zero_vector() {
        let embedding = stub().embed("").unwrap();
        assert_eq!(embedding.len(), ENCODER_HIDDEN_DIM);
        assert!(embedding.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_tokenize_truncates_to_max_seq_len() {
        let encoder = BertEncoder::load(EncoderConfig {
            max_seq_len: 4,
            ..EncoderConfig::stub()
        })
        .unwrap();

        let ids = encoder.tokenize("one two three four five six").unwrap();
        assert_eq!(ids.len(), 4);
        assert!(ids.iter().all(|&id| id >= 1000));
    }

    #[test]
    fn test_custom_hidden_size() {
        let encoder = BertEncoder::load(EncoderConfig {
            hidden_size: 16,
            ..EncoderConfig::stub()
        })
        .unwrap();
        assert_eq!(encoder.embed("word").unwrap().len(), 16);
    }
}

mod model_tests {
    use super::*;
    use crate::embedding::bert::{BertEncoderModel, CONFIG_FILE, WEIGHTS_FILE};
    use crate::embedding::device::select_device;
    use crate::embedding::utils::TOKENIZER_FILE;
    use candle_core::{DType, Device, Tensor};
    use candle_nn::{VarBuilder, VarMap};
    use candle_transformers::models::bert::{BertModel, Config};
    use std::collections::HashMap;
    use std::path::Path;

    const CLS_ID: u32 = 2;
    const SEP_ID: u32 = 3;
    const HIDDEN: usize = 8;

    const BERT_CONFIG: &str = r#"{
        "vocab_size": 10,
        "hidden_size": 8,
        "num_hidden_layers": 1,
        "num_attention_heads": 2,
        "intermediate_size": 16,
        "hidden_act": "gelu",
        "hidden_dropout_prob": 0.0,
        "max_position_embeddings": 512,
        "type_vocab_size": 2,
        "initializer_range": 0.02,
        "layer_norm_eps": 1e-12,
        "pad_token_id": 0,
        "position_embedding_type": "absolute",
        "classifier_dropout": null,
        "model_type": null
    }"#;

    const TOKENIZER: &str = r#"{
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": null,
        "pre_tokenizer": {"type": "WhitespaceSplit"},
        "post_processor": {
            "type": "TemplateProcessing",
            "single": [
                {"SpecialToken": {"id": "[CLS]", "type_id": 0}},
                {"Sequence": {"id": "A", "type_id": 0}},
                {"SpecialToken": {"id": "[SEP]", "type_id": 0}}
            ],
            "pair": [
                {"SpecialToken": {"id": "[CLS]", "type_id": 0}},
                {"Sequence": {"id": "A", "type_id": 0}},
                {"SpecialToken": {"id": "[SEP]", "type_id": 0}},
                {"Sequence": {"id": "B", "type_id": 1}},
                {"SpecialToken": {"id": "[SEP]", "type_id": 1}}
            ],
            "special_tokens": {
                "[CLS]": {"id": "[CLS]", "ids": [2], "tokens": ["[CLS]"]},
                "[SEP]": {"id": "[SEP]", "ids": [3], "tokens": ["[SEP]"]}
            }
        },
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": {
                "[PAD]": 0, "[UNK]": 1, "[CLS]": 2, "[SEP]": 3,
                "essay": 4, "good": 5, "argument": 6, "student": 7, "write": 8, "clear": 9
            },
            "unk_token": "[UNK]"
        }
    }"#;

    /// Writes a one-layer BERT with randomly initialized weights plus a
    /// word-level tokenizer into `dir`.
    fn write_tiny_bert(dir: &Path) {
        let config: Config = serde_json::from_str(BERT_CONFIG).unwrap();
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        BertModel::load(vb, &config).unwrap();

        varmap.save(dir.join(WEIGHTS_FILE)).unwrap();
        std::fs::write(dir.join(CONFIG_FILE), BERT_CONFIG).unwrap();
        std::fs::write(dir.join(TOKENIZER_FILE), TOKENIZER).unwrap();
    }

    /// Copies the model in `src` to `dst` with every tensor under `bert.`.
    fn write_prefixed_copy(src: &Path, dst: &Path) {
        let tensors = candle_core::safetensors::load(src.join(WEIGHTS_FILE), &Device::Cpu).unwrap();
        let prefixed: HashMap<String, Tensor> = tensors
            .into_iter()
            .map(|(name, tensor)| (format!("bert.{}", name), tensor))
            .collect();
        candle_core::safetensors::save(&prefixed, dst.join(WEIGHTS_FILE)).unwrap();
        std::fs::copy(src.join(CONFIG_FILE), dst.join(CONFIG_FILE)).unwrap();
    }

    fn load_encoder(model_dir: &Path, tokenizer_dir: &Path) -> BertEncoder {
        BertEncoder::load(EncoderConfig::new(model_dir, tokenizer_dir)).unwrap()
    }

    /// Mean over the sequence axis of the raw encoder output.
    fn reference_mean(model_dir: &Path, token_ids: &[u32]) -> Vec<f32> {
        let device = select_device();
        let model = BertEncoderModel::load(model_dir, &device).unwrap();
        let input_ids = Tensor::new(token_ids, &device).unwrap().unsqueeze(0).unwrap();
        let token_type_ids = input_ids.zeros_like().unwrap();
        let mask = input_ids.ones_like().unwrap();

        let hidden_states = model
            .forward(&input_ids, &token_type_ids, Some(&mask))
            .unwrap();
        assert_eq!(hidden_states.dims(), &[1, token_ids.len(), HIDDEN]);

        hidden_states
            .mean(1)
            .unwrap()
            .squeeze(0)
            .unwrap()
            .to_vec1::<f32>()
            .unwrap()
    }

    fn assert_close(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-5, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_loads_real_backend() {
        let dir = tempfile::tempdir().unwrap();
        write_tiny_bert(dir.path());

        let encoder = load_encoder(dir.path(), dir.path());

        assert!(!encoder.is_stub());
        assert_eq!(encoder.hidden_size(), HIDDEN);
        assert!(format!("{:?}", encoder).contains("Model"));
    }

    #[test]
    fn test_empty_text_is_cls_sep() {
        let dir = tempfile::tempdir().unwrap();
        write_tiny_bert(dir.path());
        let encoder = load_encoder(dir.path(), dir.path());

        assert_eq!(encoder.tokenize("").unwrap(), vec![CLS_ID, SEP_ID]);

        // The special tokens still run through the model.
        let embedding = encoder.embed("").unwrap();
        assert_eq!(embedding.len(), HIDDEN);
        assert!(embedding.iter().any(|v| *v != 0.0));
        assert_close(&embedding, &reference_mean(dir.path(), &[CLS_ID, SEP_ID]));
    }

    #[test]
    fn test_tokenize_maps_words_and_unknowns() {
        let dir = tempfile::tempdir().unwrap();
        write_tiny_bert(dir.path());
        let encoder = load_encoder(dir.path(), dir.path());

        assert_eq!(
            encoder.tokenize("student write essay zebra").unwrap(),
            vec![CLS_ID, 7, 8, 4, 1, SEP_ID]
        );
    }

    #[test]
    fn test_long_text_truncates_to_max_seq_len() {
        let dir = tempfile::tempdir().unwrap();
        write_tiny_bert(dir.path());
        let encoder = load_encoder(dir.path(), dir.path());

        let text = ["good essay clear argument"; 1000].join(" ");
        let ids = encoder.tokenize(&text).unwrap();

        assert_eq!(ids.len(), MAX_SEQ_LEN);
        assert_eq!(ids[0], CLS_ID);
        assert_eq!(ids[MAX_SEQ_LEN - 1], SEP_ID);
        assert!(ids[1..MAX_SEQ_LEN - 1].iter().all(|&id| (4..=9).contains(&id)));

        let embedding = encoder.embed(&text).unwrap();
        assert_eq!(embedding.len(), HIDDEN);
        assert!(embedding.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_embedding_is_mean_of_token_states() {
        let dir = tempfile::tempdir().unwrap();
        write_tiny_bert(dir.path());
        let encoder = load_encoder(dir.path(), dir.path());

        let text = "good student write clear essay";
        let ids = encoder.tokenize(text).unwrap();
        let embedding = encoder.embed(text).unwrap();

        assert_close(&embedding, &reference_mean(dir.path(), &ids));
        assert_ne!(embedding, encoder.embed("argument").unwrap());
    }

    #[test]
    fn test_prefixed_weights_give_same_embedding() {
        let bare = tempfile::tempdir().unwrap();
        let prefixed = tempfile::tempdir().unwrap();
        write_tiny_bert(bare.path());
        write_prefixed_copy(bare.path(), prefixed.path());

        let tokenizer = bare.path().join(TOKENIZER_FILE);
        let bare_encoder = load_encoder(bare.path(), &tokenizer);
        let prefixed_encoder = load_encoder(prefixed.path(), &tokenizer);

        let text = "clear argument good essay";
        assert_close(
            &prefixed_encoder.embed(text).unwrap(),
            &bare_encoder.embed(text).unwrap(),
        );
    }

    #[test]
    fn test_missing_tokenizer_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_tiny_bert(dir.path());
        std::fs::remove_file(dir.path().join(TOKENIZER_FILE)).unwrap();

        let err = BertEncoder::load(EncoderConfig::new(dir.path(), dir.path())).unwrap_err();
        assert!(matches!(err, EmbeddingError::ModelNotFound { .. }));
    }
}
