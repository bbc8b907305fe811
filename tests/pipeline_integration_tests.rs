//! Pipeline integration tests
//!
//! Runs whole generation passes through the public API: block JSON in,
//! attributes and trait metadata out.

use blockness::core::{Scene, TraitValue};
use blockness::{ArtError, Block, Pipeline, Style, StyleConfig};
use std::fs;
use tempfile::tempdir;

const BLOCK_JSON: &str = r#"{
    "hash": "0xc0ffee254729296a45a3885639ac7e10f9d54979fd2e6fbb5c03db88b2f8e4a1",
    "number": "0xe4e1c0",
    "timestamp": "0x6217fd73",
    "nonce": "0x4d7b23a1c6f8e902",
    "difficulty": "0x2f1d8c4b3e6a",
    "gasLimit": "0x01c9c380",
    "gasUsed": "0x0e4f2a",
    "miner": "0x829bd824b016326a401d083b33d092293333a830",
    "extraData": "0x",
    "transactions": [
        {
            "hash": "0x5e1f0c3a8b7d6e2f4a9c0b1d3e5f7a2c4b6d8e0f1a3c5e7b9d2f4a6c8e0b1d3f",
            "gasPrice": "0x04a817c800",
            "gasLimit": "0x5208",
            "value": "0x2386f26fc10000",
            "nonce": "0x11",
            "data": "0x"
        },
        {
            "hash": "0xa2b4c6d8e0f1a3b5c7d9e1f2a4b6c8d0e2f3a5b7c9d1e3f4a6b8c0d2e4f5a7b9",
            "gasPrice": "0x0df8475800",
            "gasLimit": "0x0186a0",
            "value": "0x00",
            "nonce": "0x02",
            "data": "0x095ea7b3"
        },
        {
            "hash": "0x0f1e2d3c4b5a69788796a5b4c3d2e1f00f1e2d3c4b5a69788796a5b4c3d2e1f0",
            "gasPrice": "0x0ba43b7400",
            "gasLimit": "0x030d40",
            "value": "0x016345785d8a0000",
            "nonce": "0x0100",
            "data": "0x"
        }
    ]
}"#;

const EMPTY_BLOCK_JSON: &str = r#"{
    "hash": "0x00000000000000000000000000000000000000000000000000000000000000ff",
    "number": 1,
    "timestamp": 1438269988,
    "nonce": "0x0",
    "difficulty": 17171480576,
    "gasLimit": 5000,
    "gasUsed": 0,
    "miner": "0x05a56e2d52c817161883f50c441c3228cfe54d9f",
    "transactions": []
}"#;

fn block() -> Block {
    Block::from_json(BLOCK_JSON).unwrap()
}

#[test]
fn test_same_block_same_metadata_for_every_style() {
    for style in Style::ALL {
        let first = Pipeline::new(StyleConfig::preset(style)).unwrap();
        let second = Pipeline::new(StyleConfig::preset(style)).unwrap();

        let a = serde_json::to_string(&first.recompute(&block()).unwrap().metadata().unwrap())
            .unwrap();
        let b = serde_json::to_string(&second.recompute(&block()).unwrap().metadata().unwrap())
            .unwrap();
        assert_eq!(a, b, "style {style}");
    }
}

#[test]
fn test_block_statistics() {
    let generation = Pipeline::new(StyleConfig::default())
        .unwrap()
        .recompute(&block())
        .unwrap();
    let stats = &generation.analysis().tx_stats;

    // 20, 60 and 50 gwei
    assert_eq!(stats.highest.gas_price.to_string(), "60000000000");
    assert_eq!(stats.lowest.gas_price.to_string(), "20000000000");
    assert_eq!(stats.average.gas_price.to_string(), "43333333333");
    assert_eq!(stats.highest.nonce.to_string(), "256");
    // a zero value resets the running minimum, so the later 0.1 ether wins
    assert_eq!(stats.lowest.value.to_string(), "100000000000000000");
    assert_eq!(generation.analysis().tx_count(), 3);
}

#[test]
fn test_space_traits_export() {
    let generation = Pipeline::new(StyleConfig::preset(Style::Space))
        .unwrap()
        .recompute(&block())
        .unwrap();
    let metadata = serde_json::to_value(generation.metadata().unwrap()).unwrap();
    let attributes = metadata["attributes"].as_array().unwrap();

    let names: Vec<&str> = attributes
        .iter()
        .map(|record| record["trait_type"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Magic", "Charm", "Luck", "Deepness", "Force", "Glow"]);

    assert_eq!(attributes[0]["display_type"], "number");
    assert!(attributes[4].get("display_type").is_none());
    assert_eq!(attributes[5]["value"], "#F70966");
}

#[test]
fn test_empty_block_generates() {
    let block = Block::from_json(EMPTY_BLOCK_JSON).unwrap();
    for style in Style::ALL {
        let generation = Pipeline::new(StyleConfig::preset(style))
            .unwrap()
            .recompute(&block)
            .unwrap();
        assert!(!generation.attributes().is_empty());
        assert!(generation.metadata().is_ok());
    }

    let generation = Pipeline::new(StyleConfig::preset(Style::Space))
        .unwrap()
        .recompute(&block)
        .unwrap();
    assert_eq!(
        generation.attributes().get("force"),
        Some(&TraitValue::from("Calm"))
    );
}

#[test]
fn test_malformed_quantity_fails_the_pass() {
    let text = BLOCK_JSON.replace("\"0x2386f26fc10000\"", "\"0x23z6\"");
    let block = Block::from_json(&text).unwrap();
    let result = Pipeline::new(StyleConfig::default()).unwrap().recompute(&block);

    match result {
        Err(ArtError::Parse(message)) => assert!(message.contains("transactions[0].value")),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_harbor_scene_covers_every_transaction() {
    let generation = Pipeline::new(StyleConfig::preset(Style::Harbor))
        .unwrap()
        .recompute(&block())
        .unwrap();
    let Scene::Harbor(scene) = generation.scene() else {
        panic!("expected a harbor scene");
    };
    assert_eq!(scene.ships.len(), 3);
    assert_eq!(
        generation.attributes().get("ships"),
        Some(&TraitValue::from(3usize))
    );
}

#[test]
fn test_batch_from_files() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    fs::write(&first, BLOCK_JSON).unwrap();
    fs::write(&second, EMPTY_BLOCK_JSON).unwrap();

    let blocks = vec![Block::load(&first).unwrap(), Block::load(&second).unwrap()];
    let pipeline = Pipeline::new(StyleConfig::preset(Style::Knots)).unwrap();
    let batch = pipeline.generate_batch(&blocks).unwrap();

    assert_eq!(batch.len(), 2);
    assert_eq!(
        batch[0].attributes(),
        pipeline.recompute(&blocks[0]).unwrap().attributes()
    );
}

#[test]
fn test_config_file_drives_pipeline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("style.toml");
    fs::write(&path, "style = \"knots\"\nmods = [0.2, 0.5, 0.25]\n").unwrap();

    let config = StyleConfig::load(&path).unwrap();
    let generation = Pipeline::new(config).unwrap().recompute(&block()).unwrap();
    let Scene::Knots(scene) = generation.scene() else {
        panic!("expected a knots scene");
    };
    assert_eq!(scene.rotation_y, 0.5);
    assert_eq!(scene.offsets.len(), 3);
}
