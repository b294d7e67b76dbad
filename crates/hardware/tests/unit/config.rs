//! # Configuration Tests
//!
//! Defaults, JSON deserialization, command-line geometry parsing and validation.

use cachesim_core::Hierarchy;
use cachesim_core::cache::LevelId;
use cachesim_core::common::ConfigError;
use cachesim_core::config::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_hierarchy_config_default() {
    let config = HierarchyConfig::default();
    assert_eq!(config.icache, CacheConfig::new(128, 2, 1));
    assert_eq!(config.dcache, CacheConfig::new(128, 2, 1));
    assert_eq!(config.l2, CacheConfig::new(512, 8, 10));
    assert_eq!(config.block_size, 64);
    assert_eq!(config.memory_latency, 100);
    assert!(!config.inclusive);
    assert!(config.validate().is_ok());
}

#[test]
fn test_json_full_document() {
    let json = r#"{
        "icache": { "sets": 64, "ways": 1, "hit_time": 2 },
        "dcache": { "sets": 32, "ways": 4, "hit_time": 3 },
        "l2": { "sets": 1024, "ways": 16, "hit_time": 20 },
        "block_size": 32,
        "memory_latency": 250,
        "inclusive": true
    }"#;
    let config = match HierarchyConfig::from_json(json) {
        Ok(c) => c,
        Err(e) => panic!("{e}"),
    };
    assert_eq!(config.icache, CacheConfig::new(64, 1, 2));
    assert_eq!(config.dcache, CacheConfig::new(32, 4, 3));
    assert_eq!(config.l2, CacheConfig::new(1024, 16, 20));
    assert_eq!(config.block_size, 32);
    assert_eq!(config.memory_latency, 250);
    assert!(config.inclusive);
}

#[test]
fn test_json_empty_document_uses_defaults() {
    let config = HierarchyConfig::from_json("{}").ok();
    assert_eq!(config, Some(HierarchyConfig::default()));
}

#[test]
fn test_json_partial_level_fills_missing_fields() {
    let config = HierarchyConfig::from_json(r#"{ "dcache": { "ways": 8 } }"#).ok();
    assert_eq!(config.map(|c| c.dcache), Some(CacheConfig::new(128, 8, 1)));
}

#[test]
fn test_json_negative_latency_rejected() {
    let err = HierarchyConfig::from_json(r#"{ "memory_latency": -5 }"#);
    assert!(matches!(err, Err(ConfigError::Json(_))));
}

#[test]
fn test_json_invalid_geometry_rejected() {
    let err = HierarchyConfig::from_json(r#"{ "l2": { "sets": 100 } }"#);
    assert!(matches!(
        err,
        Err(ConfigError::SetsNotPowerOfTwo {
            level: LevelId::Unified,
            sets: 100
        })
    ));
}

#[rstest]
#[case("256:4:2", CacheConfig::new(256, 4, 2))]
#[case("1:0:1", CacheConfig::new(1, 0, 1))]
#[case(" 8 : 2 : 10 ", CacheConfig::new(8, 2, 10))]
fn test_geometry_parses(#[case] text: &str, #[case] expected: CacheConfig) {
    assert_eq!(text.parse::<CacheConfig>().ok(), Some(expected));
}

#[rstest]
#[case("256:4")]
#[case("256:4:2:1")]
#[case("a:b:c")]
#[case("-1:1:1")]
#[case("")]
fn test_geometry_rejects(#[case] text: &str) {
    assert!(matches!(
        text.parse::<CacheConfig>(),
        Err(ConfigError::Geometry(_))
    ));
}

#[test]
fn test_zero_ways_is_effectively_one() {
    assert_eq!(CacheConfig::new(4, 0, 1).effective_ways(), 1);
    assert_eq!(CacheConfig::new(4, 3, 1).effective_ways(), 3);
}

#[rstest]
#[case(0)]
#[case(3)]
#[case(48)]
fn test_block_size_must_be_power_of_two(#[case] block_size: u32) {
    let config = HierarchyConfig {
        block_size,
        ..HierarchyConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::BlockSizeNotPowerOfTwo(b)) if b == block_size
    ));
}

#[rstest]
#[case(LevelId::Instruction)]
#[case(LevelId::Data)]
#[case(LevelId::Unified)]
fn test_each_level_sets_checked(#[case] id: LevelId) {
    let mut config = HierarchyConfig::default();
    let bad = CacheConfig::new(0, 1, 1);
    match id {
        LevelId::Instruction => config.icache = bad,
        LevelId::Data => config.dcache = bad,
        LevelId::Unified => config.l2 = bad,
    }
    assert!(matches!(
        config.validate(),
        Err(ConfigError::SetsNotPowerOfTwo { level, sets: 0 }) if level == id
    ));
}

#[test]
fn test_negative_tag_width_rejected() {
    let config = HierarchyConfig {
        l2: CacheConfig::new(1 << 24, 1, 10),
        block_size: 1 << 10,
        ..HierarchyConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::TagWidthNegative {
            level: LevelId::Unified,
            index_bits: 24,
            offset_bits: 10,
        })
    ));
}

#[rstest]
#[case(CacheConfig::new(1, u32::MAX, 1), 1, u32::MAX)]
#[case(CacheConfig::new(1 << 31, 1, 1), 1 << 31, 1)]
#[case(CacheConfig::new(1 << 20, 128, 1), 1 << 20, 128)]
fn test_oversized_level_rejected(#[case] l1: CacheConfig, #[case] sets: u32, #[case] ways: u32) {
    let config = HierarchyConfig {
        icache: l1,
        block_size: 1,
        ..HierarchyConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Capacity { level: LevelId::Instruction, sets: s, ways: w })
            if s == sets && w == ways
    ));
    assert!(matches!(
        Hierarchy::new(&config),
        Err(ConfigError::Capacity { .. })
    ));
}

#[test]
fn test_capacity_limit_is_inclusive() {
    let at_limit = HierarchyConfig {
        l2: CacheConfig::new(1 << 16, 1 << 10, 10),
        block_size: 1,
        ..HierarchyConfig::default()
    };
    assert_eq!(MAX_LINES, 1 << 26);
    assert!(at_limit.validate().is_ok());

    let over = HierarchyConfig {
        l2: CacheConfig::new(1 << 16, (1 << 10) + 1, 10),
        ..at_limit
    };
    assert!(matches!(
        over.validate(),
        Err(ConfigError::Capacity { level: LevelId::Unified, .. })
    ));
}

#[test]
fn test_layout_matches_geometry() {
    let config = HierarchyConfig::default();
    let layout = config.layout(LevelId::Unified).ok();
    assert_eq!(layout.map(|l| (l.index_bits(), l.offset_bits(), l.tag_bits())), Some((9, 6, 17)));
}

#[test]
fn test_error_messages() {
    let err = ConfigError::SetsNotPowerOfTwo {
        level: LevelId::Data,
        sets: 6,
    };
    assert_eq!(err.to_string(), "L1-D set count 6 is not a power of two");
    assert_eq!(
        ConfigError::BlockSizeNotPowerOfTwo(0).to_string(),
        "block size 0 is not a power of two"
    );
    assert_eq!(
        ConfigError::Capacity {
            level: LevelId::Unified,
            sets: 1 << 20,
            ways: 128,
        }
        .to_string(),
        "L2 with 1048576 sets x 128 ways exceeds the per-level line limit"
    );
}
