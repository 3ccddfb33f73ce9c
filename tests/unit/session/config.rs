use super::*;
use rand::RngCore;

#[test]
fn empty_json_yields_defaults() {
    let cfg = RevealConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, RevealConfig::default());
    assert_eq!(cfg.tile_size, 18);
    assert_eq!(cfg.seed_count, 3);
    assert_eq!(cfg.idle_after_ms, 150);
    assert_eq!(cfg.queue.finish_threshold, FinishThreshold::Cells(30));
    cfg.validate().unwrap();
}

#[test]
fn partial_json_overrides_fields() {
    let json = r##"{
        "tile_size": 10,
        "seed": 7,
        "queue": { "finish_threshold": { "fraction": 0.01 } },
        "colors": { "overlay": "#112233" }
    }"##;
    let cfg = RevealConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.tile_size, 10);
    assert_eq!(cfg.seed, Some(7));
    assert_eq!(cfg.queue.radius, 5);
    assert_eq!(cfg.queue.finish_threshold, FinishThreshold::Fraction(0.01));
    assert_eq!(cfg.colors.overlay, ColorHex::rgb(0x11, 0x22, 0x33));
    assert_eq!(cfg.colors.rule, Palette::default().rule);
}

#[test]
fn unknown_fields_and_bad_colors_are_rejected() {
    assert!(RevealConfig::from_reader(r#"{"tile":3}"#.as_bytes()).is_err());
    let err = RevealConfig::from_reader(r#"{"colors":{"overlay":"white"}}"#.as_bytes())
        .unwrap_err();
    assert!(err.to_string().contains("serialization error"));
}

#[test]
fn validate_rejects_out_of_range_values() {
    let bad = [
        RevealConfig {
            tile_size: 0,
            ..RevealConfig::default()
        },
        RevealConfig {
            seed_band: 0.0,
            ..RevealConfig::default()
        },
        RevealConfig {
            spread: SpreadConfig {
                min_fanout: 6,
                max_fanout: 5,
            },
            ..RevealConfig::default()
        },
        RevealConfig {
            queue: QueueConfig {
                radius: 0,
                ..QueueConfig::default()
            },
            ..RevealConfig::default()
        },
        RevealConfig {
            queue: QueueConfig {
                grid_viewports: 0.5,
                ..QueueConfig::default()
            },
            ..RevealConfig::default()
        },
    ];
    for cfg in bad {
        assert!(cfg.validate().is_err(), "{cfg:?}");
    }
}

#[test]
fn seeded_rng_is_reproducible() {
    let cfg = RevealConfig {
        seed: Some(3),
        ..RevealConfig::default()
    };
    assert_eq!(cfg.rng().next_u64(), cfg.rng().next_u64());
}

#[test]
fn config_roundtrips_through_json() {
    let cfg = RevealConfig {
        seed: Some(1),
        ..RevealConfig::default()
    };
    let json = serde_json::to_string(&cfg).unwrap();
    assert!(json.contains("\"#5a688680\""));
    let back = RevealConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(back, cfg);
}
