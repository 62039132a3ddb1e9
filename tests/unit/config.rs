use super::*;

#[test]
fn defaults_match_the_documented_values() {
    let cfg = AppConfig::default();
    assert_eq!(cfg.tick_interval(), Duration::from_millis(100));
    assert_eq!(cfg.stream_idle(), Duration::from_millis(100));
    assert_eq!(cfg.model, ModelVariant::SeparableFloat);
    assert_eq!(cfg.device, Device::Cpu);
    assert!(!cfg.start_paused);
    assert_eq!(cfg.max_upload_bytes, 32 * 1024 * 1024);
    cfg.validate().unwrap();
}

#[test]
fn partial_json_keeps_defaults_for_missing_keys() {
    let json = r#"{
        "model": "standard-half",
        "tick_interval_ms": 40,
        "seed": 7,
        "driver": { "blink_probability": 0.1 },
        "converter": { "wink_mode": "relaxed" }
    }"#;
    let cfg = AppConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.model, ModelVariant::StandardHalf);
    assert_eq!(cfg.tick_interval_ms, 40);
    assert_eq!(cfg.seed, Some(7));
    assert_eq!(cfg.driver.blink_probability, 0.1);
    assert_eq!(cfg.driver.jaw_steps, 5000);
    assert_eq!(
        cfg.converter.wink_mode,
        crate::convert::converter::WinkMode::Relaxed
    );
    assert_eq!(cfg.stream_idle_ms, 100);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = AppConfig::from_reader(r#"{ "tick": 5 }"#.as_bytes()).unwrap_err();
    assert!(matches!(err, PosecastError::Validation(_)));
}

#[test]
fn zero_interval_is_rejected() {
    let err = AppConfig::from_reader(r#"{ "tick_interval_ms": 0 }"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("tick_interval_ms"));
}

#[test]
fn out_of_range_blink_probability_is_rejected() {
    let cfg = AppConfig {
        driver: DriverOpts {
            blink_probability: 1.5,
            ..DriverOpts::default()
        },
        ..AppConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn missing_file_is_a_validation_error() {
    let err = AppConfig::from_path("/nonexistent/posecast.json").unwrap_err();
    assert!(matches!(err, PosecastError::Validation(_)));
}

#[test]
fn zero_upload_limit_is_rejected() {
    let err = AppConfig::from_reader(r#"{ "max_upload_bytes": 0 }"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("max_upload_bytes"));
}
