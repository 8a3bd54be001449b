use super::*;
use crate::foundation::core::Rgb8;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("keeperviz_cfg_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn empty_document_yields_defaults() {
    let cfg = OverlayConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, OverlayConfig::default());
    assert_eq!(cfg.detection.reference_color, Rgb8::new(220, 220, 220));
    assert_eq!(cfg.detection.threshold, 5);
    assert_eq!(cfg.detection.close_kernel, 7);
    assert!(!cfg.guides.enabled);
}

#[test]
fn partial_sections_keep_other_defaults() {
    let cfg = OverlayConfig::from_json_str(
        r#"{
            "detection": { "threshold": 3 },
            "animation": { "speed": 1.0 },
            "guides": { "enabled": true, "labels": { "left": "L" } }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.detection.threshold, 3);
    assert_eq!(cfg.detection.close_kernel, 7);
    assert_eq!(cfg.animation.speed, 1.0);
    assert_eq!(cfg.animation.y_offset_fraction, 0.25);
    assert!(cfg.guides.enabled);
    assert_eq!(cfg.guides.labels.left.as_deref(), Some("L"));
    assert_eq!(cfg.guides.labels.right, None);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = OverlayConfig::from_json_str(r#"{ "detection": { "treshold": 3 } }"#).unwrap_err();
    assert!(matches!(err, KeeperError::Serde(_)));
}

#[test]
fn out_of_range_values_fail_validation() {
    let err = OverlayConfig::from_json_str(r#"{ "animation": { "speed": 0.0 } }"#).unwrap_err();
    assert!(matches!(err, KeeperError::Validation(_)));
    let err =
        OverlayConfig::from_json_str(r#"{ "detection": { "close_kernel": 6 } }"#).unwrap_err();
    assert!(matches!(err, KeeperError::Validation(_)));
}

#[test]
fn from_path_reads_file_and_reports_missing_file() {
    let dir = temp_dir("from_path");
    let path = dir.join("overlay.json");
    std::fs::write(&path, r#"{ "animation": { "y_offset_fraction": 0.1 } }"#).unwrap();
    let cfg = OverlayConfig::from_path(&path).unwrap();
    assert_eq!(cfg.animation.y_offset_fraction, 0.1);

    let err = OverlayConfig::from_path(&dir.join("missing.json")).unwrap_err();
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn prediction_sidecar_sits_next_to_video() {
    let p = prediction_sidecar_path(Path::new("/clips/penalty_07.mp4"));
    assert_eq!(p, PathBuf::from("/clips/penalty_07_prediction.txt"));
}

#[test]
fn read_prediction_trims_and_tolerates_missing_file() {
    let dir = temp_dir("prediction");
    let path = dir.join("kick_prediction.txt");
    assert_eq!(read_prediction(&path).unwrap(), None);

    std::fs::write(&path, "  Right\n").unwrap();
    assert_eq!(read_prediction(&path).unwrap().as_deref(), Some("Right"));
}
