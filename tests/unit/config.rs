use super::*;

#[test]
fn empty_json_yields_defaults() {
    let cfg = SnapshotConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, SnapshotConfig::default());
    assert_eq!(cfg.capture.options(), CaptureOptions::default());
    assert!(cfg.show_user_input_labels);
    assert_eq!(cfg.activation_points, ActivationPointPolicy::WhenOverridden);
    assert_eq!(cfg.legend.minimum_width, 284.0);
}

#[test]
fn empty_palette_falls_back_to_seven_defaults() {
    let cfg = SnapshotConfig::default();
    assert_eq!(cfg.palette().len(), 7);
    assert_eq!(cfg.color_for(0), Color::rgb(0, 255, 255));
    assert_eq!(cfg.color_for(6), Color::rgb(255, 128, 0));
    assert_eq!(cfg.color_for(7), cfg.color_for(0));
}

#[test]
fn custom_palette_cycles_by_index() {
    let cfg = SnapshotConfig::from_json_str(
        r#"{ "palette": [ { "r": 1, "g": 2, "b": 3 }, { "r": 4, "g": 5, "b": 6, "a": 128 } ] }"#,
    )
    .unwrap();
    assert_eq!(cfg.color_for(0), Color::rgb(1, 2, 3));
    assert_eq!(cfg.color_for(1).a, 128);
    assert_eq!(cfg.color_for(2), Color::rgb(1, 2, 3));
}

#[test]
fn nested_sections_accept_partial_values() {
    let cfg = SnapshotConfig::from_json_str(
        r#"{
            "capture": { "mode": "context_render", "scale": 2.0,
                         "desaturation_limit": { "maximum": { "width": 1365, "height": 1365 } } },
            "activation_points": "always",
            "show_user_input_labels": false,
            "legend": { "minimum_width": 200.0 }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.capture.mode, RenderMode::ContextRender);
    assert_eq!(cfg.capture.scale, 2.0);
    assert_eq!(cfg.capture.max_tile_side, MAX_SURFACE_SIDE);
    assert_eq!(
        cfg.capture.options().desaturation_limit,
        Some(DesaturationLimit::LEGACY_FILTER)
    );
    assert_eq!(cfg.activation_points, ActivationPointPolicy::Always);
    assert!(!cfg.show_user_input_labels);
    assert_eq!(cfg.legend.minimum_width, 200.0);
    assert_eq!(cfg.legend.vertical_spacing, 16.0);
}

#[test]
fn rejects_unusable_values() {
    for json in [
        r#"{ "capture": { "scale": 0.0 } }"#,
        r#"{ "capture": { "max_tile_side": -1.0 } }"#,
        r#"{ "legend": { "vertical_spacing": -4.0 } }"#,
        r#"{ "legend": { "minimum_width": 0.0 } }"#,
    ] {
        let err = SnapshotConfig::from_json_str(json).unwrap_err();
        assert!(err.to_string().starts_with("validation error:"), "{json}");
    }
}

#[test]
fn malformed_json_is_a_validation_error() {
    let err = SnapshotConfig::from_json_str("{ not json").unwrap_err();
    assert!(err.to_string().contains("invalid config json"));
}

#[test]
fn missing_file_reports_the_path() {
    let err = SnapshotConfig::from_json_path(Path::new("/nonexistent/a11y-config.json"))
        .unwrap_err();
    assert!(format!("{err:#}").contains("a11y-config.json"));
}
