use vid_cli::{probe, ProbeRequest};

#[test]
fn lists_modes_without_setting_one() {
    let report = probe(&ProbeRequest {
        bpp: 16,
        ..Default::default()
    })
    .unwrap();

    assert_eq!(report["driver"], "libogc");
    assert_eq!(report["native_bpp"], 16);
    assert_eq!(report["modes"], serde_json::json!(["640x480", "320x240"]));
    assert_eq!(
        report["mode_rects"][1],
        serde_json::json!({ "x": 0, "y": 0, "w": 320, "h": 240 })
    );
    assert!(report.get("surface").is_none());
}

#[test]
fn sets_mode_and_fills() {
    let report = probe(&ProbeRequest {
        driver: Some("libogc".to_string()),
        mode: Some((320, 240)),
        bpp: 16,
        fullscreen: true,
        fill: Some(1),
        ..Default::default()
    })
    .unwrap();

    let surface = &report["surface"];
    assert_eq!(surface["width"], 320);
    assert_eq!(surface["height"], 240);
    assert_eq!(surface["pitch"], 640);
    assert_eq!(surface["fullscreen"], true);
    assert_eq!(report["checksum"], 153_600);
}

#[test]
fn config_file_changes_modes() {
    let dir = std::env::temp_dir().join(format!("vid_cli_probe_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("pal.json");
    std::fs::write(&path, r#"{ "full_width": 640, "full_height": 528 }"#).unwrap();

    let report = probe(&ProbeRequest {
        config: Some(path.clone()),
        mode: Some((320, 264)),
        bpp: 8,
        dump: Some(dir.join("fb.raw")),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(report["modes"], serde_json::json!(["640x528", "320x264"]));
    assert_eq!(report["checksum"], 0);
    assert_eq!(std::fs::metadata(dir.join("fb.raw")).unwrap().len(), 320 * 264);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn rejected_mode_is_an_error() {
    let err = probe(&ProbeRequest {
        mode: Some((800, 600)),
        bpp: 16,
        ..Default::default()
    })
    .unwrap_err();
    assert!(format!("{:#}", err).contains("Display mode (800x600) is unsupported."));
}

#[test]
fn config_with_other_driver_is_refused() {
    let err = probe(&ProbeRequest {
        driver: Some("fbcon".to_string()),
        config: Some("unused.json".into()),
        bpp: 16,
        ..Default::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains("--config"));
}
