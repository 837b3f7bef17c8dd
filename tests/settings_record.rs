//! The settings document is shared with the host shell, so its field names
//! and per-field defaults are a contract: a partial or older document must
//! deserialize into the same record the shipped defaults produce.

use ime_color_indicator::color::Color;
use ime_color_indicator::overlay::ScreenEdge;
use ime_color_indicator::settings::Settings;

#[test]
fn empty_document_yields_the_shipped_defaults() {
    let parsed: Settings = serde_json::from_str("{}").unwrap();
    let defaults = Settings::default();

    assert_eq!(parsed.ime_off_color, defaults.ime_off_color);
    assert_eq!(parsed.ime_on_color, defaults.ime_on_color);
    assert_eq!(parsed.top_bar_height, 2);
    assert_eq!(parsed.bottom_bar_height, 10);
    assert_eq!(parsed.left_bar_width, 2);
    assert_eq!(parsed.right_bar_width, 2);
    assert_eq!(parsed.taskbar_bar_height, 2);
    assert!(parsed.show_top_bar);
    assert!(parsed.show_bottom_bar);
    assert!(parsed.show_left_bar);
    assert!(parsed.show_right_bar);
    assert!(!parsed.show_taskbar_bar);
    assert!(!parsed.all_monitors);
    assert_eq!(parsed.toggle_bars_hotkey.as_deref(), Some("Ctrl+Alt+I"));
    assert_eq!(parsed.open_settings_hotkey.as_deref(), Some("Ctrl+Alt+O"));
    assert!(!parsed.auto_update);
    assert!(!parsed.debug_logging);
}

#[test]
fn partial_document_overrides_only_named_fields() {
    let parsed: Settings = serde_json::from_str(
        r##"{
            "ime_on_color": "#FF0000",
            "bottom_bar_height": 6,
            "show_left_bar": false,
            "all_monitors": true
        }"##,
    )
    .unwrap();

    assert_eq!(parsed.ime_on_color, "#FF0000");
    assert_eq!(parsed.bottom_bar_height, 6);
    assert!(!parsed.show_left_bar);
    assert!(parsed.all_monitors);

    // Everything the document omits stays at its default.
    assert_eq!(parsed.ime_off_color, "#1E90FF");
    assert_eq!(parsed.top_bar_height, 2);
    assert!(parsed.show_top_bar);
    assert_eq!(parsed.toggle_bars_hotkey.as_deref(), Some("Ctrl+Alt+I"));
}

#[test]
fn document_round_trips_through_serialization() {
    let settings = Settings {
        ime_off_color: "#FF112233".to_string(),
        show_taskbar_bar: true,
        toggle_bars_hotkey: None,
        debug_logging: true,
        ..Settings::default()
    };

    let text = serde_json::to_string(&settings).unwrap();
    let parsed: Settings = serde_json::from_str(&text).unwrap();

    assert_eq!(parsed.ime_off_color, "#FF112233");
    assert!(parsed.show_taskbar_bar);
    assert_eq!(parsed.toggle_bars_hotkey, None);
    assert!(parsed.debug_logging);
    assert_eq!(parsed.bottom_bar_height, settings.bottom_bar_height);
}

#[test]
fn parsed_document_drives_the_bar_set() {
    let parsed: Settings = serde_json::from_str(
        r#"{
            "show_top_bar": false,
            "show_taskbar_bar": true,
            "right_bar_width": 5
        }"#,
    )
    .unwrap();

    let specs = parsed.bar_specs();
    let edges: Vec<_> = specs.iter().map(|s| s.edge).collect();
    assert_eq!(
        edges,
        vec![
            ScreenEdge::Bottom,
            ScreenEdge::Left,
            ScreenEdge::Right,
            ScreenEdge::TaskbarEdge,
        ]
    );
    let right = specs.iter().find(|s| s.edge == ScreenEdge::Right).unwrap();
    assert_eq!(right.thickness, 5);
}

#[test]
fn colors_from_a_document_reach_the_overlay_layer_parsed() {
    let parsed: Settings = serde_json::from_str(r##"{ "ime_off_color": "#80FF0000" }"##).unwrap();
    assert_eq!(parsed.ime_off_color(), Color::rgba(0xFF, 0x00, 0x00, 0x80));
    // The malformed on-color path keeps the shipped green.
    let broken: Settings = serde_json::from_str(r#"{ "ime_on_color": "green" }"#).unwrap();
    assert_eq!(broken.ime_on_color(), Color::rgb(0x32, 0xCD, 0x32));
}
