#![allow(clippy::float_cmp)]

use super::*;

fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(id, x, y, w, h)
}

fn board() -> Vec<Rect> {
    vec![
        rect("a", 100.0, 0.0, 80.0, 40.0),
        rect("b", 100.0, 300.0, 120.0, 40.0),
        rect("m", 400.0, 150.0, 60.0, 40.0),
    ]
}

#[test]
fn parse_board_line_reads_object_records() {
    let line = r#"{"type":"object","id":"n1","kind":"note","x":1,"y":2,"width":3,"height":4,"z_index":7}"#;
    let rect = parse_board_line(line).unwrap().unwrap();
    assert_eq!(rect.id, "n1");
    assert_eq!(rect.kind, "note");
    assert_eq!((rect.x, rect.y, rect.width, rect.height), (1.0, 2.0, 3.0, 4.0));
}

#[test]
fn parse_board_line_skips_blank_and_meta_lines() {
    assert!(parse_board_line("   ").unwrap().is_none());
    assert!(parse_board_line(r#"{"type":"board_export_meta","name":"b"}"#).unwrap().is_none());
}

#[test]
fn parse_board_line_rejects_missing_geometry() {
    assert!(parse_board_line(r#"{"id":"x","x":1}"#).is_err());
}

#[test]
fn flags_override_config() {
    let cli = Cli::try_parse_from(["boardgeom", "--grid-size", "250", "--spacing", "4", "groups"]).unwrap();
    let config = resolve_config(GeometryConfig::default(), &cli).unwrap();
    assert_eq!(config.grid_size, 250.0);
    assert_eq!(config.layout_spacing, 4.0);
    assert_eq!(config.snap_threshold, GeometryConfig::default().snap_threshold);
}

#[test]
fn invalid_flag_value_fails_validation() {
    let cli = Cli::try_parse_from(["boardgeom", "--grid-size", "0", "groups"]).unwrap();
    let err = resolve_config(GeometryConfig::default(), &cli).unwrap_err();
    assert!(matches!(err, CliError::Config(GeometryError::InvalidGridSize(_))));
}

#[test]
fn config_error_message_carries_code() {
    let err = CliError::from(GeometryError::InvalidDistance { name: "spacing", value: -1.0 });
    let message = err.to_string();
    assert!(message.starts_with("invalid configuration [E_INVALID_DISTANCE]"), "{message}");
}

#[test]
fn grid_columns_flag_parses() {
    let cli = Cli::try_parse_from(["boardgeom", "grid", "--columns", "3"]).unwrap();
    let Command::Grid(args) = cli.command else {
        panic!("expected grid command");
    };
    assert_eq!(args.columns, Columns::Fixed(3));
}

#[test]
fn snap_command_reports_guides_and_committed_item() {
    let cmd = Command::Snap(SnapArgs { id: "m".into(), x: 104.0, y: 150.0 });
    let out = run(cmd, board(), &GeometryConfig::default()).unwrap();
    assert_eq!(out["snap"]["snapped_position"]["x"], 100.0);
    assert_eq!(out["snap"]["snap_lines"].as_array().unwrap().len(), 1);
    assert_eq!(out["item"]["x"], 100.0);
}

#[test]
fn snap_command_unknown_item_errors() {
    let cmd = Command::Snap(SnapArgs { id: "nope".into(), x: 0.0, y: 0.0 });
    let err = run(cmd, board(), &GeometryConfig::default()).unwrap_err();
    assert!(matches!(err, CliError::UnknownItem(id) if id == "nope"));
}

#[test]
fn in_box_command_lists_overlapping_items() {
    let cmd = Command::InBox(BoxArgs { x: 90.0, y: 290.0, width: 20.0, height: 20.0 });
    let out = run(cmd, board(), &GeometryConfig::default()).unwrap();
    let ids: Vec<&str> = out.as_array().unwrap().iter().filter_map(|v| v["id"].as_str()).collect();
    assert_eq!(ids, vec!["b"]);
}

#[test]
fn groups_command_reports_orientation() {
    let items = vec![rect("a", 0.0, 0.0, 10.0, 10.0), rect("b", 0.0, 200.0, 10.0, 10.0)];
    let out = run(Command::Groups, items, &GeometryConfig::default()).unwrap();
    assert_eq!(out["orientation"], "column");
    assert_eq!(out["columns"], json!([["a", "b"]]));
}
