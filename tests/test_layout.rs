use std::fs;

use tilewalk::layout::{format_layout, load_layout, parse_layout};
use tilewalk::{LayoutError, Position, TileHighlight};

#[test]
fn test_spawn_marker_and_ragged_rows() {
    let layout = parse_layout(concat!(
        "  ..\n", //
        " .#.\n",
        "s...\n",
    ))
    .unwrap();

    assert_eq!(layout.spawn, Some(Position::new(0, 0)));
    assert_eq!(layout.grid.len(), 8);
    assert!(!layout.grid.contains(Position::new(0, 2)));
    assert!(!layout.grid.contains(Position::new(2, 1)));
    assert!(layout.grid.contains(Position::new(3, 2)));
}

#[test]
fn test_box_drawing_glyphs() {
    let layout = parse_layout("□■□\n@□□").unwrap();
    assert_eq!(layout.spawn, Some(Position::new(0, 0)));
    assert_eq!(layout.grid.len(), 5);
    assert!(!layout.grid.contains(Position::new(1, 1)));
}

#[test]
fn test_without_spawn_uses_first_cell() {
    let layout = parse_layout(" ..\n..").unwrap();
    assert_eq!(layout.spawn, None);
    assert_eq!(layout.spawn_or_first(), Position::new(0, 0));
}

#[test]
fn test_unknown_glyph() {
    match parse_layout("..\n.x.") {
        Err(LayoutError::UnknownGlyph { glyph, line, column }) => {
            assert_eq!(glyph, 'x');
            assert_eq!(line, 2);
            assert_eq!(column, 2);
        }
        other => panic!("expected unknown glyph error, got {:?}", other),
    }
}

#[test]
fn test_all_walls_is_an_error() {
    assert!(matches!(parse_layout("###\n# #"), Err(LayoutError::Build(_))));
}

#[test]
fn test_format_round_trips_through_parse() {
    let text = " .o\n@+.\n";
    let layout = parse_layout(text).unwrap();
    let overlay = [
        (Position::new(2, 1), TileHighlight::Near),
        (Position::new(1, 0), TileHighlight::Far),
    ];
    assert_eq!(format_layout(&layout.grid, &overlay, layout.spawn), text);
}

#[test]
fn test_load_from_disk() {
    let path = std::env::temp_dir().join("tilewalk_test_layout.txt");
    fs::write(&path, "s..\n...\n").unwrap();

    let layout = load_layout(&path).unwrap();
    assert_eq!(layout.grid.len(), 6);
    assert_eq!(layout.spawn, Some(Position::new(0, 1)));

    fs::remove_file(&path).ok();
}

#[test]
fn test_missing_file() {
    let result = load_layout("definitely/not/a/layout.txt");
    assert!(matches!(result, Err(LayoutError::Io(_))));
}

#[test]
fn test_shipped_layout_parses() {
    let layout = load_layout(concat!(env!("CARGO_MANIFEST_DIR"), "/layouts/default.txt")).unwrap();
    assert!(layout.spawn.is_some());
    assert!(layout.grid.contains(layout.spawn_or_first()));
}
