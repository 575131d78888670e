//! Integration tests for item placement, hit testing and painting.

mod common;

use common::{ICON, icon_grid, numbered_store};
use horizon_itemgrid::prelude::*;

fn fixed_columns(columns: usize) -> GridConfig {
    GridConfig::default().with_columns(Some(columns))
}

#[test]
fn test_three_fixed_columns_place_seven_items() {
    let store = numbered_store(7);
    let mut grid = icon_grid(fixed_columns(3), &store);

    // margin 6, spacing 6, 40px items: every step is 46px.
    for index in 0..7 {
        let row = index / 3;
        let col = index % 3;
        let expected = Rect::new(6.0 + col as f32 * 46.0, 6.0 + row as f32 * 46.0, ICON, ICON);
        assert_eq!(grid.item_rect(index), Some(expected), "item {index}");

        let pos = grid.item_grid_position(index).unwrap();
        assert_eq!((pos.row, pos.col), (row, col));
        assert_eq!((pos.row_span, pos.col_span), (1, 1));
    }
    assert_eq!(grid.grid_dimensions(), (3, 3));
    assert_eq!(grid.content_size(), Size::new(144.0, 144.0));
}

#[test]
fn test_auto_columns_fill_viewport_width() {
    let store = numbered_store(20);
    let mut grid = icon_grid(GridConfig::default(), &store);
    grid.set_viewport(Size::new(200.0, 1000.0));
    grid.flush_layout();

    // 12 + 40n + 6(n-1) <= 200 holds up to n = 4.
    let (rows, cols) = grid.grid_dimensions();
    assert_eq!(cols, 4);
    assert_eq!(rows, 5);
    assert_eq!(grid.item_grid_position(4).map(|p| (p.row, p.col)), Some((1, 0)));
}

#[test]
fn test_single_item_wider_than_viewport_still_placed() {
    let store = numbered_store(3);
    let mut grid = icon_grid(GridConfig::default(), &store);
    grid.set_viewport(Size::new(10.0, 400.0));
    grid.flush_layout();

    assert_eq!(grid.grid_dimensions(), (3, 1));
    for index in 0..3 {
        assert!(grid.item_rect(index).is_some());
    }
}

#[test]
fn test_columns_mode_fills_downwards() {
    let store = numbered_store(7);
    let mut grid = icon_grid(
        fixed_columns(3).with_layout_mode(LayoutMode::Columns),
        &store,
    );

    for index in 0..7 {
        let pos = grid.item_grid_position(index).unwrap();
        assert_eq!((pos.row, pos.col), (index % 3, index / 3), "item {index}");
    }
    assert_eq!(grid.grid_dimensions(), (3, 3));
}

#[test]
fn test_rtl_mirrors_columns() {
    let store = numbered_store(3);
    let mut ltr = icon_grid(fixed_columns(3), &store);
    let mut rtl = icon_grid(
        fixed_columns(3).with_text_direction(TextDirection::Rtl),
        &store,
    );

    let width = ltr.content_size().width;
    for index in 0..3 {
        let a = ltr.item_rect(index).unwrap();
        let b = rtl.item_rect(index).unwrap();
        assert_eq!(b.left(), width - a.right());
        assert_eq!(b.top(), a.top());
    }
    assert_eq!(rtl.item_grid_position(0).map(|p| p.col), Some(2));
}

#[test]
fn test_hit_test_finds_item_centres() {
    let store = numbered_store(7);
    let mut grid = icon_grid(fixed_columns(3), &store);

    for index in 0..7 {
        let center = grid.item_rect(index).unwrap().center();
        let hit = grid.item_at(center, false).expect("centre hits");
        assert_eq!(hit.index, index);
        assert_eq!(Some(hit.row), grid.row_id_at(index));
    }
    assert!(grid.item_at(Point::new(1.0, 1.0), false).is_none());
    assert!(grid.item_at(Point::new(300.0, 300.0), false).is_none());
}

#[test]
fn test_hit_inside_cell_only() {
    let store = numbered_store(1);
    let mut grid = icon_grid(fixed_columns(3), &store);
    let hit = grid.item_at(Point::new(26.0, 26.0), true).unwrap();
    assert!(hit.cell.is_some());
    let cell = hit.cell.unwrap();
    assert_eq!(grid.cell_area(0, cell), Some(Rect::new(6.0, 6.0, ICON, ICON)));
}

#[test]
fn test_layout_is_deferred_until_flushed() {
    let store = numbered_store(2);
    let mut grid = icon_grid(fixed_columns(3), &store);
    assert!(!grid.needs_layout());

    grid.set_margin(10.0);
    assert!(grid.needs_layout());
    grid.process_idle();
    assert!(!grid.needs_layout());
    assert_eq!(grid.item_rect(0).map(|r| r.left()), Some(10.0));
}

#[test]
fn test_empty_grid_has_no_content() {
    let store = numbered_store(0);
    let mut grid = icon_grid(GridConfig::default(), &store);
    assert!(grid.is_empty());
    assert_eq!(grid.content_size(), Size::ZERO);
    assert_eq!(grid.visible_range(), None);
}

#[test]
fn test_text_items_share_row_height() {
    let store = numbered_store(0);
    store.push(vec!["short".into()]);
    store.push(vec!["a label long enough to wrap twice".into()]);

    let mut grid = ItemGrid::with_config(GridConfig::default().with_item_width(Some(80.0)));
    let label = grid.attach_cell(TextRenderer::new(), PackSide::Start, false);
    grid.set_model(Some(store.clone()));
    grid.bind_attribute(label, "text", 0).unwrap();
    grid.set_viewport(Size::new(400.0, 400.0));
    grid.flush_layout();

    let a = grid.item_rect(0).unwrap();
    let b = grid.item_rect(1).unwrap();
    assert_eq!(a.top(), b.top());
    assert_eq!(a.height(), b.height());
    assert!(a.height() > TextRenderer::DEFAULT_LINE_HEIGHT + 4.0);
}

#[test]
fn test_paint_records_visible_items() {
    let store = numbered_store(0);
    for name in ["one", "two", "three"] {
        store.push(vec![name.into()]);
    }
    let mut grid = ItemGrid::new();
    let label = grid.attach_cell(TextRenderer::new(), PackSide::Start, false);
    grid.set_model(Some(store.clone()));
    grid.bind_attribute(label, "text", 0).unwrap();
    grid.set_viewport(Size::new(400.0, 400.0));
    grid.select_row(1).unwrap();

    let mut surface = RecordingSurface::new();
    grid.paint(&mut surface).unwrap();

    for name in ["one", "two", "three"] {
        assert_eq!(surface.text_count(name), 1, "{name}");
    }
    assert!(!grid.damage().has_damage());
}
