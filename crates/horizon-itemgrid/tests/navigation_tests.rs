//! Integration tests for keyboard navigation.

mod common;

use std::sync::atomic::Ordering;

use common::{counter, icon_grid, key, numbered_store};
use horizon_itemgrid::prelude::*;

const NONE: KeyboardModifiers = KeyboardModifiers::NONE;

fn three_columns() -> GridConfig {
    GridConfig::default()
        .with_columns(Some(3))
        .with_selection_mode(SelectionMode::Multiple)
}

#[test]
fn test_first_key_focuses_first_item() {
    let store = numbered_store(7);
    let mut grid = icon_grid(three_columns(), &store);
    assert_eq!(grid.cursor(), None);

    assert!(key(&mut grid, Key::ArrowDown, NONE));
    assert_eq!(grid.cursor(), Some(0));
    assert_eq!(grid.selected_indices(), vec![0]);
}

#[test]
fn test_arrows_follow_the_grid() {
    let store = numbered_store(7);
    let mut grid = icon_grid(three_columns(), &store);
    grid.set_cursor(1, None, false).unwrap();

    key(&mut grid, Key::ArrowDown, NONE);
    assert_eq!(grid.cursor(), Some(4));

    // Row 2 only holds item 6, so there is nothing below item 4.
    key(&mut grid, Key::ArrowDown, NONE);
    assert_eq!(grid.cursor(), Some(4));

    key(&mut grid, Key::ArrowUp, NONE);
    assert_eq!(grid.cursor(), Some(1));

    key(&mut grid, Key::ArrowLeft, NONE);
    assert_eq!(grid.cursor(), Some(0));
    assert!(!grid.move_cursor(MovementStep::VisualPositions, -1, NONE));
}

#[test]
fn test_right_wraps_to_next_row() {
    let store = numbered_store(7);
    let mut grid = icon_grid(three_columns(), &store);
    grid.set_cursor(2, None, false).unwrap();

    key(&mut grid, Key::ArrowRight, NONE);
    assert_eq!(grid.cursor(), Some(3));
}

#[test]
fn test_home_and_end() {
    let store = numbered_store(7);
    let mut grid = icon_grid(three_columns(), &store);
    grid.set_cursor(3, None, false).unwrap();

    key(&mut grid, Key::End, NONE);
    assert_eq!(grid.cursor(), Some(6));
    key(&mut grid, Key::Home, NONE);
    assert_eq!(grid.cursor(), Some(0));
}

#[test]
fn test_shift_extends_from_anchor() {
    let store = numbered_store(7);
    let mut grid = icon_grid(three_columns(), &store);
    key(&mut grid, Key::Home, NONE);

    key(&mut grid, Key::ArrowRight, KeyboardModifiers::SHIFT);
    key(&mut grid, Key::ArrowDown, KeyboardModifiers::SHIFT);
    assert_eq!(grid.cursor(), Some(4));
    assert_eq!(grid.selected_indices(), vec![0, 1, 2, 3, 4]);

    key(&mut grid, Key::ArrowUp, KeyboardModifiers::SHIFT);
    assert_eq!(grid.selected_indices(), vec![0, 1]);
}

#[test]
fn test_ctrl_moves_cursor_without_selecting() {
    let store = numbered_store(7);
    let mut grid = icon_grid(three_columns(), &store);
    key(&mut grid, Key::Home, NONE);

    key(&mut grid, Key::ArrowRight, KeyboardModifiers::CTRL);
    key(&mut grid, Key::ArrowRight, KeyboardModifiers::CTRL);
    assert_eq!(grid.cursor(), Some(2));
    assert_eq!(grid.selected_indices(), vec![0]);

    key(&mut grid, Key::Space, KeyboardModifiers::CTRL);
    assert_eq!(grid.selected_indices(), vec![0, 2]);
    key(&mut grid, Key::Space, KeyboardModifiers::CTRL);
    assert_eq!(grid.selected_indices(), vec![0]);
}

#[test]
fn test_rtl_right_arrow_moves_to_previous_row() {
    let store = numbered_store(7);
    let mut grid = icon_grid(
        three_columns().with_text_direction(TextDirection::Rtl),
        &store,
    );
    grid.set_cursor(1, None, false).unwrap();

    key(&mut grid, Key::ArrowRight, NONE);
    assert_eq!(grid.cursor(), Some(0));
    key(&mut grid, Key::ArrowLeft, NONE);
    key(&mut grid, Key::ArrowLeft, NONE);
    assert_eq!(grid.cursor(), Some(2));
}

#[test]
fn test_columns_mode_down_walks_data_order() {
    let store = numbered_store(7);
    let mut grid = icon_grid(
        three_columns().with_layout_mode(LayoutMode::Columns),
        &store,
    );
    grid.set_cursor(2, None, false).unwrap();

    key(&mut grid, Key::ArrowDown, NONE);
    assert_eq!(grid.cursor(), Some(3));
    key(&mut grid, Key::ArrowRight, NONE);
    assert_eq!(grid.cursor(), Some(6));
}

#[test]
fn test_page_down_stays_in_column_and_scrolls() {
    let store = numbered_store(30);
    let mut grid = icon_grid(three_columns(), &store);
    key(&mut grid, Key::Home, NONE);

    key(&mut grid, Key::PageDown, NONE);
    assert_eq!(grid.cursor(), Some(24));
    assert!(grid.scroll_offset().y > 0.0);

    key(&mut grid, Key::PageUp, NONE);
    assert_eq!(grid.cursor(), Some(0));
    assert!(grid.scroll_offset().y <= grid.item_rect(0).unwrap().top());
}

#[test]
fn test_enter_activates_cursor_item() {
    let store = numbered_store(3);
    let mut grid = icon_grid(three_columns(), &store);
    let activations = common::counter(&grid.item_activated);

    assert!(!key(&mut grid, Key::Enter, NONE));
    key(&mut grid, Key::End, NONE);
    assert!(key(&mut grid, Key::Enter, NONE));
    assert_eq!(activations.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[test]
fn test_cursor_follows_its_row() {
    let store = numbered_store(5);
    let mut grid = icon_grid(three_columns(), &store);
    grid.set_cursor(3, None, false).unwrap();
    let row = grid.cursor_row();

    store.move_to(3, 0).unwrap();
    assert_eq!(grid.cursor(), Some(0));
    assert_eq!(grid.cursor_row(), row);

    store.remove(0).unwrap();
    assert_eq!(grid.cursor(), None);
}

#[test]
fn test_set_cursor_rejects_detached_cell() {
    let store = numbered_store(3);
    let mut grid = icon_grid(three_columns(), &store);
    let detached = grid.attach_cell(TextRenderer::new(), PackSide::Start, false);
    grid.detach_cell(detached).unwrap();

    assert!(matches!(
        grid.set_cursor(0, Some(detached), false),
        Err(GridError::InvalidCell(_))
    ));
    assert!(grid.set_cursor(9, None, false).is_err());
}

#[test]
fn test_vertical_keys_walk_cells_before_items() {
    let store = numbered_store(6);
    let mut grid = ItemGrid::with_config(three_columns());
    let first = ToggleRenderer::new();
    let second = ToggleRenderer::new();
    let first_toggles = counter(&first.toggled);
    let second_toggles = counter(&second.toggled);
    let a = grid.attach_cell(first, PackSide::Start, false);
    let b = grid.attach_cell(second, PackSide::Start, false);
    grid.set_model(Some(store.clone()));
    grid.set_viewport(Size::new(400.0, 400.0));
    grid.flush_layout();
    let activations = counter(&grid.item_activated);

    let mut steps = Vec::new();
    for _ in 0..4 {
        key(&mut grid, Key::ArrowDown, NONE);
        steps.push((grid.cursor(), grid.cursor_cell()));
    }
    assert_eq!(
        steps,
        vec![
            (Some(0), None),
            (Some(0), Some(a)),
            (Some(0), Some(b)),
            (Some(3), Some(a)),
        ]
    );

    // Moving up re-enters the item above at its last cell.
    key(&mut grid, Key::ArrowUp, NONE);
    assert_eq!((grid.cursor(), grid.cursor_cell()), (Some(0), Some(b)));

    // Horizontal moves keep the focused cell.
    key(&mut grid, Key::ArrowRight, NONE);
    assert_eq!((grid.cursor(), grid.cursor_cell()), (Some(1), Some(b)));

    // Enter activates the focused cell instead of the item.
    assert!(key(&mut grid, Key::Enter, NONE));
    assert_eq!(second_toggles.load(Ordering::SeqCst), 1);
    assert_eq!(first_toggles.load(Ordering::SeqCst), 0);
    assert_eq!(activations.load(Ordering::SeqCst), 0);
}
