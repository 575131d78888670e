//! Integration tests for drag and drop reordering and interactive search.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use common::{
    center_of, counter, icon_grid, key, move_to, name_store, numbered_store, press, type_text,
};
use horizon_itemgrid::prelude::*;

const NONE: KeyboardModifiers = KeyboardModifiers::NONE;

fn reorderable() -> GridConfig {
    GridConfig::default()
        .with_columns(Some(3))
        .with_reorderable(true)
}

// ============================================================================
// Drag and drop
// ============================================================================

#[test]
fn test_drag_to_right_quarter_moves_row_after_target() {
    let store = numbered_store(6);
    let mut grid = icon_grid(reorderable(), &store);
    let started = counter(&grid.drag_started);
    let dragged = grid.row_id_at(0).unwrap();

    let origin = center_of(&mut grid, 0);
    press(&mut grid, origin, NONE);
    // Item 2 spans x 98..138; its right quarter starts past x = 128.
    let over = Point::new(134.0, 26.0);
    move_to(&mut grid, over, NONE);

    assert_eq!(started.load(Ordering::SeqCst), 1);
    assert_eq!(grid.drag_session().map(|s| s.row), Some(dragged));
    let target = DropTarget {
        index: 2,
        position: DropPosition::Right,
    };
    assert_eq!(grid.drag_dest_item(), Some(target));

    let request = grid.drag_drop(over).unwrap();
    assert_eq!(request.source_row, Some(dragged));
    assert_eq!(request.target, target);
    assert!(request.moved);

    assert!(grid.drag_session().is_none());
    assert!(grid.drag_dest_item().is_none());
    assert_eq!(grid.index_of(dragged), Some(2));
    assert_eq!(store.index_of(dragged), Some(2));
}

#[test]
fn test_drag_to_left_quarter_moves_row_before_target() {
    let store = numbered_store(6);
    let mut grid = icon_grid(reorderable(), &store);
    let dragged = grid.row_id_at(5).unwrap();

    let origin = center_of(&mut grid, 5);
    press(&mut grid, origin, NONE);
    let over = Point::new(56.0, 26.0);
    move_to(&mut grid, over, NONE);
    assert_eq!(
        grid.drag_dest_item().map(|t| t.position),
        Some(DropPosition::Left)
    );

    let request = grid.drag_drop(over).unwrap();
    assert!(request.moved);
    assert_eq!(grid.index_of(dragged), Some(1));
}

#[test]
fn test_small_motion_does_not_start_drag() {
    let store = numbered_store(3);
    let mut grid = icon_grid(reorderable(), &store);
    let start = center_of(&mut grid, 0);

    press(&mut grid, start, NONE);
    move_to(&mut grid, start.offset(2.0, 1.0), NONE);
    assert!(grid.drag_session().is_none());
}

#[test]
fn test_undraggable_row_stays_put() {
    let store = numbered_store(3);
    store.set_row_draggable(0, false).unwrap();
    let mut grid = icon_grid(reorderable(), &store);

    let origin = center_of(&mut grid, 0);
    press(&mut grid, origin, NONE);
    move_to(&mut grid, Point::new(134.0, 26.0), NONE);
    assert!(grid.drag_session().is_none());
}

#[test]
fn test_drop_without_reorder_reports_target_only() {
    let store = numbered_store(4);
    let mut grid = icon_grid(GridConfig::default().with_columns(Some(3)), &store);
    grid.set_drag_source_enabled(true);
    grid.set_drag_dest_enabled(true);
    let dragged = grid.row_id_at(0).unwrap();

    let origin = center_of(&mut grid, 0);
    let over = center_of(&mut grid, 3);
    press(&mut grid, origin, NONE);
    move_to(&mut grid, over, NONE);
    let request = grid.drag_drop(over).unwrap();

    assert_eq!(request.source_row, Some(dragged));
    assert_eq!(request.target.index, 3);
    assert_eq!(request.target.position, DropPosition::Into);
    assert!(!request.moved);
    assert_eq!(grid.index_of(dragged), Some(0));
}

#[test]
fn test_drop_target_on_empty_space() {
    let store = numbered_store(4);
    let mut grid = icon_grid(reorderable(), &store);
    assert_eq!(
        grid.drop_target_at(Point::new(300.0, 300.0)),
        DropTarget {
            index: 3,
            position: DropPosition::Below
        }
    );

    let empty = numbered_store(0);
    let mut grid = icon_grid(reorderable(), &empty);
    assert_eq!(
        grid.drop_target_at(Point::new(10.0, 10.0)),
        DropTarget {
            index: 0,
            position: DropPosition::Above
        }
    );
}

#[test]
fn test_drag_dest_disabled_refuses_drop() {
    let store = numbered_store(4);
    let mut grid = icon_grid(reorderable(), &store);
    grid.set_drag_dest_enabled(false);
    assert_eq!(grid.drag_motion(Point::new(26.0, 26.0)), None);
    assert_eq!(grid.drag_drop(Point::new(26.0, 26.0)), None);
}

#[test]
fn test_drag_icon_is_relative_to_item() {
    let store = numbered_store(4);
    let mut grid = icon_grid(reorderable(), &store);
    let icon = grid.create_drag_icon(3).unwrap();
    assert!(!icon.is_empty());
    assert!(grid.create_drag_icon(7).is_err());
}

#[test]
fn test_set_drag_dest_item_validates_index() {
    let store = numbered_store(2);
    let mut grid = icon_grid(reorderable(), &store);
    let target = DropTarget {
        index: 1,
        position: DropPosition::Into,
    };
    grid.set_drag_dest_item(Some(target)).unwrap();
    assert_eq!(grid.drag_dest_item(), Some(target));

    assert!(
        grid.set_drag_dest_item(Some(DropTarget {
            index: 4,
            position: DropPosition::Into
        }))
        .is_err()
    );
    grid.set_drag_dest_item(None).unwrap();
    assert_eq!(grid.drag_dest_item(), None);
}

#[test]
fn test_drag_near_edge_autoscrolls_and_retargets() {
    let store = numbered_store(60);
    let mut grid = icon_grid(reorderable(), &store);
    let start = grid.now();

    let origin = center_of(&mut grid, 0);
    press(&mut grid, origin, NONE);
    let held = Point::new(26.0, 395.0);
    move_to(&mut grid, held, NONE);
    assert!(grid.drag_session().is_some());
    assert_eq!(grid.drag_dest_item().map(|t| t.index), Some(24));

    grid.tick(start + Duration::from_millis(40));
    assert_eq!(grid.scroll_offset().y, 25.0);
    // The held point now lies on the top edge of item 27.
    assert_eq!(
        grid.drag_dest_item(),
        Some(DropTarget {
            index: 27,
            position: DropPosition::Above
        })
    );

    grid.drag_leave();
    grid.tick(start + Duration::from_millis(200));
    assert_eq!(grid.scroll_offset().y, 25.0);
    grid.end_drag();
}

// ============================================================================
// Interactive search
// ============================================================================

fn fruit_grid() -> (Arc<ListStore>, ItemGrid) {
    let store = name_store(&["apple", "red", "blue", "green", "Reed"]);
    let grid = icon_grid(GridConfig::default().with_columns(Some(3)), &store);
    (store, grid)
}

#[test]
fn test_typing_finds_and_steps_between_matches() {
    let (_store, mut grid) = fruit_grid();
    let started = counter(&grid.search_started);

    assert!(type_text(&mut grid, "r"));
    assert!(grid.search_visible());
    assert_eq!(started.load(Ordering::SeqCst), 1);
    assert_eq!(grid.cursor(), Some(1));

    type_text(&mut grid, "e");
    assert_eq!(grid.search_overlay().map(|o| o.needle), Some("re".to_owned()));
    assert_eq!(grid.cursor(), Some(1));
    assert_eq!(grid.selected_indices(), vec![1]);

    key(&mut grid, Key::ArrowDown, NONE);
    assert_eq!(grid.cursor(), Some(4));
    assert_eq!(grid.selected_indices(), vec![4]);

    // No third match: the cursor stays on the last one.
    key(&mut grid, Key::ArrowDown, NONE);
    assert_eq!(grid.cursor(), Some(4));

    key(&mut grid, Key::ArrowUp, NONE);
    assert_eq!(grid.cursor(), Some(1));
    assert_eq!(started.load(Ordering::SeqCst), 1);
}

#[test]
fn test_backspace_widens_the_search() {
    let (_store, mut grid) = fruit_grid();
    type_text(&mut grid, "b");
    assert_eq!(grid.cursor(), Some(2));
    type_text(&mut grid, "x");
    assert!(grid.selected_indices().is_empty());

    key(&mut grid, Key::Backspace, NONE);
    assert_eq!(grid.search_overlay().map(|o| o.needle), Some("b".to_owned()));
    assert_eq!(grid.selected_indices(), vec![2]);
}

#[test]
fn test_escape_and_click_hide_search() {
    let (_store, mut grid) = fruit_grid();
    type_text(&mut grid, "g");
    key(&mut grid, Key::Escape, NONE);
    assert!(!grid.search_visible());
    assert_eq!(grid.cursor(), Some(3));

    type_text(&mut grid, "a");
    assert!(grid.search_visible());
    press(&mut grid, Point::new(300.0, 300.0), NONE);
    assert!(!grid.search_visible());
}

#[test]
fn test_enter_in_search_activates_match() {
    let (_store, mut grid) = fruit_grid();
    let activations = counter(&grid.item_activated);
    type_text(&mut grid, "blue");
    key(&mut grid, Key::Enter, NONE);
    assert!(!grid.search_visible());
    assert_eq!(activations.load(Ordering::SeqCst), 1);
}

#[test]
fn test_search_hides_after_timeout() {
    let (_store, mut grid) = fruit_grid();
    type_text(&mut grid, "a");
    let now = grid.now();

    grid.tick(now + Duration::from_secs(2));
    assert!(grid.search_visible());
    grid.tick(now + Duration::from_secs(6));
    assert!(!grid.search_visible());
}

#[test]
fn test_custom_equal_func() {
    let (_store, mut grid) = fruit_grid();
    grid.set_search_equal_func(Some(Box::new(
        |model: &dyn DataSource, column: usize, needle: &str, row: usize| {
            !model
                .value(row, column)
                .display_text()
                .is_some_and(|text| text.ends_with(needle))
        },
    )));

    type_text(&mut grid, "d");
    assert_eq!(grid.cursor(), Some(1));
    key(&mut grid, Key::ArrowDown, NONE);
    assert_eq!(grid.cursor(), Some(4));
}

#[test]
fn test_search_disabled_ignores_typing() {
    let (_store, mut grid) = fruit_grid();
    grid.set_enable_search(false);
    assert!(!type_text(&mut grid, "r"));
    assert!(!grid.search_visible());
    assert!(!grid.start_interactive_search());
}

#[test]
fn test_overlay_uses_position_func() {
    let (_store, mut grid) = fruit_grid();
    grid.set_search_position_func(Some(Box::new(|grid_rect: Rect, size: Size| {
        Rect::new(grid_rect.left(), grid_rect.top(), size.width, size.height)
    })));
    grid.set_screen_geometry(
        Rect::new(50.0, 60.0, 400.0, 400.0),
        Rect::new(0.0, 0.0, 1920.0, 1080.0),
    );

    assert!(grid.start_interactive_search());
    let overlay = grid.search_overlay().unwrap();
    assert_eq!(overlay.rect.left(), 50.0);
    assert_eq!(overlay.rect.top(), 60.0);
    assert!(overlay.needle.is_empty());
}
