//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use horizon_itemgrid::prelude::*;
use tracing_subscriber::EnvFilter;

/// Route grid logs to the test output, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Edge length of the fixture icons.
pub const ICON: f32 = 40.0;

/// A store with one text column holding `names`.
pub fn name_store(names: &[&str]) -> Arc<ListStore> {
    let store = Arc::new(ListStore::new(vec![ColumnKind::Text]));
    for name in names {
        store.push(vec![(*name).into()]);
    }
    store
}

/// A store with `n` rows named `item 0`, `item 1`, ...
pub fn numbered_store(n: usize) -> Arc<ListStore> {
    let store = Arc::new(ListStore::new(vec![ColumnKind::Text]));
    for i in 0..n {
        store.push(vec![format!("item {i}").into()]);
    }
    store
}

/// A grid of fixed 40x40 icons over `store`, laid out in a 400x400 viewport.
pub fn icon_grid(config: GridConfig, store: &Arc<ListStore>) -> ItemGrid {
    init_tracing();
    let mut grid = ItemGrid::with_config(config);
    grid.attach_cell(
        IconRenderer::new().with_icon("file").with_size(ICON),
        PackSide::Start,
        false,
    );
    grid.set_model(Some(store.clone()));
    grid.set_viewport(Size::new(400.0, 400.0));
    grid.flush_layout();
    grid
}

/// Counts emissions of a signal.
pub fn counter<T: 'static>(signal: &Signal<T>) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    signal.connect(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });
    count
}

/// Center of item `index` in widget coordinates.
pub fn center_of(grid: &mut ItemGrid, index: usize) -> Point {
    let rect = grid.item_rect(index).expect("item is placed");
    grid.content_to_widget(rect.center())
}

pub fn press(grid: &mut ItemGrid, pos: Point, modifiers: KeyboardModifiers) -> bool {
    grid.event(&GridEvent::MousePress(MousePressEvent::new(
        MouseButton::Left,
        pos,
        modifiers,
    )))
}

pub fn release(grid: &mut ItemGrid, pos: Point, modifiers: KeyboardModifiers) -> bool {
    grid.event(&GridEvent::MouseRelease(MouseReleaseEvent::new(
        MouseButton::Left,
        pos,
        modifiers,
    )))
}

pub fn click(grid: &mut ItemGrid, index: usize, modifiers: KeyboardModifiers) {
    let pos = center_of(grid, index);
    press(grid, pos, modifiers);
    release(grid, pos, modifiers);
}

pub fn move_to(grid: &mut ItemGrid, pos: Point, modifiers: KeyboardModifiers) -> bool {
    grid.event(&GridEvent::MouseMove(MouseMoveEvent::new(pos, modifiers)))
}

pub fn key(grid: &mut ItemGrid, key: Key, modifiers: KeyboardModifiers) -> bool {
    grid.event(&GridEvent::KeyPress(KeyPressEvent::key(key, modifiers)))
}

pub fn type_text(grid: &mut ItemGrid, text: &str) -> bool {
    grid.event(&GridEvent::KeyPress(KeyPressEvent::typed(text)))
}
