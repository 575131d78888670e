//! Headless file browser example.
//!
//! Builds an icon grid over a small file list, drives it with synthetic
//! input the way a host toolkit would, and prints what it would paint.
//!
//! Run with: cargo run -p horizon-itemgrid --example file_browser
//! Add `RUST_LOG=horizon_itemgrid=trace` to watch the grid work.

use std::sync::Arc;

use horizon_itemgrid::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Icon grid file browser");
    println!("======================");
    println!();

    let files = [
        ("README.md", "text-x-generic"),
        ("Cargo.toml", "text-x-generic"),
        ("src", "folder"),
        ("tests", "folder"),
        ("report.pdf", "application-pdf"),
        ("photo.png", "image-x-generic"),
        ("recipes.txt", "text-x-generic"),
    ];
    let store = Arc::new(ListStore::new(vec![ColumnKind::Text, ColumnKind::Icon]));
    for (name, icon) in files {
        store.push(vec![name.into(), CellValue::Icon(icon.to_owned())]);
    }

    let mut grid = ItemGrid::with_config(
        GridConfig::default()
            .with_item_width(Some(96.0))
            .with_selection_mode(SelectionMode::Multiple)
            .with_reorderable(true),
    );
    let icon = grid.attach_cell(IconRenderer::new(), PackSide::Start, false);
    let label = grid.attach_cell(TextRenderer::new(), PackSide::Start, false);
    grid.set_model(Some(store.clone()));
    grid.bind_attribute(icon, "icon", 1).expect("icon column");
    grid.bind_attribute(label, "text", 0).expect("text column");
    grid.set_viewport(Size::new(420.0, 300.0));

    let model = store.clone();
    grid.item_activated.connect(move |row: &RowId| {
        if let Some(index) = model.index_of(*row) {
            println!("  activated {:?}", model.get(index, 0));
        }
    });

    grid.flush_layout();
    let (rows, cols) = grid.grid_dimensions();
    println!("Layout: {rows} rows x {cols} columns, content {:?}", grid.content_size());
    for index in 0..grid.len() {
        println!("  item {index}: {:?}", grid.item_rect(index));
    }
    println!();

    // Keyboard: select the first three items, then open the last one.
    let key = |grid: &mut ItemGrid, key: Key, modifiers: KeyboardModifiers| {
        grid.event(&GridEvent::KeyPress(KeyPressEvent::key(key, modifiers)));
    };
    key(&mut grid, Key::Home, KeyboardModifiers::NONE);
    key(&mut grid, Key::ArrowRight, KeyboardModifiers::SHIFT);
    key(&mut grid, Key::ArrowRight, KeyboardModifiers::SHIFT);
    println!("Selected after shift-arrows: {:?}", grid.selected_indices());
    key(&mut grid, Key::End, KeyboardModifiers::NONE);
    key(&mut grid, Key::Enter, KeyboardModifiers::NONE);
    println!();

    // Type-ahead search.
    grid.event(&GridEvent::KeyPress(KeyPressEvent::typed("re")));
    println!("Search 're' found: {:?}", grid.cursor());
    grid.event(&GridEvent::KeyPress(KeyPressEvent::key(
        Key::ArrowDown,
        KeyboardModifiers::NONE,
    )));
    println!("Next match: {:?}", grid.cursor());
    grid.event(&GridEvent::KeyPress(KeyPressEvent::key(
        Key::Escape,
        KeyboardModifiers::NONE,
    )));
    println!();

    // Paint into a recording surface.
    let mut surface = RecordingSurface::new();
    grid.paint(&mut surface).expect("balanced surface stack");
    println!("Painted {} operations", surface.ops().len());
    for (name, _) in files {
        println!("  {name}: drawn {} time(s)", surface.text_count(name));
    }
}
