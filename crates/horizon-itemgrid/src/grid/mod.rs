//! The item grid engine.
//!
//! [`ItemGrid`] mirrors the rows of a [`DataSource`] as items, lays them out
//! in rows or columns, and turns host input into selection, navigation, drag
//! and drop, and interactive search.
//!
//! The grid is headless and single-threaded. The host feeds it events
//! ([`ItemGrid::event`]), the clock ([`ItemGrid::tick`]) and idle turns
//! ([`ItemGrid::process_idle`]), and asks it to [`paint`](ItemGrid::paint)
//! onto a [`Surface`](horizon_itemgrid_render::Surface).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_itemgrid::prelude::*;
//!
//! let store = Arc::new(ListStore::new(vec![ColumnKind::Icon, ColumnKind::Text]));
//! store.push(vec![CellValue::Icon("folder".into()), "Documents".into()]);
//! store.push(vec![CellValue::Icon("folder".into()), "Music".into()]);
//!
//! let mut grid = ItemGrid::new();
//! let icon = grid.attach_cell(IconRenderer::new(), PackSide::Start, false);
//! let text = grid.attach_cell(TextRenderer::new(), PackSide::Start, false);
//! grid.set_model(Some(store.clone()));
//! grid.bind_attribute(icon, "icon", 0).unwrap();
//! grid.bind_attribute(text, "text", 1).unwrap();
//! grid.set_viewport(Size::new(400.0, 300.0));
//! grid.flush_layout();
//!
//! let first = grid.item_rect(0).unwrap();
//! assert_eq!(grid.item_at(first.center(), false).map(|hit| hit.index), Some(0));
//! ```

mod dnd;
mod hit;
mod input;
mod item;
mod layout;
mod navigation;
mod paint;
mod scroll;
mod search;
mod selection;
mod size;

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use slotmap::SlotMap;

use horizon_itemgrid_core::logging::targets;
use horizon_itemgrid_core::{ConnectionGuard, DeferredTask, Signal, TimerId, TimerQueue};
use horizon_itemgrid_render::{DamageTracker, Point, Rect, Size};

use crate::cell::{CellDataFunc, CellId, CellRegistry, CellRenderer, PackSide};
use crate::config::{
    GridConfig, GridStyle, ItemOrientation, LayoutMode, SelectionMode, TextDirection,
};
use crate::error::{check_index, GridError, Result};
use crate::events::{KeyboardModifiers, MouseButton};
use crate::model::{DataSource, RowId};

pub use dnd::{DragSession, DropPosition, DropRequest, DropTarget};
pub use hit::ItemHit;
pub use item::GridPos;
pub use navigation::MovementStep;
pub use search::{SearchEqualFunc, SearchOverlay, SearchPositionFunc};

use item::{Item, ItemKey};
use search::SearchState;

/// A model notification waiting to be applied.
#[derive(Debug, Clone, PartialEq)]
enum RowChange {
    Inserted(usize, RowId),
    Changed(usize, RowId),
    Deleted(usize, RowId),
    Reordered(Vec<usize>),
}

type ChangeQueue = Arc<Mutex<VecDeque<RowChange>>>;

/// A button press that may turn into a click, a drag or a rubber band.
#[derive(Debug, Clone, Copy)]
struct Press {
    item: Option<ItemKey>,
    pos: Point,
    button: MouseButton,
    modifiers: KeyboardModifiers,
    /// Collapse the selection to `item` on release unless a drag starts.
    collapse: bool,
}

/// Rubber band corners in content coordinates.
#[derive(Debug, Clone, Copy)]
struct RubberBand {
    start: Point,
    end: Point,
}

impl RubberBand {
    fn rect(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy)]
struct Autoscroll {
    timer: TimerId,
    dx: f32,
    dy: f32,
    /// Last pointer position in widget coordinates.
    pos: Point,
}

/// Totals of the last layout run.
#[derive(Debug, Clone, Copy, Default)]
struct LayoutState {
    content: Size,
    rows: usize,
    cols: usize,
}

/// A grid of items, one per data-source row.
///
/// # Signals
///
/// - `selection_changed()`: the set of selected items changed
/// - `item_activated(RowId)`: an item was activated (double click, Enter,
///   single click in single-click mode, or search activation)
/// - `search_started()`: the interactive search overlay was opened
/// - `cursor_changed(Option<RowId>)`: the keyboard cursor moved
/// - `drag_started(RowId)`: a row started being dragged
pub struct ItemGrid {
    config: GridConfig,
    style: GridStyle,
    cells: CellRegistry,

    // Model
    model: Option<Arc<dyn DataSource>>,
    model_guards: Vec<ConnectionGuard>,
    changes: ChangeQueue,

    // Items
    items: SlotMap<ItemKey, Item>,
    order: Vec<ItemKey>,
    row_map: HashMap<RowId, ItemKey>,

    // Layout
    layout: LayoutState,
    layout_task: DeferredTask,
    viewport: Size,
    scroll: Point,
    damage: DamageTracker,

    // Time
    timers: TimerQueue,
    now: Instant,

    // Interaction
    has_focus: bool,
    anchor: Option<ItemKey>,
    cursor: Option<ItemKey>,
    cursor_cell: Option<CellId>,
    prelit: Option<ItemKey>,
    edited: Option<(ItemKey, CellId)>,
    last_single_clicked: Option<ItemKey>,
    press: Option<Press>,
    rubber_band: Option<RubberBand>,
    autoscroll: Option<Autoscroll>,
    hover_timer: Option<(TimerId, KeyboardModifiers)>,

    // Drag and drop
    drag_source_enabled: bool,
    drag_dest_enabled: bool,
    drag: Option<DragSession>,
    drag_dest: Option<(ItemKey, DropPosition)>,

    search: SearchState,

    // Signals
    /// Emitted when the selection changes.
    pub selection_changed: Signal<()>,
    /// Emitted when an item is activated.
    pub item_activated: Signal<RowId>,
    /// Emitted when the interactive search opens.
    pub search_started: Signal<()>,
    /// Emitted when the keyboard cursor moves.
    pub cursor_changed: Signal<Option<RowId>>,
    /// Emitted when a drag starts.
    pub drag_started: Signal<RowId>,
}

impl Default for ItemGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ItemGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemGrid")
            .field("config", &self.config)
            .field("cells", &self.cells.len())
            .field("items", &self.order.len())
            .field("content", &self.layout.content)
            .field("viewport", &self.viewport)
            .field("scroll", &self.scroll)
            .finish()
    }
}

impl ItemGrid {
    /// Create an empty grid with the default configuration.
    pub fn new() -> Self {
        Self::with_config(GridConfig::default())
    }

    /// Create an empty grid.
    pub fn with_config(config: GridConfig) -> Self {
        let reorderable = config.reorderable;
        Self {
            config,
            style: GridStyle::default(),
            cells: CellRegistry::new(),
            model: None,
            model_guards: Vec::new(),
            changes: Arc::new(Mutex::new(VecDeque::new())),
            items: SlotMap::with_key(),
            order: Vec::new(),
            row_map: HashMap::new(),
            layout: LayoutState::default(),
            layout_task: DeferredTask::new(),
            viewport: Size::ZERO,
            scroll: Point::ZERO,
            damage: DamageTracker::new(),
            timers: TimerQueue::new(),
            now: Instant::now(),
            has_focus: false,
            anchor: None,
            cursor: None,
            cursor_cell: None,
            prelit: None,
            edited: None,
            last_single_clicked: None,
            press: None,
            rubber_band: None,
            autoscroll: None,
            hover_timer: None,
            drag_source_enabled: reorderable,
            drag_dest_enabled: reorderable,
            drag: None,
            drag_dest: None,
            search: SearchState::new(),
            selection_changed: Signal::new(),
            item_activated: Signal::new(),
            search_started: Signal::new(),
            cursor_changed: Signal::new(),
            drag_started: Signal::new(),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// The current configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Replace the whole configuration.
    pub fn set_config(&mut self, config: GridConfig) {
        self.set_selection_mode(config.selection_mode);
        self.set_reorderable(config.reorderable);
        if config.search_column != self.config.search_column || !config.enable_search {
            self.hide_search();
        }
        self.config = config;
        self.invalidate_sizes();
    }

    /// Paint colors.
    pub fn style(&self) -> &GridStyle {
        &self.style
    }

    /// Set the paint colors.
    pub fn set_style(&mut self, style: GridStyle) {
        self.style = style;
        self.damage.invalidate_all();
    }

    /// The selection mode.
    pub fn selection_mode(&self) -> SelectionMode {
        self.config.selection_mode
    }

    /// Set the selection mode.
    ///
    /// Switching to [`SelectionMode::None`], or away from
    /// [`SelectionMode::Multiple`], clears the selection.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        let old = self.config.selection_mode;
        if mode == old {
            return;
        }
        if mode == SelectionMode::None || old == SelectionMode::Multiple {
            if self.clear_selection_flags() {
                self.selection_changed.emit(());
            }
            self.stop_rubber_band();
        }
        self.config.selection_mode = mode;
    }

    /// The layout mode.
    pub fn layout_mode(&self) -> LayoutMode {
        self.config.layout_mode
    }

    /// Set the layout mode.
    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        if self.config.layout_mode != mode {
            self.config.layout_mode = mode;
            self.invalidate_sizes();
        }
    }

    /// How cells are stacked inside an item.
    pub fn item_orientation(&self) -> ItemOrientation {
        self.config.item_orientation
    }

    /// Set how cells are stacked inside an item.
    pub fn set_item_orientation(&mut self, orientation: ItemOrientation) {
        if self.config.item_orientation != orientation {
            self.config.item_orientation = orientation;
            self.invalidate_sizes();
        }
    }

    /// The text direction.
    pub fn text_direction(&self) -> TextDirection {
        self.config.text_direction
    }

    /// Set the text direction.
    pub fn set_text_direction(&mut self, direction: TextDirection) {
        if self.config.text_direction != direction {
            self.config.text_direction = direction;
            self.queue_layout();
        }
    }

    /// Space around the content.
    pub fn margin(&self) -> f32 {
        self.config.margin
    }

    /// Set the space around the content.
    pub fn set_margin(&mut self, margin: f32) {
        if self.config.margin != margin {
            self.config.margin = margin;
            self.queue_layout();
        }
    }

    /// Space between the cells of an item.
    pub fn spacing(&self) -> f32 {
        self.config.spacing
    }

    /// Set the space between the cells of an item.
    pub fn set_spacing(&mut self, spacing: f32) {
        if self.config.spacing != spacing {
            self.config.spacing = spacing;
            self.invalidate_sizes();
        }
    }

    /// Space between layout rows.
    pub fn row_spacing(&self) -> f32 {
        self.config.row_spacing
    }

    /// Set the space between layout rows.
    pub fn set_row_spacing(&mut self, spacing: f32) {
        if self.config.row_spacing != spacing {
            self.config.row_spacing = spacing;
            self.queue_layout();
        }
    }

    /// Space between layout columns.
    pub fn column_spacing(&self) -> f32 {
        self.config.column_spacing
    }

    /// Set the space between layout columns.
    pub fn set_column_spacing(&mut self, spacing: f32) {
        if self.config.column_spacing != spacing {
            self.config.column_spacing = spacing;
            self.queue_layout();
        }
    }

    /// Fixed item width, `None` for automatic.
    pub fn item_width(&self) -> Option<f32> {
        self.config.item_width
    }

    /// Set a fixed item width. Text cells wrap to it.
    pub fn set_item_width(&mut self, width: Option<f32>) {
        if self.config.item_width != width {
            self.config.item_width = width;
            self.invalidate_sizes();
        }
    }

    /// Fixed column count (row count in columns mode), `None` for automatic.
    pub fn columns(&self) -> Option<usize> {
        self.config.columns
    }

    /// Set a fixed column count (row count in columns mode).
    ///
    /// Items wider than one column count every column they span. An item
    /// wider than the whole cap still gets a row of its own.
    pub fn set_columns(&mut self, columns: Option<usize>) {
        if self.config.columns != columns {
            self.config.columns = columns;
            self.queue_layout();
        }
    }

    /// Whether items activate on single click.
    pub fn single_click(&self) -> bool {
        self.config.single_click
    }

    /// Enable single-click activation, with an optional hover-select delay.
    pub fn set_single_click(&mut self, enabled: bool, timeout: Option<std::time::Duration>) {
        self.config.single_click = enabled;
        self.config.single_click_timeout = timeout;
        if !enabled || timeout.is_none() {
            self.stop_hover_timer();
        }
    }

    /// Whether rows can be reordered by drag and drop.
    pub fn reorderable(&self) -> bool {
        self.config.reorderable
    }

    /// Allow reordering rows by dragging them inside the grid.
    ///
    /// Enables both the drag source and the drop destination.
    pub fn set_reorderable(&mut self, reorderable: bool) {
        self.config.reorderable = reorderable;
        self.drag_source_enabled = reorderable;
        self.drag_dest_enabled = reorderable;
    }

    // =========================================================================
    // Cells
    // =========================================================================

    /// The cell registry.
    pub fn cells(&self) -> &CellRegistry {
        &self.cells
    }

    /// Append a cell renderer.
    pub fn attach_cell(
        &mut self,
        renderer: impl CellRenderer + 'static,
        pack: PackSide,
        expand: bool,
    ) -> CellId {
        let id = self.cells.attach(Box::new(renderer), pack, expand);
        self.invalidate_sizes();
        id
    }

    /// Feed a renderer property from a model column.
    pub fn bind_attribute(&mut self, cell: CellId, property: &str, column: usize) -> Result<()> {
        self.cells
            .bind_attribute(cell, property, column, self.model.as_deref())?;
        self.invalidate_sizes();
        Ok(())
    }

    /// Install or remove a per-row data function.
    pub fn set_cell_data_func(&mut self, cell: CellId, func: Option<CellDataFunc>) -> Result<()> {
        self.cells.set_data_func(cell, func)?;
        self.invalidate_sizes();
        Ok(())
    }

    /// Remove every attribute binding of a cell.
    pub fn clear_cell_attributes(&mut self, cell: CellId) -> Result<()> {
        self.cells.clear_attributes(cell)?;
        self.invalidate_sizes();
        Ok(())
    }

    /// Remove a cell and return its renderer.
    pub fn detach_cell(&mut self, cell: CellId) -> Result<Box<dyn CellRenderer>> {
        if self.edited.is_some_and(|(_, c)| c == cell) {
            self.stop_editing(true);
        }
        let renderer = self.cells.detach(cell)?;
        if self.cursor_cell == Some(cell) {
            self.cursor_cell = None;
        }
        self.invalidate_sizes();
        Ok(renderer)
    }

    /// Move a cell to a new position.
    pub fn reorder_cell(&mut self, cell: CellId, position: usize) -> Result<()> {
        self.cells.reorder(cell, position)?;
        self.invalidate_sizes();
        Ok(())
    }

    /// Remove every cell.
    pub fn clear_cells(&mut self) {
        self.stop_editing(true);
        self.cells.clear();
        self.cursor_cell = None;
        self.invalidate_sizes();
    }

    /// Change a renderer's settings. Cached sizes are invalidated.
    pub fn with_renderer_mut<R>(
        &mut self,
        cell: CellId,
        f: impl FnOnce(&mut dyn CellRenderer) -> R,
    ) -> Result<R> {
        let renderer = self
            .cells
            .renderer_mut(cell)
            .ok_or_else(|| GridError::InvalidCell(cell).logged())?;
        let out = f(renderer);
        self.invalidate_sizes();
        Ok(out)
    }

    // =========================================================================
    // Model
    // =========================================================================

    /// The displayed data source.
    pub fn model(&self) -> Option<&Arc<dyn DataSource>> {
        self.model.as_ref()
    }

    /// Display a data source, or none.
    ///
    /// The previous model is disconnected and its items dropped; an item is
    /// created for every row of the new one.
    pub fn set_model(&mut self, model: Option<Arc<dyn DataSource>>) {
        self.teardown_model();
        let Some(model) = model else {
            self.queue_layout();
            return;
        };

        let signals = model.signals();
        let queue = self.changes.clone();
        let inserted = signals.row_inserted.connect_scoped(move |&(index, row)| {
            queue.lock().push_back(RowChange::Inserted(index, row));
        });
        let queue = self.changes.clone();
        let changed = signals.row_changed.connect_scoped(move |&(index, row)| {
            queue.lock().push_back(RowChange::Changed(index, row));
        });
        let queue = self.changes.clone();
        let deleted = signals.row_deleted.connect_scoped(move |&(index, row)| {
            queue.lock().push_back(RowChange::Deleted(index, row));
        });
        let queue = self.changes.clone();
        let reordered = signals.rows_reordered.connect_scoped(move |order: &Vec<usize>| {
            queue.lock().push_back(RowChange::Reordered(order.clone()));
        });
        self.model_guards = vec![inserted, changed, deleted, reordered];

        for index in 0..model.row_count() {
            if let Some(row) = model.row_id(index) {
                let key = self.items.insert(Item::new(row, self.order.len()));
                self.order.push(key);
                self.row_map.insert(row, key);
            }
        }
        tracing::debug!(target: targets::MODEL, rows = self.order.len(), "model set");
        self.model = Some(model);
        self.queue_layout();
    }

    /// Apply every queued model notification.
    ///
    /// Every entry point calls this first, including the queries that report
    /// rows, indices, selection, the cursor or hit results. Those take
    /// `&mut self` so they never see items whose rows are gone.
    pub fn sync_model(&mut self) {
        loop {
            let change = self.changes.lock().pop_front();
            let Some(change) = change else {
                break;
            };
            match change {
                RowChange::Inserted(index, row) => self.row_inserted(index, row),
                RowChange::Changed(index, row) => self.row_changed(index, row),
                RowChange::Deleted(index, row) => self.row_deleted(index, row),
                RowChange::Reordered(order) => self.rows_reordered(&order),
            }
        }
        let count = self.model.as_ref().map(|m| m.row_count());
        if count.is_some_and(|count| count != self.order.len()) {
            self.resync_from_model();
        }
    }

    /// A row was inserted at `index`.
    pub fn row_inserted(&mut self, index: usize, row: RowId) {
        if index > self.order.len() || self.row_map.contains_key(&row) {
            self.resync_from_model();
            return;
        }
        let key = self.items.insert(Item::new(row, index));
        self.order.insert(index, key);
        self.row_map.insert(row, key);
        self.reindex_from(index + 1);
        tracing::trace!(target: targets::MODEL, index, %row, "row inserted");
        self.queue_layout();
    }

    /// The values of the row at `index` changed.
    pub fn row_changed(&mut self, index: usize, row: RowId) {
        let Some(key) = self.checked_key(index, row) else {
            self.resync_from_model();
            return;
        };
        if self.edited.is_some_and(|(k, _)| k == key) {
            self.stop_editing(true);
        }
        self.items[key].invalidate();
        self.queue_layout();
    }

    /// The row at `index` was deleted.
    pub fn row_deleted(&mut self, index: usize, row: RowId) {
        let Some(key) = self.checked_key(index, row) else {
            self.resync_from_model();
            return;
        };
        self.forget_item(key);
        self.order.remove(index);
        self.row_map.remove(&row);
        let was_selected = self.items.remove(key).is_some_and(|item| item.selected);
        self.reindex_from(index);
        tracing::trace!(target: targets::MODEL, index, %row, "row deleted");
        self.queue_layout();
        if was_selected {
            self.selection_changed.emit(());
        }
    }

    /// Rows were permuted: the row formerly at `new_order[i]` is now at `i`.
    pub fn rows_reordered(&mut self, new_order: &[usize]) {
        let len = self.order.len();
        let mut seen = vec![false; len];
        let valid = new_order.len() == len
            && new_order
                .iter()
                .all(|&old| old < len && !std::mem::replace(&mut seen[old], true));
        if !valid {
            self.resync_from_model();
            return;
        }
        self.stop_editing(true);
        let old = std::mem::take(&mut self.order);
        self.order = new_order.iter().map(|&i| old[i]).collect();
        self.reindex_from(0);
        self.queue_layout();
    }

    /// Rebuild the item list from the model after a notification that did
    /// not match the mirrored state.
    ///
    /// Items keep their selection when their row survives.
    fn resync_from_model(&mut self) {
        tracing::warn!(target: targets::MODEL, "model notifications out of step, resynchronizing");
        self.changes.lock().clear();
        let Some(model) = self.model.clone() else {
            return;
        };

        let mut order = Vec::with_capacity(model.row_count());
        let mut row_map = HashMap::with_capacity(model.row_count());
        for index in 0..model.row_count() {
            let Some(row) = model.row_id(index) else {
                continue;
            };
            if row_map.contains_key(&row) {
                continue;
            }
            let key = match self.row_map.remove(&row) {
                Some(key) => key,
                None => self.items.insert(Item::new(row, index)),
            };
            order.push(key);
            row_map.insert(row, key);
        }

        let mut lost_selection = false;
        for (_, key) in std::mem::take(&mut self.row_map) {
            self.forget_item(key);
            lost_selection |= self.items.remove(key).is_some_and(|item| item.selected);
        }
        self.order = order;
        self.row_map = row_map;
        self.reindex_from(0);
        self.invalidate_sizes();
        if lost_selection {
            self.selection_changed.emit(());
        }
    }

    fn teardown_model(&mut self) {
        self.timers.clear();
        self.autoscroll = None;
        self.hover_timer = None;
        self.search.timer = None;
        self.hide_search();
        self.layout_task.cancel();
        self.model_guards.clear();
        self.changes.lock().clear();

        self.stop_editing(true);
        self.press = None;
        self.rubber_band = None;
        self.drag = None;
        self.drag_dest = None;
        self.anchor = None;
        self.prelit = None;
        self.last_single_clicked = None;
        let had_cursor = self.cursor.take().is_some();
        self.cursor_cell = None;

        let had_selection = self.items.values().any(|item| item.selected);
        self.items.clear();
        self.order.clear();
        self.row_map.clear();
        self.model = None;
        self.layout = LayoutState::default();
        self.scroll = Point::ZERO;
        self.damage.invalidate_all();

        if had_cursor {
            self.cursor_changed.emit(None);
        }
        if had_selection {
            self.selection_changed.emit(());
        }
    }

    /// Clear every handle that points at `key`.
    fn forget_item(&mut self, key: ItemKey) {
        if self.edited.is_some_and(|(k, _)| k == key) {
            self.stop_editing(true);
        }
        if self.anchor == Some(key) {
            self.anchor = None;
        }
        if self.prelit == Some(key) {
            self.prelit = None;
            self.stop_hover_timer();
        }
        if self.last_single_clicked == Some(key) {
            self.last_single_clicked = None;
        }
        if self.press.is_some_and(|p| p.item == Some(key)) {
            self.press = None;
        }
        if self.drag_dest.is_some_and(|(k, _)| k == key) {
            self.drag_dest = None;
        }
        if self.cursor == Some(key) {
            self.cursor = None;
            self.cursor_cell = None;
            self.cursor_changed.emit(None);
        }
    }

    fn checked_key(&self, index: usize, row: RowId) -> Option<ItemKey> {
        let key = *self.order.get(index)?;
        (self.items[key].row_id == row).then_some(key)
    }

    fn reindex_from(&mut self, start: usize) {
        for (index, &key) in self.order.iter().enumerate().skip(start) {
            self.items[key].index = index;
        }
    }

    // =========================================================================
    // Deferred layout and time
    // =========================================================================

    /// Schedule a re-layout on the next idle turn or paint.
    pub fn queue_layout(&mut self) {
        self.layout_task.schedule();
        self.damage.invalidate_all();
    }

    /// Drop every cached item size and schedule a re-layout.
    fn invalidate_sizes(&mut self) {
        for item in self.items.values_mut() {
            item.invalidate();
        }
        self.queue_layout();
    }

    /// Whether a re-layout is pending.
    pub fn needs_layout(&self) -> bool {
        self.layout_task.is_pending()
    }

    /// Apply queued model changes and run a pending layout now.
    pub fn flush_layout(&mut self) {
        self.sync_model();
        if self.layout_task.take().is_some() {
            self.run_layout();
        }
    }

    /// Idle work: model changes and a pending layout.
    pub fn process_idle(&mut self) {
        self.flush_layout();
    }

    /// Advance the grid clock, firing expired timers, then do idle work.
    pub fn tick(&mut self, now: Instant) {
        self.now = now;
        self.sync_model();
        for id in self.timers.process_expired(now) {
            if self.autoscroll.is_some_and(|a| a.timer == id) {
                self.autoscroll_step();
            } else if self.hover_timer.is_some_and(|(t, _)| t == id) {
                self.hover_timeout();
            } else if self.search.timer == Some(id) {
                tracing::trace!(target: targets::SEARCH, "search timed out");
                self.hide_search();
            }
        }
        self.process_idle();
    }

    /// Time until the next timer fires, for hosts that sleep between ticks.
    pub fn time_until_next_timer(&mut self) -> Option<std::time::Duration> {
        self.timers.time_until_next(self.now)
    }

    /// The grid clock as of the last [`tick`](Self::tick).
    pub fn now(&self) -> Instant {
        self.now
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of items.
    pub fn len(&mut self) -> usize {
        self.sync_model();
        self.order.len()
    }

    /// Returns `true` if the grid has no items.
    pub fn is_empty(&mut self) -> bool {
        self.sync_model();
        self.order.is_empty()
    }

    /// Row identity of the item at `index`.
    pub fn row_id_at(&mut self, index: usize) -> Option<RowId> {
        self.sync_model();
        self.order.get(index).map(|&key| self.items[key].row_id)
    }

    /// Index of the item showing `row`.
    pub fn index_of(&mut self, row: RowId) -> Option<usize> {
        self.sync_model();
        self.row_map.get(&row).map(|&key| self.items[key].index)
    }

    /// Bounding box of the item at `index` in content coordinates, `None`
    /// until it has been laid out.
    pub fn item_rect(&mut self, index: usize) -> Option<Rect> {
        self.sync_model();
        let item = &self.items[*self.order.get(index)?];
        item.is_placed().then_some(item.area)
    }

    /// Layout row and column of the item at `index`.
    pub fn item_grid_position(&mut self, index: usize) -> Option<GridPos> {
        self.sync_model();
        self.items[*self.order.get(index)?].grid
    }

    /// Size of the laid-out content.
    pub fn content_size(&self) -> Size {
        self.layout.content
    }

    /// Number of layout rows and columns.
    pub fn grid_dimensions(&self) -> (usize, usize) {
        (self.layout.rows, self.layout.cols)
    }

    /// Accumulated damage in widget coordinates.
    pub fn damage(&self) -> &DamageTracker {
        &self.damage
    }

    /// Whether the grid has keyboard focus.
    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    fn key_at(&self, index: usize) -> Result<ItemKey> {
        check_index(index, self.order.len())?;
        Ok(self.order[index])
    }

    fn row_of(&self, key: ItemKey) -> RowId {
        self.items[key].row_id
    }

    /// Queue a repaint of one item.
    fn damage_item(&mut self, key: ItemKey) {
        let Some(item) = self.items.get(key) else {
            return;
        };
        if item.is_placed() {
            let rect = item.area.offset(-self.scroll.x, -self.scroll.y);
            self.damage.add_damage(rect);
        }
    }

    fn sanitized_config(&self) -> GridConfig {
        self.config.sanitized()
    }
}

impl Drop for ItemGrid {
    fn drop(&mut self) {
        self.model_guards.clear();
        self.timers.clear();
        self.layout_task.cancel();
    }
}
