//! The ordered set of cells an item is composed of.
//!
//! Each attached renderer gets a [`CellDescriptor`] holding its pack side,
//! expand flag, attribute bindings and optional data function. Before an
//! item is measured or painted, [`CellRegistry::bind_row`] pushes that row's
//! values into every renderer.

use slotmap::{new_key_type, SlotMap};

use horizon_itemgrid_core::logging::targets;

use super::renderer::CellRenderer;
use crate::error::{GridError, Result};
use crate::model::DataSource;

new_key_type! {
    /// Handle of an attached cell.
    pub struct CellId;
}

/// Which end of the item a cell is packed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PackSide {
    /// Laid out first, in position order.
    #[default]
    Start,
    /// Laid out after every start cell, in position order.
    End,
}

/// Per-row callback that computes renderer properties.
///
/// Runs after the attribute bindings, so it can override them.
pub type CellDataFunc = Box<dyn Fn(&mut dyn CellRenderer, &dyn DataSource, usize)>;

/// One attached cell.
pub struct CellDescriptor {
    renderer: Box<dyn CellRenderer>,
    position: usize,
    pack: PackSide,
    expand: bool,
    bindings: Vec<(String, usize)>,
    data_func: Option<CellDataFunc>,
}

impl std::fmt::Debug for CellDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellDescriptor")
            .field("renderer", &self.renderer)
            .field("position", &self.position)
            .field("pack", &self.pack)
            .field("expand", &self.expand)
            .field("bindings", &self.bindings)
            .field("data_func", &self.data_func.is_some())
            .finish()
    }
}

impl CellDescriptor {
    /// The renderer.
    pub fn renderer(&self) -> &dyn CellRenderer {
        self.renderer.as_ref()
    }

    /// Index in registry order.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Pack side.
    pub fn pack(&self) -> PackSide {
        self.pack
    }

    /// Whether the cell takes a share of extra space along the stacking axis.
    pub fn expand(&self) -> bool {
        self.expand
    }

    /// Attribute bindings as `(property, column)` pairs.
    pub fn bindings(&self) -> &[(String, usize)] {
        &self.bindings
    }

    /// Whether a data function is installed.
    pub fn has_data_func(&self) -> bool {
        self.data_func.is_some()
    }
}

/// Ordered collection of cell descriptors.
#[derive(Debug, Default)]
pub struct CellRegistry {
    cells: SlotMap<CellId, CellDescriptor>,
    order: Vec<CellId>,
}

impl CellRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attached cells.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no cell is attached.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether `cell` is attached.
    pub fn contains(&self, cell: CellId) -> bool {
        self.cells.contains_key(cell)
    }

    /// Append a renderer.
    pub fn attach(
        &mut self,
        renderer: Box<dyn CellRenderer>,
        pack: PackSide,
        expand: bool,
    ) -> CellId {
        let position = self.order.len();
        let name = renderer.name();
        let id = self.cells.insert(CellDescriptor {
            renderer,
            position,
            pack,
            expand,
            bindings: Vec::new(),
            data_func: None,
        });
        self.order.push(id);
        tracing::debug!(target: targets::CELLS, renderer = name, position, ?pack, "cell attached");
        id
    }

    /// Map a renderer property to a model column.
    ///
    /// The property must exist on the renderer. With a model, the column must
    /// be in range and of a type the property accepts. Binding the same
    /// property again replaces the earlier column.
    pub fn bind_attribute(
        &mut self,
        cell: CellId,
        property: &str,
        column: usize,
        model: Option<&dyn DataSource>,
    ) -> Result<()> {
        let desc = self.descriptor_mut(cell)?;
        let Some(expected) = desc.renderer.property_kind(property) else {
            return Err(GridError::unknown_property(desc.renderer.name(), property).logged());
        };
        if let Some(model) = model {
            let count = model.column_count();
            let Some(found) = model.column_kind(column) else {
                return Err(GridError::ColumnOutOfRange { column, count }.logged());
            };
            if !expected.accepts(found) {
                return Err(GridError::type_mismatch(property, expected, Some(found)).logged());
            }
        }

        match desc.bindings.iter_mut().find(|(p, _)| p == property) {
            Some(binding) => binding.1 = column,
            None => desc.bindings.push((property.to_owned(), column)),
        }
        Ok(())
    }

    /// Install or remove the per-row data function.
    pub fn set_data_func(&mut self, cell: CellId, func: Option<CellDataFunc>) -> Result<()> {
        self.descriptor_mut(cell)?.data_func = func;
        Ok(())
    }

    /// Remove every attribute binding of `cell`.
    pub fn clear_attributes(&mut self, cell: CellId) -> Result<()> {
        self.descriptor_mut(cell)?.bindings.clear();
        Ok(())
    }

    /// Remove a cell, returning its renderer.
    pub fn detach(&mut self, cell: CellId) -> Result<Box<dyn CellRenderer>> {
        let desc = self
            .cells
            .remove(cell)
            .ok_or_else(|| GridError::InvalidCell(cell).logged())?;
        self.order.retain(|&id| id != cell);
        self.renumber();
        tracing::debug!(target: targets::CELLS, renderer = desc.renderer.name(), "cell detached");
        Ok(desc.renderer)
    }

    /// Move a cell to `position` in registry order.
    pub fn reorder(&mut self, cell: CellId, position: usize) -> Result<()> {
        if !self.cells.contains_key(cell) {
            return Err(GridError::InvalidCell(cell).logged());
        }
        let len = self.order.len();
        if position >= len {
            return Err(GridError::InvalidPosition { position, len }.logged());
        }
        self.order.retain(|&id| id != cell);
        self.order.insert(position, cell);
        self.renumber();
        Ok(())
    }

    /// Remove every cell.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.order.clear();
    }

    /// Cells in registry order.
    pub fn order(&self) -> &[CellId] {
        &self.order
    }

    /// Cells in layout order: start cells, then end cells, each in
    /// registry order.
    pub fn visual_order(&self) -> Vec<CellId> {
        [PackSide::Start, PackSide::End]
            .into_iter()
            .flat_map(|side| {
                self.order
                    .iter()
                    .copied()
                    .filter(move |&id| self.cells[id].pack == side)
            })
            .collect()
    }

    /// Descriptor of `cell`.
    pub fn descriptor(&self, cell: CellId) -> Option<&CellDescriptor> {
        self.cells.get(cell)
    }

    /// Renderer of `cell`.
    pub fn renderer(&self, cell: CellId) -> Option<&dyn CellRenderer> {
        self.cells.get(cell).map(|d| d.renderer.as_ref())
    }

    /// Renderer of `cell`, mutably.
    pub fn renderer_mut(&mut self, cell: CellId) -> Option<&mut (dyn CellRenderer + 'static)> {
        self.cells.get_mut(cell).map(|d| d.renderer.as_mut())
    }

    /// Push the values of `row` into every renderer.
    ///
    /// Bindings are applied first, then data functions. A value the renderer
    /// rejects is logged and skipped; the other properties are still set.
    pub fn bind_row(&mut self, model: &dyn DataSource, row: usize) {
        for &id in &self.order {
            let CellDescriptor {
                renderer,
                bindings,
                data_func,
                ..
            } = &mut self.cells[id];
            for (property, column) in bindings.iter() {
                let value = model.value(row, *column);
                if let Err(error) = renderer.set_property(property, &value) {
                    tracing::warn!(
                        target: targets::CELLS,
                        row,
                        column,
                        %error,
                        "attribute not applied"
                    );
                }
            }
            if let Some(func) = data_func {
                func(renderer.as_mut(), model, row);
            }
        }
    }

    fn descriptor_mut(&mut self, cell: CellId) -> Result<&mut CellDescriptor> {
        self.cells
            .get_mut(cell)
            .ok_or_else(|| GridError::InvalidCell(cell).logged())
    }

    fn renumber(&mut self) {
        for (position, &id) in self.order.iter().enumerate() {
            self.cells[id].position = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{IconRenderer, TextRenderer};
    use crate::model::{CellValue, ColumnKind, ListStore};

    fn store() -> ListStore {
        let s = ListStore::new(vec![ColumnKind::Icon, ColumnKind::Text, ColumnKind::Bool]);
        s.push(vec![CellValue::Icon("folder".into()), "Documents".into()]);
        s
    }

    #[test]
    fn test_attach_assigns_positions() {
        let mut reg = CellRegistry::new();
        let a = reg.attach(Box::new(IconRenderer::new()), PackSide::Start, false);
        let b = reg.attach(Box::new(TextRenderer::new()), PackSide::Start, true);
        assert_eq!(reg.descriptor(a).unwrap().position(), 0);
        assert_eq!(reg.descriptor(b).unwrap().position(), 1);
        assert!(reg.descriptor(b).unwrap().expand());
    }

    #[test]
    fn test_bind_attribute_validates() {
        let s = store();
        let mut reg = CellRegistry::new();
        let icon = reg.attach(Box::new(IconRenderer::new()), PackSide::Start, false);

        assert!(reg.bind_attribute(icon, "icon", 0, Some(&s)).is_ok());
        // Icon properties accept text columns.
        assert!(reg.bind_attribute(icon, "icon", 1, Some(&s)).is_ok());
        assert_eq!(reg.descriptor(icon).unwrap().bindings().len(), 1);

        assert!(matches!(
            reg.bind_attribute(icon, "icon", 2, Some(&s)),
            Err(GridError::TypeMismatch { .. })
        ));
        assert!(matches!(
            reg.bind_attribute(icon, "icon", 9, Some(&s)),
            Err(GridError::ColumnOutOfRange { column: 9, count: 3 })
        ));
        assert!(matches!(
            reg.bind_attribute(icon, "pixbuf", 0, Some(&s)),
            Err(GridError::UnknownProperty { .. })
        ));
        // Without a model only the property is checked.
        assert!(reg.bind_attribute(icon, "icon", 9, None).is_ok());
    }

    #[test]
    fn test_detach_compacts_positions() {
        let mut reg = CellRegistry::new();
        let a = reg.attach(Box::new(IconRenderer::new()), PackSide::Start, false);
        let b = reg.attach(Box::new(TextRenderer::new()), PackSide::Start, false);
        let c = reg.attach(Box::new(TextRenderer::new()), PackSide::Start, false);

        let renderer = reg.detach(a).unwrap();
        assert_eq!(renderer.name(), "icon");
        assert_eq!(reg.descriptor(b).unwrap().position(), 0);
        assert_eq!(reg.descriptor(c).unwrap().position(), 1);
        assert!(matches!(reg.detach(a), Err(GridError::InvalidCell(_))));
    }

    #[test]
    fn test_reorder_and_visual_order() {
        let mut reg = CellRegistry::new();
        let a = reg.attach(Box::new(IconRenderer::new()), PackSide::End, false);
        let b = reg.attach(Box::new(TextRenderer::new()), PackSide::Start, false);
        let c = reg.attach(Box::new(TextRenderer::new()), PackSide::Start, false);

        assert_eq!(reg.visual_order(), vec![b, c, a]);
        reg.reorder(c, 0).unwrap();
        assert_eq!(reg.order(), &[c, a, b]);
        assert_eq!(reg.descriptor(b).unwrap().position(), 2);
        assert_eq!(reg.visual_order(), vec![c, b, a]);
        assert!(reg.reorder(c, 3).is_err());
    }

    #[test]
    fn test_bind_row_applies_bindings_then_func() {
        let s = store();
        let mut reg = CellRegistry::new();
        let text = reg.attach(Box::new(TextRenderer::new()), PackSide::Start, false);
        reg.bind_attribute(text, "text", 1, Some(&s)).unwrap();

        reg.bind_row(&s, 0);
        let size = reg
            .renderer(text)
            .unwrap()
            .preferred_size(&Default::default());
        assert_eq!(size.width, 9.0 * 7.0);

        reg.set_data_func(
            text,
            Some(Box::new(|r, _model, _row| {
                r.set_property("text", &CellValue::from("x")).unwrap();
            })),
        )
        .unwrap();
        reg.bind_row(&s, 0);
        let size = reg
            .renderer(text)
            .unwrap()
            .preferred_size(&Default::default());
        assert_eq!(size.width, 7.0);

        reg.clear_attributes(text).unwrap();
        assert!(reg.descriptor(text).unwrap().bindings().is_empty());
        reg.clear();
        assert!(reg.is_empty());
    }
}
