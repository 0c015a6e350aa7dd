// Layer and LayerStack - persisted per-frame layer model
//
// Index 0 is the topmost layer for editing and is drawn last by the
// compositor. Indices are positions, not identities: any reorder changes
// which Layer an index refers to.

use crate::model::buffer::{PixelBuffer, PixelChange};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a layer stack view-model
///
/// Commands keep a `Weak` version of this so an undo history never keeps a
/// stack alive after its frame has been deleted.
pub type LayerStackHandle = Rc<RefCell<LayerStack>>;

/// One persisted raster layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub pixels: PixelBuffer,
    /// Opacity (0.0 to 1.0)
    pub opacity: f32,
    pub visible: bool,
}

impl Layer {
    /// Create an empty visible layer at full opacity
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self::with_pixels(name, PixelBuffer::new(width, height))
    }

    /// Wrap an existing pixel buffer
    pub fn with_pixels(name: impl Into<String>, pixels: PixelBuffer) -> Self {
        Self {
            name: name.into(),
            pixels,
            opacity: 1.0,
            visible: true,
        }
    }
}

/// Layer stack error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayerStackError {
    #[error("A layer stack must hold at least one layer")]
    Empty,
}

/// Ordered layers of one frame plus the selected-layer cursor
///
/// Never empty. Deserialized stacks go through the same check as
/// `from_layers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLayerStack")]
pub struct LayerStack {
    layers: Vec<Layer>,
    selected: usize,
}

/// Unchecked on-disk shape of a `LayerStack`
#[derive(Deserialize)]
struct RawLayerStack {
    layers: Vec<Layer>,
    #[serde(default)]
    selected: usize,
}

impl TryFrom<RawLayerStack> for LayerStack {
    type Error = LayerStackError;

    fn try_from(raw: RawLayerStack) -> Result<Self, Self::Error> {
        let mut stack = Self::from_layers(raw.layers)?;
        stack.set_selected(raw.selected);
        Ok(stack)
    }
}

impl LayerStack {
    /// Create a stack holding a single empty layer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            layers: vec![Layer::new("Layer 1", width, height)],
            selected: 0,
        }
    }

    /// Create a stack from existing layers (index 0 = topmost)
    ///
    /// # Errors
    /// Returns `LayerStackError::Empty` if `layers` is empty.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Self, LayerStackError> {
        if layers.is_empty() {
            return Err(LayerStackError::Empty);
        }

        Ok(Self {
            layers,
            selected: 0,
        })
    }

    /// Move the stack behind a shared handle
    pub fn into_handle(self) -> LayerStackHandle {
        Rc::new(RefCell::new(self))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    /// Index of the selected layer
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Select a layer. Out-of-range indices are ignored.
    pub fn set_selected(&mut self, index: usize) -> bool {
        if index < self.layers.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    /// Insert a new layer on top (index 0) and select it
    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.insert(0, layer);
        self.selected = 0;
    }

    /// Remove a layer; refuses to remove the last remaining layer
    pub fn remove_layer(&mut self, index: usize) -> Option<Layer> {
        if self.layers.len() <= 1 || index >= self.layers.len() {
            return None;
        }

        let removed = self.layers.remove(index);
        self.selected = self.selected.min(self.layers.len() - 1);
        Some(removed)
    }

    /// Move the layers at `sources` so the first of them lands at `destination`.
    ///
    /// Moved layers keep their relative order. The destination is clamped to
    /// the end of the stack and the moved block becomes selected. Returns
    /// false without changing anything if any source index is out of range.
    pub fn move_layers(&mut self, sources: &[usize], destination: usize) -> bool {
        let mut sources = sources.to_vec();
        sources.sort_unstable();
        sources.dedup();

        if sources.is_empty() || sources.iter().any(|&index| index >= self.layers.len()) {
            return false;
        }

        let mut moved: Vec<Layer> = sources
            .iter()
            .rev()
            .map(|&index| self.layers.remove(index))
            .collect();
        moved.reverse();

        let destination = destination.min(self.layers.len());
        self.layers.splice(destination..destination, moved);
        self.selected = destination;
        true
    }

    /// Set a layer's opacity (clamped to 0.0 - 1.0)
    pub fn set_opacity(&mut self, index: usize, opacity: f32) -> bool {
        match self.layers.get_mut(index) {
            Some(layer) => {
                layer.opacity = opacity.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }

    pub fn set_visibility(&mut self, index: usize, visible: bool) -> bool {
        match self.layers.get_mut(index) {
            Some(layer) => {
                layer.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Write one pixel change into a layer
    pub fn apply_change(&mut self, index: usize, change: &PixelChange) -> bool {
        self.layers
            .get_mut(index)
            .is_some_and(|layer| layer.pixels.apply(change))
    }

    /// Value copy of the current ordering
    pub fn snapshot(&self) -> Vec<Layer> {
        self.layers.clone()
    }

    /// Replace the ordering with a previously captured snapshot.
    ///
    /// Empty snapshots are ignored. The selection is clamped into range.
    pub fn restore(&mut self, snapshot: Vec<Layer>) -> bool {
        if snapshot.is_empty() {
            return false;
        }

        self.layers = snapshot;
        self.selected = self.selected.min(self.layers.len() - 1);
        true
    }
}
