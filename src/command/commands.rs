// Concrete command implementations

use crate::command::pixel_apply::LayerPixelApplicable;
use crate::command::trait_def::{CommandError, CommandResult, UndoableCommand};
use crate::model::buffer::PixelChange;
use crate::model::frame::{Timeline, TimelineHandle};
use crate::model::layer::{Layer, LayerStack, LayerStackHandle};
use log::debug;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

/// Command to reorder layers
///
/// Undo restores a full value snapshot of the ordering captured at
/// construction instead of computing an inverse permutation. A move that was
/// skipped on execute is skipped on undo as well.
pub struct MoveLayerCommand {
    target: Weak<RefCell<LayerStack>>,
    sources: Vec<usize>,
    destination: usize,
    snapshot: Vec<Layer>,
    applied: bool,
}

impl MoveLayerCommand {
    /// Create a new MoveLayerCommand
    ///
    /// # Arguments
    /// * `target` - The layer stack to reorder
    /// * `sources` - Indices of the layers to move
    /// * `destination` - Index the first moved layer ends up at
    pub fn new(target: &LayerStackHandle, sources: Vec<usize>, destination: usize) -> Self {
        Self {
            target: Rc::downgrade(target),
            snapshot: target.borrow().snapshot(),
            sources,
            destination,
            applied: false,
        }
    }

    /// Move a single layer
    pub fn single(target: &LayerStackHandle, source: usize, destination: usize) -> Self {
        Self::new(target, vec![source], destination)
    }
}

impl UndoableCommand for MoveLayerCommand {
    fn execute(&mut self) {
        let Some(stack) = self.target.upgrade() else {
            debug!("Move layer skipped: layer stack no longer exists");
            return;
        };

        self.applied = stack
            .borrow_mut()
            .move_layers(&self.sources, self.destination);
        if !self.applied {
            debug!("Move layer skipped: source {:?} out of range", self.sources);
        }
    }

    fn undo(&mut self) {
        if !std::mem::take(&mut self.applied) {
            debug!("Move layer undo skipped: move was never applied");
            return;
        }

        let Some(stack) = self.target.upgrade() else {
            debug!("Move layer undo skipped: layer stack no longer exists");
            return;
        };

        let mut stack = stack.borrow_mut();
        if stack.restore(self.snapshot.clone()) {
            // Put the cursor back on the layer the user started dragging
            if let Some(&first) = self.sources.first() {
                stack.set_selected(first);
            }
        }
    }

    fn description(&self) -> String {
        match self.sources.as_slice() {
            [single] => format!("Move Layer #{} to #{}", single, self.destination),
            many => format!("Move {} Layers to #{}", many.len(), self.destination),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Command to duplicate a frame on the timeline
///
/// The index of the copy is chosen by the timeline, so it is recorded after
/// execute() rather than at construction.
pub struct DuplicateFrameCommand {
    target: Weak<RefCell<Timeline>>,
    source_index: usize,
    previous_current: usize,
    new_index: Option<usize>,
}

impl DuplicateFrameCommand {
    pub fn new(target: &TimelineHandle, source_index: usize) -> Self {
        Self {
            target: Rc::downgrade(target),
            source_index,
            previous_current: target.borrow().current(),
            new_index: None,
        }
    }

    /// Index the duplicate was inserted at by the last execute()
    pub fn new_index(&self) -> Option<usize> {
        self.new_index
    }
}

impl UndoableCommand for DuplicateFrameCommand {
    fn execute(&mut self) {
        let Some(timeline) = self.target.upgrade() else {
            debug!("Duplicate frame skipped: timeline no longer exists");
            return;
        };

        self.new_index = timeline.borrow_mut().duplicate_frame(self.source_index);
        if self.new_index.is_none() {
            debug!(
                "Duplicate frame skipped: frame #{} out of range",
                self.source_index
            );
        }
    }

    fn undo(&mut self) {
        let Some(timeline) = self.target.upgrade() else {
            debug!("Duplicate frame undo skipped: timeline no longer exists");
            return;
        };

        let Some(index) = self.new_index.take() else {
            return;
        };

        let mut timeline = timeline.borrow_mut();
        if index < timeline.len() {
            timeline.delete_frame(index);
            timeline.set_current(self.previous_current);
        } else {
            debug!("Duplicate frame undo skipped: frame #{} out of range", index);
        }
    }

    fn description(&self) -> String {
        format!("Duplicate Frame #{}", self.source_index)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Command to set a layer's opacity
///
/// A scalar overwrite is its own inverse, so only the old and new values are
/// kept. Consecutive changes to the same layer merge into one history entry.
pub struct SetLayerOpacityCommand {
    target: Weak<RefCell<LayerStack>>,
    layer_index: usize,
    old_opacity: f32,
    new_opacity: f32,
}

impl SetLayerOpacityCommand {
    /// Create a new SetLayerOpacityCommand
    ///
    /// # Arguments
    /// * `target` - The layer stack holding the layer
    /// * `layer_index` - Index of the layer to change
    /// * `old_opacity` - Value restored by undo
    /// * `new_opacity` - Value written by execute (clamped to 0.0 - 1.0)
    pub fn new(
        target: &LayerStackHandle,
        layer_index: usize,
        old_opacity: f32,
        new_opacity: f32,
    ) -> Self {
        Self {
            target: Rc::downgrade(target),
            layer_index,
            old_opacity,
            new_opacity: new_opacity.clamp(0.0, 1.0),
        }
    }

    /// Read the old opacity from the layer as it is right now
    pub fn from_current(target: &LayerStackHandle, layer_index: usize, new_opacity: f32) -> Self {
        let old_opacity = target
            .borrow()
            .layer(layer_index)
            .map_or(new_opacity, |layer| layer.opacity);
        Self::new(target, layer_index, old_opacity, new_opacity)
    }

    fn write(&self, opacity: f32) {
        let Some(stack) = self.target.upgrade() else {
            debug!("Set layer opacity skipped: layer stack no longer exists");
            return;
        };

        if !stack.borrow_mut().set_opacity(self.layer_index, opacity) {
            debug!(
                "Set layer opacity skipped: layer #{} out of range",
                self.layer_index
            );
        }
    }
}

impl UndoableCommand for SetLayerOpacityCommand {
    fn execute(&mut self) {
        self.write(self.new_opacity);
    }

    fn undo(&mut self) {
        self.write(self.old_opacity);
    }

    fn description(&self) -> String {
        format!(
            "Set Layer #{} Opacity to {:.2}",
            self.layer_index, self.new_opacity
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn can_merge_with(&self, other: &dyn UndoableCommand) -> bool {
        other
            .as_any()
            .downcast_ref::<SetLayerOpacityCommand>()
            .is_some_and(|other| {
                other.layer_index == self.layer_index && other.target.ptr_eq(&self.target)
            })
    }

    fn merge_with(&mut self, other: &dyn UndoableCommand) -> CommandResult<()> {
        let other = other
            .as_any()
            .downcast_ref::<SetLayerOpacityCommand>()
            .ok_or_else(|| CommandError::MergeFailed(other.description()))?;

        // Keep the original old_opacity, adopt the latest value
        self.new_opacity = other.new_opacity;
        Ok(())
    }
}

/// Command to show or hide a layer
pub struct SetLayerVisibilityCommand {
    target: Weak<RefCell<LayerStack>>,
    layer_index: usize,
    old_visible: bool,
    new_visible: bool,
}

impl SetLayerVisibilityCommand {
    pub fn new(target: &LayerStackHandle, layer_index: usize, visible: bool) -> Self {
        let old_visible = target
            .borrow()
            .layer(layer_index)
            .map_or(visible, |layer| layer.visible);

        Self {
            target: Rc::downgrade(target),
            layer_index,
            old_visible,
            new_visible: visible,
        }
    }

    fn write(&self, visible: bool) {
        let Some(stack) = self.target.upgrade() else {
            debug!("Set layer visibility skipped: layer stack no longer exists");
            return;
        };

        if !stack.borrow_mut().set_visibility(self.layer_index, visible) {
            debug!(
                "Set layer visibility skipped: layer #{} out of range",
                self.layer_index
            );
        }
    }
}

impl UndoableCommand for SetLayerVisibilityCommand {
    fn execute(&mut self) {
        self.write(self.new_visible);
    }

    fn undo(&mut self) {
        self.write(self.old_visible);
    }

    fn description(&self) -> String {
        let verb = if self.new_visible { "Show" } else { "Hide" };
        format!("{} Layer #{}", verb, self.layer_index)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Command to paint a batch of pixels onto one layer
///
/// The colour under every touched coordinate is recorded at construction, so
/// undo writes back exactly what was there. When a coordinate appears more
/// than once, the last change wins on execute and undo restores the colour
/// from before the first one.
pub struct ApplyPixelsCommand {
    target: Weak<RefCell<LayerStack>>,
    layer_index: usize,
    changes: Vec<PixelChange>,
    previous: Vec<PixelChange>,
}

impl ApplyPixelsCommand {
    pub fn new(target: &LayerStackHandle, layer_index: usize, changes: Vec<PixelChange>) -> Self {
        let previous = match target.borrow().layer(layer_index) {
            Some(layer) => {
                let mut seen = HashSet::new();
                changes
                    .iter()
                    .filter(|change| layer.pixels.contains(change.x, change.y))
                    .filter(|change| seen.insert((change.x, change.y)))
                    .map(|change| {
                        PixelChange::new(change.x, change.y, layer.pixels.get(change.x, change.y))
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        Self {
            target: Rc::downgrade(target),
            layer_index,
            changes,
            previous,
        }
    }

    pub fn changes(&self) -> &[PixelChange] {
        &self.changes
    }
}

impl LayerPixelApplicable for ApplyPixelsCommand {
    fn target(&self) -> &Weak<RefCell<LayerStack>> {
        &self.target
    }

    fn layer_index(&self) -> usize {
        self.layer_index
    }
}

impl UndoableCommand for ApplyPixelsCommand {
    fn execute(&mut self) {
        self.apply_pixel_changes(&self.changes);
    }

    fn undo(&mut self) {
        self.apply_pixel_changes(&self.previous);
    }

    fn description(&self) -> String {
        format!(
            "Paint {} Pixels on Layer #{}",
            self.changes.len(),
            self.layer_index
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
