// Frame and Timeline - animation frames, each owning its own layer stack

use crate::model::layer::{LayerStack, LayerStackHandle};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a timeline view-model
pub type TimelineHandle = Rc<RefCell<Timeline>>;

/// Default display time of a new frame
pub const DEFAULT_FRAME_DURATION_MS: u32 = 100;

/// One timeline entry
///
/// The layer stack sits behind its own handle so layer commands can target a
/// single frame. Deleting the frame drops the last strong reference, which
/// turns those commands into no-ops.
#[derive(Debug, PartialEq)]
pub struct Frame {
    layers: LayerStackHandle,
    /// Display time in milliseconds
    pub duration_ms: u32,
}

impl Frame {
    pub fn new(layers: LayerStack) -> Self {
        Self {
            layers: layers.into_handle(),
            duration_ms: DEFAULT_FRAME_DURATION_MS,
        }
    }

    /// Shared handle to this frame's layer stack
    pub fn layers(&self) -> LayerStackHandle {
        Rc::clone(&self.layers)
    }

    /// Deep copy: the duplicate gets its own independent layer stack
    pub fn duplicate(&self) -> Self {
        Self {
            layers: self.layers.borrow().clone().into_handle(),
            duration_ms: self.duration_ms,
        }
    }
}

/// Ordered frames plus the current-frame cursor
#[derive(Debug, PartialEq)]
pub struct Timeline {
    frames: Vec<Frame>,
    current: usize,
}

impl Timeline {
    /// Create a timeline with a single frame
    pub fn new(first: Frame) -> Self {
        Self {
            frames: vec![first],
            current: 0,
        }
    }

    /// Single frame holding one empty layer
    pub fn with_canvas(width: u32, height: u32) -> Self {
        Self::new(Frame::new(LayerStack::new(width, height)))
    }

    pub fn into_handle(self) -> TimelineHandle {
        Rc::new(RefCell::new(self))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Index of the current frame
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_frame(&self) -> &Frame {
        &self.frames[self.current]
    }

    /// Move the cursor. Out-of-range indices are ignored.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index < self.frames.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    /// Append a frame at the end and return its index
    pub fn add_frame(&mut self, frame: Frame) -> usize {
        self.frames.push(frame);
        self.frames.len() - 1
    }

    /// Insert a deep copy of the frame at `source` right after it.
    ///
    /// The copy becomes the current frame. Returns its index, or `None` if
    /// `source` is out of range.
    pub fn duplicate_frame(&mut self, source: usize) -> Option<usize> {
        let copy = self.frames.get(source)?.duplicate();
        let index = source + 1;
        self.frames.insert(index, copy);
        self.current = index;
        Some(index)
    }

    /// Remove the frame at `index`.
    ///
    /// Out-of-range indices and removing the only frame are no-ops. The
    /// cursor keeps pointing at the same frame where possible.
    pub fn delete_frame(&mut self, index: usize) -> Option<Frame> {
        if self.frames.len() <= 1 || index >= self.frames.len() {
            return None;
        }

        let removed = self.frames.remove(index);
        if self.current > index {
            self.current -= 1;
        }
        self.current = self.current.min(self.frames.len() - 1);
        Some(removed)
    }
}
