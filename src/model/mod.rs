// Persisted and transient editor state
//
// - PixelBuffer / PixelChange: opaque addressable pixel grid and edit instruction
// - Layer / LayerStack: per-frame ordered layers (index 0 = topmost)
// - Frame / Timeline: frames each owning a layer stack behind a shared handle
// - SelectionState: transient, possibly floating selection

pub mod buffer;
pub mod color;
pub mod frame;
pub mod layer;
pub mod selection;

pub use buffer::{PixelBuffer, PixelChange};
pub use color::Color;
pub use frame::{Frame, Timeline, TimelineHandle};
pub use layer::{Layer, LayerStack, LayerStackError, LayerStackHandle};
pub use selection::{Offset, Rect, SelectionState};
