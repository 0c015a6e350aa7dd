// Pixelforge - undo-capable editing core for frame-based pixel art

pub mod command;
pub mod config;
pub mod model;
pub mod render;

// Re-export commonly used types for convenience
pub use command::{CommandManager, UndoableCommand};
pub use config::{ConfigError, EditorConfig};
pub use model::{
    Color, Frame, Layer, LayerStack, LayerStackHandle, PixelBuffer, PixelChange, SelectionState,
    Timeline, TimelineHandle,
};
pub use render::{CanvasCompositor, RenderInput, RenderLayerManager};
