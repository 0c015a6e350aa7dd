// Layered compositing
//
// - RenderLayer trait + variants: Base, FloatingSelection, ShapePreview, OnionSkin, Overlay
// - RenderLayerFactory: stateless constructors for those variants
// - CanvasCompositor: back-to-front source-over blending in insertion order
// - RenderLayerManager: builds the per-pass layer sequence from editor state

pub mod compositor;
pub mod factory;
pub mod layer;
pub mod manager;

pub use compositor::CanvasCompositor;
pub use factory::RenderLayerFactory;
pub use layer::{OverlayKind, RenderLayer};
pub use manager::{OnionSkinSource, OverlaySource, RenderInput, RenderLayerManager};
