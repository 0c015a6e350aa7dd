// RenderLayerFactory - maps editor state onto RenderLayer variants
//
// Parameter mapping only: no blending, no validation, no state.

use crate::model::buffer::{PixelBuffer, PixelChange};
use crate::model::color::Color;
use crate::model::layer::Layer;
use crate::model::selection::SelectionState;
use crate::render::layer::{
    BaseRenderLayer, FloatingSelectionLayer, OnionSkinLayer, OverlayKind, OverlayLayer,
    RenderLayer, ShapePreviewLayer,
};

/// Stateless constructors, one per RenderLayer variant
pub struct RenderLayerFactory;

impl RenderLayerFactory {
    /// Wrap a persisted layer, keeping its opacity and visibility
    pub fn base(layer: &Layer, z_index: i32) -> Box<dyn RenderLayer> {
        Box::new(BaseRenderLayer::new(layer.clone(), z_index))
    }

    /// Floating selection placed at `rect.origin + offset`
    pub fn floating_selection(selection: &SelectionState, z_index: i32) -> Box<dyn RenderLayer> {
        Box::new(FloatingSelectionLayer::new(
            selection.pixels.clone(),
            selection.origin(),
            selection.opacity,
            z_index,
        ))
    }

    pub fn shape_preview(pixels: &[PixelChange], z_index: i32) -> Box<dyn RenderLayer> {
        Box::new(ShapePreviewLayer::new(pixels.to_vec(), z_index))
    }

    pub fn onion_skin(
        pixels: &PixelBuffer,
        tint: Color,
        tint_strength: f32,
        opacity: f32,
        z_index: i32,
    ) -> Box<dyn RenderLayer> {
        Box::new(OnionSkinLayer::new(
            pixels.clone(),
            tint,
            tint_strength,
            opacity,
            z_index,
        ))
    }

    pub fn overlay(kind: OverlayKind, color: Color, z_index: i32) -> Box<dyn RenderLayer> {
        Box::new(OverlayLayer::new(kind, color, z_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::selection::Offset;

    #[test]
    fn test_factory_passes_parameters_through() {
        let layer = Layer::new("a", 2, 2);
        let base = RenderLayerFactory::base(&layer, 7);
        assert_eq!(base.z_index(), 7);
        assert_eq!(base.kind(), "base");

        let mut selection = SelectionState::floating(PixelBuffer::filled(1, 1, Color::RED), 1, 1);
        selection.offset = Offset::new(2, 0);
        selection.opacity = 0.75;
        let floating = RenderLayerFactory::floating_selection(&selection, 9);
        assert_eq!(floating.opacity(), 0.75);

        let mut cells = Vec::new();
        floating.contribute(8, 8, &mut |x, y, _| cells.push((x, y)));
        assert_eq!(cells, vec![(3, 1)]);

        assert!(RenderLayerFactory::shape_preview(&[], 0).is_skippable());
        assert_eq!(
            RenderLayerFactory::overlay(OverlayKind::Border, Color::BLACK, 3).kind(),
            "overlay"
        );
    }
}
