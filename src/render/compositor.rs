// CanvasCompositor - flattens an ordered RenderLayer sequence into one buffer

use crate::model::buffer::PixelBuffer;
use crate::model::color::Color;
use crate::render::layer::RenderLayer;
use log::trace;

/// Back-to-front alpha compositor
///
/// Layers are blended in the order they were added (first added = bottom).
/// The compositor never sorts: callers own the ordering.
#[derive(Default)]
pub struct CanvasCompositor {
    layers: Vec<Box<dyn RenderLayer>>,
}

impl CanvasCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every layer; called at the start of each composite pass
    pub fn clear_layers(&mut self) {
        self.layers.clear();
    }

    /// Append a layer on top of the ones already added
    pub fn add_layer(&mut self, layer: Box<dyn RenderLayer>) {
        self.layers.push(layer);
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Layers in blend order
    pub fn layers(&self) -> &[Box<dyn RenderLayer>] {
        &self.layers
    }

    /// Blend every layer onto a transparent `width` x `height` buffer.
    ///
    /// Each contributed pixel is source-over blended using the layer's
    /// opacity. Skippable layers and off-canvas pixels leave the result
    /// untouched.
    pub fn composite(&self, width: u32, height: u32) -> PixelBuffer {
        let mut output = PixelBuffer::new(width, height);

        for layer in &self.layers {
            if layer.is_skippable() {
                trace!("Skipping {} layer (z {})", layer.kind(), layer.z_index());
                continue;
            }

            let opacity = layer.opacity();
            layer.contribute(width, height, &mut |x, y, color| {
                if output.contains(x, y) {
                    let blended = Color::blend_over(output.get(x, y), color, opacity);
                    output.set(x, y, blended);
                }
            });
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::buffer::PixelChange;
    use crate::model::layer::Layer;
    use crate::render::factory::RenderLayerFactory;

    fn solid(color: Color, opacity: f32) -> Layer {
        let mut layer = Layer::with_pixels("solid", PixelBuffer::filled(2, 2, color));
        layer.opacity = opacity;
        layer
    }

    #[test]
    fn test_empty_compositor_is_transparent() {
        let compositor = CanvasCompositor::new();
        let output = compositor.composite(3, 2);
        assert_eq!(output.width(), 3);
        assert_eq!(output.height(), 2);
        assert!(output.is_empty());
    }

    #[test]
    fn test_last_added_is_on_top() {
        let mut compositor = CanvasCompositor::new();
        compositor.add_layer(RenderLayerFactory::base(&solid(Color::BLUE, 1.0), 1));
        compositor.add_layer(RenderLayerFactory::base(&solid(Color::RED, 1.0), 0));

        assert_eq!(compositor.composite(2, 2).get(1, 1), Some(Color::RED));
    }

    #[test]
    fn test_half_opacity_blend() {
        let mut compositor = CanvasCompositor::new();
        compositor.add_layer(RenderLayerFactory::base(&solid(Color::BLUE, 1.0), 1));
        compositor.add_layer(RenderLayerFactory::base(&solid(Color::RED, 0.5), 0));

        let pixel = compositor.composite(2, 2).get(0, 0).unwrap();
        assert_eq!((pixel.r, pixel.g, pixel.b, pixel.a), (128, 0, 128, 255));
    }

    #[test]
    fn test_skippable_layers_match_omission() {
        let mut hidden = solid(Color::GREEN, 1.0);
        hidden.visible = false;

        let mut with_skippable = CanvasCompositor::new();
        with_skippable.add_layer(RenderLayerFactory::base(&solid(Color::BLUE, 0.6), 1));
        with_skippable.add_layer(RenderLayerFactory::base(&hidden, 0));
        with_skippable.add_layer(RenderLayerFactory::shape_preview(&[], 2));

        let mut without = CanvasCompositor::new();
        without.add_layer(RenderLayerFactory::base(&solid(Color::BLUE, 0.6), 1));

        assert_eq!(with_skippable.composite(2, 2), without.composite(2, 2));
    }

    #[test]
    fn test_off_canvas_pixels_clipped() {
        let mut compositor = CanvasCompositor::new();
        compositor.add_layer(RenderLayerFactory::shape_preview(
            &[
                PixelChange::paint(-1, 0, Color::RED),
                PixelChange::paint(5, 5, Color::RED),
                PixelChange::paint(1, 0, Color::RED),
            ],
            0,
        ));

        let output = compositor.composite(2, 2);
        assert_eq!(output.iter_opaque().count(), 1);
        assert_eq!(output.get(1, 0), Some(Color::RED));
    }

    #[test]
    fn test_composite_is_idempotent() {
        let mut compositor = CanvasCompositor::new();
        compositor.add_layer(RenderLayerFactory::base(&solid(Color::BLUE, 0.3), 1));
        compositor.add_layer(RenderLayerFactory::base(&solid(Color::RED, 0.7), 0));
        assert_eq!(compositor.composite(2, 2), compositor.composite(2, 2));
    }

    #[test]
    fn test_clear_layers() {
        let mut compositor = CanvasCompositor::new();
        compositor.add_layer(RenderLayerFactory::base(&solid(Color::BLUE, 1.0), 0));
        compositor.clear_layers();
        assert_eq!(compositor.layer_count(), 0);
        assert!(compositor.composite(2, 2).is_empty());
    }
}
