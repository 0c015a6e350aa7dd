// RenderLayer - per-pass pixel contributors
//
// Every variant is a read-only projection of some source data. Instances are
// rebuilt on each composite pass and never persisted. The z index is assigned
// by whoever builds the layer; blend order is decided solely by the order in
// which layers are handed to the compositor.

use crate::model::buffer::{PixelBuffer, PixelChange};
use crate::model::color::Color;
use crate::model::layer::Layer;
use serde::{Deserialize, Serialize};

/// A single contributor to a composite pass
pub trait RenderLayer {
    /// Informational z tag, not used for sorting
    fn z_index(&self) -> i32;

    /// Opacity applied to every contributed pixel (0.0 to 1.0)
    fn opacity(&self) -> f32;

    /// True when the layer contributes nothing and can be skipped
    fn is_skippable(&self) -> bool {
        self.opacity() <= 0.0
    }

    /// Report every pixel this layer contributes on a `width` x `height` canvas.
    ///
    /// Coordinates may fall outside the canvas; the compositor clips them.
    fn contribute(&self, width: u32, height: u32, sink: &mut dyn FnMut(i32, i32, Color));

    /// Short name for logs
    fn kind(&self) -> &'static str;
}

/// A persisted layer, taken as-is
pub struct BaseRenderLayer {
    layer: Layer,
    z_index: i32,
}

impl BaseRenderLayer {
    pub fn new(layer: Layer, z_index: i32) -> Self {
        Self { layer, z_index }
    }
}

impl RenderLayer for BaseRenderLayer {
    fn z_index(&self) -> i32 {
        self.z_index
    }

    fn opacity(&self) -> f32 {
        self.layer.opacity
    }

    fn is_skippable(&self) -> bool {
        !self.layer.visible || self.layer.opacity <= 0.0
    }

    fn contribute(&self, _width: u32, _height: u32, sink: &mut dyn FnMut(i32, i32, Color)) {
        for (x, y, color) in self.layer.pixels.iter_opaque() {
            sink(x, y, color);
        }
    }

    fn kind(&self) -> &'static str {
        "base"
    }
}

/// A lifted, movable pixel island
pub struct FloatingSelectionLayer {
    pixels: PixelBuffer,
    origin: (i32, i32),
    opacity: f32,
    z_index: i32,
}

impl FloatingSelectionLayer {
    /// `origin` is the canvas position of the island's local (0, 0), i.e.
    /// the selection rect origin plus the drag offset.
    pub fn new(pixels: PixelBuffer, origin: (i32, i32), opacity: f32, z_index: i32) -> Self {
        Self {
            pixels,
            origin,
            opacity,
            z_index,
        }
    }
}

impl RenderLayer for FloatingSelectionLayer {
    fn z_index(&self) -> i32 {
        self.z_index
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn contribute(&self, _width: u32, _height: u32, sink: &mut dyn FnMut(i32, i32, Color)) {
        let (origin_x, origin_y) = self.origin;
        for (x, y, color) in self.pixels.iter_opaque() {
            sink(origin_x + x, origin_y + y, color);
        }
    }

    fn kind(&self) -> &'static str {
        "floating-selection"
    }
}

/// Sparse preview of an in-progress tool stroke
///
/// No buffer is allocated; only the listed cells are drawn.
pub struct ShapePreviewLayer {
    pixels: Vec<PixelChange>,
    z_index: i32,
}

impl ShapePreviewLayer {
    pub fn new(pixels: Vec<PixelChange>, z_index: i32) -> Self {
        Self { pixels, z_index }
    }
}

impl RenderLayer for ShapePreviewLayer {
    fn z_index(&self) -> i32 {
        self.z_index
    }

    fn opacity(&self) -> f32 {
        1.0
    }

    fn is_skippable(&self) -> bool {
        self.pixels.is_empty()
    }

    fn contribute(&self, _width: u32, _height: u32, sink: &mut dyn FnMut(i32, i32, Color)) {
        for change in &self.pixels {
            if let Some(color) = change.color {
                sink(change.x, change.y, color);
            }
        }
    }

    fn kind(&self) -> &'static str {
        "shape-preview"
    }
}

/// Tinted, translucent ghost of another frame
pub struct OnionSkinLayer {
    pixels: PixelBuffer,
    tint: Color,
    tint_strength: f32,
    opacity: f32,
    z_index: i32,
}

impl OnionSkinLayer {
    pub fn new(
        pixels: PixelBuffer,
        tint: Color,
        tint_strength: f32,
        opacity: f32,
        z_index: i32,
    ) -> Self {
        Self {
            pixels,
            tint,
            tint_strength,
            opacity,
            z_index,
        }
    }
}

impl RenderLayer for OnionSkinLayer {
    fn z_index(&self) -> i32 {
        self.z_index
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn contribute(&self, _width: u32, _height: u32, sink: &mut dyn FnMut(i32, i32, Color)) {
        for (x, y, color) in self.pixels.iter_opaque() {
            sink(x, y, color.mix(self.tint, self.tint_strength));
        }
    }

    fn kind(&self) -> &'static str {
        "onion-skin"
    }
}

/// Procedural, non-content canvas aids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayKind {
    /// Lines every `spacing` pixels, starting at 0
    Grid { spacing: u32 },
    /// One-pixel outline along the canvas edge
    Border,
    /// One vertical and one horizontal line through the canvas centre
    CenterGuides,
}

/// Overlay computed from the canvas dimensions
pub struct OverlayLayer {
    kind: OverlayKind,
    color: Color,
    z_index: i32,
}

impl OverlayLayer {
    pub fn new(kind: OverlayKind, color: Color, z_index: i32) -> Self {
        Self {
            kind,
            color,
            z_index,
        }
    }

    fn covers(&self, x: u32, y: u32, width: u32, height: u32) -> bool {
        match self.kind {
            OverlayKind::Grid { spacing } => spacing > 0 && (x % spacing == 0 || y % spacing == 0),
            OverlayKind::Border => x == 0 || y == 0 || x + 1 == width || y + 1 == height,
            OverlayKind::CenterGuides => x == width / 2 || y == height / 2,
        }
    }
}

impl RenderLayer for OverlayLayer {
    fn z_index(&self) -> i32 {
        self.z_index
    }

    fn opacity(&self) -> f32 {
        1.0
    }

    fn contribute(&self, width: u32, height: u32, sink: &mut dyn FnMut(i32, i32, Color)) {
        for y in 0..height {
            for x in 0..width {
                if self.covers(x, y, width, height) {
                    sink(x as i32, y as i32, self.color);
                }
            }
        }
    }

    fn kind(&self) -> &'static str {
        "overlay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(layer: &dyn RenderLayer, width: u32, height: u32) -> Vec<(i32, i32, Color)> {
        let mut cells = Vec::new();
        layer.contribute(width, height, &mut |x, y, color| cells.push((x, y, color)));
        cells
    }

    #[test]
    fn test_base_layer_skips_when_hidden() {
        let mut layer = Layer::with_pixels("a", PixelBuffer::filled(2, 2, Color::RED));
        assert!(!BaseRenderLayer::new(layer.clone(), 0).is_skippable());

        layer.visible = false;
        assert!(BaseRenderLayer::new(layer.clone(), 0).is_skippable());

        layer.visible = true;
        layer.opacity = 0.0;
        assert!(BaseRenderLayer::new(layer, 0).is_skippable());
    }

    #[test]
    fn test_floating_selection_positions_pixels() {
        let mut island = PixelBuffer::new(2, 1);
        island.set(1, 0, Some(Color::GREEN));
        let layer = FloatingSelectionLayer::new(island, (3, 4), 1.0, 0);
        assert_eq!(collect(&layer, 8, 8), vec![(4, 4, Color::GREEN)]);
    }

    #[test]
    fn test_shape_preview_only_listed_cells() {
        let layer = ShapePreviewLayer::new(
            vec![PixelChange::paint(1, 2, Color::BLUE), PixelChange::erase(0, 0)],
            0,
        );
        assert!(!layer.is_skippable());
        assert_eq!(collect(&layer, 4, 4), vec![(1, 2, Color::BLUE)]);
        assert!(ShapePreviewLayer::new(Vec::new(), 0).is_skippable());
    }

    #[test]
    fn test_onion_skin_tints_pixels() {
        let pixels = PixelBuffer::filled(1, 1, Color::WHITE);
        let layer = OnionSkinLayer::new(pixels, Color::rgb(255, 0, 0), 0.5, 0.3, -1);
        assert_eq!(collect(&layer, 1, 1), vec![(0, 0, Color::rgb(255, 128, 128))]);
        assert_eq!(layer.opacity(), 0.3);
    }

    #[test]
    fn test_grid_overlay() {
        let layer = OverlayLayer::new(OverlayKind::Grid { spacing: 2 }, Color::BLACK, 0);
        let cells = collect(&layer, 3, 3);
        // rows 0 and 2 fully, plus columns 0 and 2 on row 1
        assert_eq!(cells.len(), 8);
        assert!(!cells.contains(&(1, 1, Color::BLACK)));
    }

    #[test]
    fn test_border_and_guides() {
        let border = OverlayLayer::new(OverlayKind::Border, Color::BLACK, 0);
        assert_eq!(collect(&border, 4, 4).len(), 12);

        let guides = OverlayLayer::new(OverlayKind::CenterGuides, Color::BLACK, 0);
        let cells = collect(&guides, 5, 5);
        assert_eq!(cells.len(), 9);
        assert!(cells.contains(&(2, 0, Color::BLACK)));
        assert!(cells.contains(&(0, 2, Color::BLACK)));
    }
}
