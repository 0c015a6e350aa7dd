// RenderLayerManager - builds and runs one composite pass
//
// Pass order, bottom to top:
//   onion skins (farthest first) -> persisted layers (last index first)
//   -> shape preview -> floating selection -> overlays

use crate::config::{OnionSkinConfig, OverlayConfig};
use crate::model::buffer::{PixelBuffer, PixelChange};
use crate::model::color::Color;
use crate::model::frame::Timeline;
use crate::model::layer::LayerStack;
use crate::model::selection::SelectionState;
use crate::render::compositor::CanvasCompositor;
use crate::render::factory::RenderLayerFactory;
use crate::render::layer::OverlayKind;
use log::trace;

/// Z tag given to the shape preview
pub const SHAPE_PREVIEW_Z_INDEX: i32 = 1_000;
/// Z tag given to the floating selection
pub const FLOATING_SELECTION_Z_INDEX: i32 = 2_000;
/// Z tag given to overlays
pub const OVERLAY_Z_INDEX: i32 = 3_000;

/// A flattened neighbouring frame to show as a ghost
#[derive(Debug, Clone, PartialEq)]
pub struct OnionSkinSource {
    pub pixels: PixelBuffer,
    pub tint: Color,
    pub tint_strength: f32,
    pub opacity: f32,
    /// Signed distance from the current frame (-1 = previous frame)
    pub frame_offset: i32,
}

/// One overlay to draw above the content
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlaySource {
    pub kind: OverlayKind,
    pub color: Color,
}

/// Everything a composite pass reads
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub layers: &'a LayerStack,
    pub shape_preview: &'a [PixelChange],
    pub selection: Option<&'a SelectionState>,
    pub onion_skins: &'a [OnionSkinSource],
    pub overlays: &'a [OverlaySource],
}

impl<'a> RenderInput<'a> {
    /// Persisted layers only
    pub fn new(layers: &'a LayerStack) -> Self {
        Self {
            layers,
            shape_preview: &[],
            selection: None,
            onion_skins: &[],
            overlays: &[],
        }
    }

    pub fn with_shape_preview(mut self, shape_preview: &'a [PixelChange]) -> Self {
        self.shape_preview = shape_preview;
        self
    }

    pub fn with_selection(mut self, selection: Option<&'a SelectionState>) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_onion_skins(mut self, onion_skins: &'a [OnionSkinSource]) -> Self {
        self.onion_skins = onion_skins;
        self
    }

    pub fn with_overlays(mut self, overlays: &'a [OverlaySource]) -> Self {
        self.overlays = overlays;
        self
    }
}

/// Orchestrates composite passes for one canvas
///
/// Two-phase: `update()`/`render()` rebuild the layer sequence and flatten
/// it, `composited()` hands out the last result.
pub struct RenderLayerManager {
    compositor: CanvasCompositor,
    width: u32,
    height: u32,
    composited: PixelBuffer,
}

impl RenderLayerManager {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            compositor: CanvasCompositor::new(),
            width,
            height,
            composited: PixelBuffer::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Change the canvas size; the stored result is reset until the next pass
    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.composited = PixelBuffer::new(width, height);
    }

    /// Run a pass over persisted layers plus the transient tool state
    pub fn update(
        &mut self,
        layers: &LayerStack,
        shape_preview: &[PixelChange],
        selection: Option<&SelectionState>,
    ) {
        self.render(
            &RenderInput::new(layers)
                .with_shape_preview(shape_preview)
                .with_selection(selection),
        );
    }

    /// Run a pass over a full input bundle
    pub fn render(&mut self, input: &RenderInput<'_>) {
        self.compositor.clear_layers();

        for skin in input.onion_skins {
            self.compositor.add_layer(RenderLayerFactory::onion_skin(
                &skin.pixels,
                skin.tint,
                skin.tint_strength,
                skin.opacity,
                skin.frame_offset,
            ));
        }

        // Index 0 is topmost, so it has to be added last
        for (index, layer) in input.layers.layers().iter().enumerate().rev() {
            self.compositor
                .add_layer(RenderLayerFactory::base(layer, index as i32));
        }

        if !input.shape_preview.is_empty() {
            self.compositor.add_layer(RenderLayerFactory::shape_preview(
                input.shape_preview,
                SHAPE_PREVIEW_Z_INDEX,
            ));
        }

        if let Some(selection) = input.selection.filter(|selection| selection.is_floating) {
            self.compositor.add_layer(RenderLayerFactory::floating_selection(
                selection,
                FLOATING_SELECTION_Z_INDEX,
            ));
        }

        for overlay in input.overlays {
            self.compositor.add_layer(RenderLayerFactory::overlay(
                overlay.kind,
                overlay.color,
                OVERLAY_Z_INDEX,
            ));
        }

        trace!(
            "Composite pass: {} render layers on {}x{}",
            self.compositor.layer_count(),
            self.width,
            self.height
        );
        self.composited = self.compositor.composite(self.width, self.height);
    }

    /// Result of the last pass
    pub fn composited(&self) -> &PixelBuffer {
        &self.composited
    }

    /// Number of render layers built by the last pass
    pub fn render_layer_count(&self) -> usize {
        self.compositor.layer_count()
    }

    /// Flatten a layer stack on its own, without any transient state
    pub fn flatten(layers: &LayerStack, width: u32, height: u32) -> PixelBuffer {
        let mut compositor = CanvasCompositor::new();
        for (index, layer) in layers.layers().iter().enumerate().rev() {
            compositor.add_layer(RenderLayerFactory::base(layer, index as i32));
        }
        compositor.composite(width, height)
    }

    /// Ghosts of the frames around the timeline's current frame.
    ///
    /// Returned farthest first so nearer frames draw over farther ones. The
    /// opacity fades with distance. Empty when onion skinning is disabled.
    pub fn onion_skins_for(
        timeline: &Timeline,
        config: &OnionSkinConfig,
        width: u32,
        height: u32,
    ) -> Vec<OnionSkinSource> {
        if !config.enabled {
            return Vec::new();
        }

        let current = timeline.current();
        let ghost = |index: usize, distance: usize, tint: Color, frame_offset: i32| {
            timeline.frame(index).map(|frame| OnionSkinSource {
                pixels: Self::flatten(&frame.layers().borrow(), width, height),
                tint,
                tint_strength: config.tint_strength,
                opacity: config.opacity / distance as f32,
                frame_offset,
            })
        };

        // Never look past either end of the timeline
        let frames_before = config.frames_before.min(current);
        let frames_after = config
            .frames_after
            .min(timeline.len().saturating_sub(current + 1));
        let offset = |distance: usize| i32::try_from(distance).unwrap_or(i32::MAX);

        let before = (1..=frames_before).rev().filter_map(|distance| {
            let index = current.checked_sub(distance)?;
            ghost(index, distance, config.previous_tint, -offset(distance))
        });
        let after = (1..=frames_after).rev().filter_map(|distance| {
            let index = current.checked_add(distance)?;
            ghost(index, distance, config.next_tint, offset(distance))
        });

        before.chain(after).collect()
    }

    /// Overlays switched on in the config, in draw order
    pub fn overlays_for(config: &OverlayConfig) -> Vec<OverlaySource> {
        let mut overlays = Vec::new();
        if config.show_grid {
            overlays.push(OverlaySource {
                kind: OverlayKind::Grid {
                    spacing: config.grid_spacing,
                },
                color: config.grid_color,
            });
        }
        if config.show_center_guides {
            overlays.push(OverlaySource {
                kind: OverlayKind::CenterGuides,
                color: config.guide_color,
            });
        }
        if config.show_border {
            overlays.push(OverlaySource {
                kind: OverlayKind::Border,
                color: config.border_color,
            });
        }
        overlays
    }
}
