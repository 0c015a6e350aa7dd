// Selection - transient selection state fed to the compositor

use crate::model::buffer::PixelBuffer;
use serde::{Deserialize, Serialize};

/// Integer rectangle in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Translation applied to a floating selection while it is dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

/// Current selection
///
/// A floating selection is non-destructive: its pixels live here, detached
/// from the layer they were lifted from, until something commits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    /// Pixel island, local coordinates (0, 0) = `rect` origin
    pub pixels: PixelBuffer,
    pub rect: Rect,
    pub offset: Offset,
    pub is_floating: bool,
    /// Opacity (0.0 to 1.0)
    pub opacity: f32,
}

impl SelectionState {
    /// A floating selection at full opacity with no drag offset
    pub fn floating(pixels: PixelBuffer, origin_x: i32, origin_y: i32) -> Self {
        let rect = Rect::new(origin_x, origin_y, pixels.width(), pixels.height());
        Self {
            pixels,
            rect,
            offset: Offset::default(),
            is_floating: true,
            opacity: 1.0,
        }
    }

    /// Canvas position of the island's local (0, 0)
    pub fn origin(&self) -> (i32, i32) {
        (self.rect.x + self.offset.dx, self.rect.y + self.offset.dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_includes_offset() {
        let mut selection = SelectionState::floating(PixelBuffer::new(2, 2), 3, 4);
        assert_eq!(selection.origin(), (3, 4));
        selection.offset = Offset::new(-5, 1);
        assert_eq!(selection.origin(), (-2, 5));
        assert_eq!(selection.rect, Rect::new(3, 4, 2, 2));
    }
}
