// PixelBuffer - 2-D grid of optional colours
//
// `None` means transparent (unset). Coordinates are signed so that callers
// working with offsets (floating selections, previews dragged off-canvas)
// can address cells without pre-clipping; anything outside the grid reads
// as transparent and is ignored on write.

use crate::model::color::Color;
use serde::{Deserialize, Serialize};

/// A single replayable edit instruction for one pixel
///
/// `color: None` erases the pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelChange {
    pub x: i32,
    pub y: i32,
    pub color: Option<Color>,
}

impl PixelChange {
    pub fn new(x: i32, y: i32, color: Option<Color>) -> Self {
        Self { x, y, color }
    }

    /// Change that paints `color` at (x, y)
    pub fn paint(x: i32, y: i32, color: Color) -> Self {
        Self::new(x, y, Some(color))
    }

    /// Change that clears (x, y) to transparent
    pub fn erase(x: i32, y: i32) -> Self {
        Self::new(x, y, None)
    }
}

/// Row-major grid of optional colours
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Option<Color>>,
}

impl PixelBuffer {
    /// Create a fully transparent buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![None; width as usize * height as usize],
        }
    }

    /// Create a buffer where every cell holds `color`
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![Some(color); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True if (x, y) addresses a cell inside the grid
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        self.contains(x, y)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    /// Colour at (x, y), `None` when transparent or out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        self.index_of(x, y).and_then(|index| self.pixels[index])
    }

    /// Write a cell. Returns false (and writes nothing) when out of bounds.
    pub fn set(&mut self, x: i32, y: i32, color: Option<Color>) -> bool {
        match self.index_of(x, y) {
            Some(index) => {
                self.pixels[index] = color;
                true
            }
            None => false,
        }
    }

    /// Apply a single change; out-of-bounds changes are dropped
    pub fn apply(&mut self, change: &PixelChange) -> bool {
        self.set(change.x, change.y, change.color)
    }

    /// Reset every cell to transparent
    pub fn clear(&mut self) {
        self.pixels.fill(None);
    }

    /// True if no cell holds a colour
    pub fn is_empty(&self) -> bool {
        self.pixels.iter().all(Option::is_none)
    }

    /// Iterate over every non-transparent cell as (x, y, colour)
    pub fn iter_opaque(&self) -> impl Iterator<Item = (i32, i32, Color)> + '_ {
        let width = self.width as usize;
        self.pixels.iter().enumerate().filter_map(move |(index, pixel)| {
            pixel.map(|color| ((index % width) as i32, (index / width) as i32, color))
        })
    }

    /// Raw row-major cells
    pub fn pixels(&self) -> &[Option<Color>] {
        &self.pixels
    }
}
