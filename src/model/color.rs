// Color - straight (non-premultiplied) RGBA8 colour and source-over blending
//
// Blending follows the editor's compositing rule:
//     result = src * α + dst * (1 - α)
// where α is the source alpha scaled by the contributing layer's opacity.
// A transparent destination (no colour yet) takes the source colour as-is
// with its alpha reduced to α.

use serde::{Deserialize, Serialize};

/// RGBA colour with 8 bits per channel, alpha not premultiplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    /// Create a colour from all four channels
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque colour
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// True if the alpha channel is at its maximum
    pub fn is_opaque(&self) -> bool {
        self.a == u8::MAX
    }

    /// Alpha as a 0.0 - 1.0 fraction
    pub fn alpha_f32(&self) -> f32 {
        self.a as f32 / 255.0
    }

    /// Same colour with a different alpha
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Mix the RGB channels toward `other` by `amount` (0.0 keeps `self`, 1.0 gives `other`).
    ///
    /// Alpha is kept from `self`.
    pub fn mix(self, other: Color, amount: f32) -> Self {
        let t = amount.clamp(0.0, 1.0);
        Self {
            r: lerp_channel(self.r, other.r, t),
            g: lerp_channel(self.g, other.g, t),
            b: lerp_channel(self.b, other.b, t),
            a: self.a,
        }
    }

    /// Source-over blend of `src` (scaled by `opacity`) onto an optional destination.
    ///
    /// Returns the destination unchanged when the effective alpha is zero.
    pub fn blend_over(dst: Option<Color>, src: Color, opacity: f32) -> Option<Color> {
        let alpha = src.alpha_f32() * opacity.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return dst;
        }

        // Fully opaque source replaces whatever is underneath
        if alpha >= 1.0 {
            return Some(src.with_alpha(u8::MAX));
        }

        match dst {
            None => Some(src.with_alpha(to_channel(alpha))),
            Some(dst) => {
                let out_alpha = alpha + dst.alpha_f32() * (1.0 - alpha);
                Some(Color {
                    r: lerp_channel(dst.r, src.r, alpha),
                    g: lerp_channel(dst.g, src.g, alpha),
                    b: lerp_channel(dst.b, src.b, alpha),
                    a: to_channel(out_alpha),
                })
            }
        }
    }
}

fn lerp_channel(from: u8, to: u8, t: f32) -> u8 {
    let value = from as f32 * (1.0 - t) + to as f32 * t;
    value.round().clamp(0.0, 255.0) as u8
}

fn to_channel(fraction: f32) -> u8 {
    (fraction * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_opaque_source_wins() {
        let result = Color::blend_over(Some(Color::BLUE), Color::RED, 1.0);
        assert_eq!(result, Some(Color::RED));
    }

    #[test]
    fn test_blend_zero_opacity_keeps_destination() {
        assert_eq!(Color::blend_over(Some(Color::BLUE), Color::RED, 0.0), Some(Color::BLUE));
        assert_eq!(Color::blend_over(None, Color::RED, 0.0), None);
    }

    #[test]
    fn test_blend_onto_transparent_scales_alpha() {
        let result = Color::blend_over(None, Color::BLUE, 0.5).unwrap();
        assert_eq!((result.r, result.g, result.b), (0, 0, 255));
        assert_eq!(result.a, 128);
    }

    #[test]
    fn test_blend_half_opacity_is_even_mix() {
        let result = Color::blend_over(Some(Color::BLUE), Color::RED, 0.5).unwrap();
        assert_eq!(result.r, 128);
        assert_eq!(result.b, 128);
        assert_eq!(result.g, 0);
        assert!(result.is_opaque());
    }

    #[test]
    fn test_source_alpha_combines_with_opacity() {
        let half_red = Color::RED.with_alpha(128);
        let result = Color::blend_over(Some(Color::BLUE), half_red, 0.5).unwrap();
        // effective alpha ~0.25
        assert!(result.r > 60 && result.r < 70);
        assert!(result.b > 185 && result.b < 195);
    }

    #[test]
    fn test_mix_keeps_alpha() {
        let mixed = Color::WHITE.with_alpha(40).mix(Color::BLACK, 0.5);
        assert_eq!(mixed, Color::rgba(128, 128, 128, 40));
    }
}
