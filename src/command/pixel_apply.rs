// LayerPixelApplicable - shared pixel replay for layer-editing commands

use crate::model::buffer::PixelChange;
use crate::model::layer::LayerStack;
use log::debug;
use std::cell::RefCell;
use std::rc::Weak;

/// Capability for commands that replay a batch of pixel changes onto one layer
///
/// Implementors only declare where the changes go; `apply_pixel_changes`
/// does the rest. It has no notion of inversion: a command that needs undo
/// records the prior colours itself (see `ApplyPixelsCommand`).
pub trait LayerPixelApplicable {
    /// Weak handle to the layer stack being edited
    fn target(&self) -> &Weak<RefCell<LayerStack>>;

    /// Index of the layer the changes are written to
    fn layer_index(&self) -> usize;

    /// Write every change into the target layer.
    ///
    /// The layer index is re-validated on every call since the stack may have
    /// shrunk since the command was built. Returns the number of pixels
    /// written; a dropped stack or missing layer writes nothing.
    fn apply_pixel_changes(&self, changes: &[PixelChange]) -> usize {
        let Some(stack) = self.target().upgrade() else {
            debug!("Pixel apply skipped: layer stack no longer exists");
            return 0;
        };

        let mut stack = stack.borrow_mut();
        let index = self.layer_index();
        let Some(layer) = stack.layer_mut(index) else {
            debug!("Pixel apply skipped: layer #{} out of range", index);
            return 0;
        };

        let mut written = 0;
        for change in changes {
            if layer.pixels.apply(change) {
                written += 1;
            }
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::color::Color;
    use crate::model::layer::Layer;
    use std::rc::Rc;

    struct Painter {
        target: Weak<RefCell<LayerStack>>,
        layer_index: usize,
    }

    impl LayerPixelApplicable for Painter {
        fn target(&self) -> &Weak<RefCell<LayerStack>> {
            &self.target
        }

        fn layer_index(&self) -> usize {
            self.layer_index
        }
    }

    #[test]
    fn test_apply_writes_in_bounds_changes() {
        let stack = LayerStack::from_layers(vec![Layer::new("a", 3, 3)])
            .unwrap()
            .into_handle();
        let painter = Painter {
            target: Rc::downgrade(&stack),
            layer_index: 0,
        };

        let written = painter.apply_pixel_changes(&[
            PixelChange::paint(0, 0, Color::RED),
            PixelChange::paint(2, 2, Color::BLUE),
            PixelChange::paint(3, 0, Color::GREEN),
        ]);

        assert_eq!(written, 2);
        let stack = stack.borrow();
        let pixels = &stack.layer(0).unwrap().pixels;
        assert_eq!(pixels.get(0, 0), Some(Color::RED));
        assert_eq!(pixels.get(2, 2), Some(Color::BLUE));
    }

    #[test]
    fn test_apply_rechecks_layer_index() {
        let stack = LayerStack::from_layers(vec![Layer::new("a", 2, 2), Layer::new("b", 2, 2)])
            .unwrap()
            .into_handle();
        let painter = Painter {
            target: Rc::downgrade(&stack),
            layer_index: 1,
        };

        stack.borrow_mut().remove_layer(1);
        assert_eq!(painter.apply_pixel_changes(&[PixelChange::paint(0, 0, Color::RED)]), 0);
        assert!(stack.borrow().layer(0).unwrap().pixels.is_empty());
    }

    #[test]
    fn test_apply_with_dropped_stack() {
        let stack = LayerStack::new(2, 2).into_handle();
        let painter = Painter {
            target: Rc::downgrade(&stack),
            layer_index: 0,
        };
        drop(stack);
        assert_eq!(painter.apply_pixel_changes(&[PixelChange::paint(0, 0, Color::RED)]), 0);
    }
}
