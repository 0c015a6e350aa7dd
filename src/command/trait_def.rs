// UndoableCommand trait definition

use std::any::Any;

/// Result type for command history operations
pub type CommandResult<T> = Result<T, CommandError>;

/// Errors reported by the command history
///
/// Individual commands never fail: a vanished target or a stale index is a
/// silent no-op. Only the history itself has error cases.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Undo requested with an empty undo stack
    #[error("Nothing to undo")]
    NothingToUndo,
    /// Redo requested with an empty redo stack
    #[error("Nothing to redo")]
    NothingToRedo,
    /// merge_with() was handed a command it cannot absorb
    #[error("Merge failed: {0}")]
    MergeFailed(String),
}

/// Trait for commands that support undo/redo
///
/// A command captures, at construction time, everything it needs to invert
/// itself exactly. It holds only a weak handle to the view-model it mutates,
/// so it must treat a dropped target as a no-op rather than a fault.
///
/// # Example
/// ```
/// use std::any::Any;
/// use std::rc::{Rc, Weak};
/// use std::cell::RefCell;
/// use pixelforge::command::trait_def::UndoableCommand;
/// use pixelforge::model::{LayerStack, LayerStackHandle};
///
/// struct HideLayerCommand {
///     target: Weak<RefCell<LayerStack>>,
///     layer_index: usize,
/// }
///
/// impl UndoableCommand for HideLayerCommand {
///     fn execute(&mut self) {
///         if let Some(stack) = self.target.upgrade() {
///             stack.borrow_mut().set_visibility(self.layer_index, false);
///         }
///     }
///
///     fn undo(&mut self) {
///         if let Some(stack) = self.target.upgrade() {
///             stack.borrow_mut().set_visibility(self.layer_index, true);
///         }
///     }
///
///     fn description(&self) -> String {
///         format!("Hide Layer #{}", self.layer_index)
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let stack: LayerStackHandle = LayerStack::new(4, 4).into_handle();
/// let mut cmd = HideLayerCommand { target: Rc::downgrade(&stack), layer_index: 0 };
/// cmd.execute();
/// assert!(!stack.borrow().layer(0).unwrap().visible);
/// cmd.undo();
/// assert!(stack.borrow().layer(0).unwrap().visible);
/// ```
pub trait UndoableCommand {
    /// Apply the forward mutation
    ///
    /// Also used for redo, so it must be safe to call again after undo().
    fn execute(&mut self);

    /// Restore the target to its exact pre-execute state
    fn undo(&mut self);

    /// Get a human-readable description of the command
    ///
    /// Used for UI display (e.g., "Undo: Set Layer Opacity to 0.50")
    fn description(&self) -> String;

    /// Access to the concrete type, used for merging
    fn as_any(&self) -> &dyn Any;

    /// Optional: Check if this command can be merged with another
    ///
    /// Useful for combining many small steps (e.g., dragging an opacity slider)
    /// into a single history entry. Default implementation returns false.
    fn can_merge_with(&self, _other: &dyn UndoableCommand) -> bool {
        false
    }

    /// Optional: Merge a newer, already executed command into this one
    ///
    /// Only called if can_merge_with() returned true. The merged command must
    /// keep its own "before" state and adopt the other's "after" state. On
    /// error `self` must be left unchanged.
    fn merge_with(&mut self, _other: &dyn UndoableCommand) -> CommandResult<()> {
        Ok(())
    }
}
