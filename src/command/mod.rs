// Command Pattern for Undo/Redo functionality
//
// Every mutation to layers and frames goes through an UndoableCommand so it
// can be reversed exactly.
//
// Architecture:
// - UndoableCommand trait: Defines execute(), undo(), description()
// - LayerPixelApplicable trait: shared pixel replay for layer-editing commands
// - CommandManager: Manages undo/redo stacks
// - Concrete commands: MoveLayerCommand, DuplicateFrameCommand, SetLayerOpacityCommand, etc.
//
// Ownership:
// - Commands hold Weak handles to the layer stack / timeline they edit
// - A command whose target has been dropped does nothing on execute or undo
// - "Before" state is captured when the command is built, not recomputed later

pub mod commands;
pub mod manager;
pub mod pixel_apply;
pub mod trait_def;

pub use commands::{
    ApplyPixelsCommand, DuplicateFrameCommand, MoveLayerCommand, SetLayerOpacityCommand,
    SetLayerVisibilityCommand,
};
pub use manager::CommandManager;
pub use pixel_apply::LayerPixelApplicable;
pub use trait_def::{CommandError, CommandResult, UndoableCommand};
