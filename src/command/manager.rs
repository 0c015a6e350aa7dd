// CommandManager - Manages undo/redo stacks

use crate::command::trait_def::{CommandError, CommandResult, UndoableCommand};
use crate::config::HistoryConfig;
use log::{debug, warn};
use std::collections::VecDeque;

/// Default maximum number of commands to keep in history
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Manages command execution and undo/redo functionality
///
/// The CommandManager maintains two stacks:
/// - Undo stack: Commands that have been executed and can be undone
/// - Redo stack: Commands that have been undone and can be redone
///
/// When a new command is executed:
/// 1. Execute the command
/// 2. Merge it into the previous entry if both agree, otherwise push it
/// 3. Clear the redo stack (since we're on a new timeline)
///
/// # Memory Management
/// The manager limits the number of commands in the undo stack to prevent
/// unbounded memory growth. When the limit is reached, the oldest command
/// is removed.
pub struct CommandManager {
    /// Stack of commands that can be undone (most recent at the back)
    undo_stack: VecDeque<Box<dyn UndoableCommand>>,

    /// Stack of commands that can be redone (most recent at the back)
    redo_stack: VecDeque<Box<dyn UndoableCommand>>,

    /// Maximum number of commands to keep in history
    max_history: usize,

    /// Whether consecutive mergeable commands collapse into one entry
    merge_consecutive: bool,
}

impl CommandManager {
    /// Create a new CommandManager with default settings
    pub fn new() -> Self {
        Self::from_config(&HistoryConfig::default())
    }

    /// Create a new CommandManager with a custom history limit
    pub fn with_capacity(max_history: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_history),
            redo_stack: VecDeque::with_capacity(max_history),
            max_history,
            merge_consecutive: true,
        }
    }

    /// Create a CommandManager from the history section of the editor config
    pub fn from_config(config: &HistoryConfig) -> Self {
        let mut manager = Self::with_capacity(config.max_history);
        manager.merge_consecutive = config.merge_consecutive;
        manager
    }

    /// Execute a command and add it to the undo stack
    ///
    /// This will:
    /// 1. Execute the command
    /// 2. Merge it into the last entry, or add it to the undo stack
    /// 3. Clear the redo stack (new timeline)
    /// 4. Trim history if needed
    pub fn execute(&mut self, mut command: Box<dyn UndoableCommand>) {
        command.execute();

        // Clear redo stack (we're on a new timeline now)
        self.redo_stack.clear();

        if self.merge_consecutive {
            if let Some(last) = self.undo_stack.back_mut() {
                if last.can_merge_with(command.as_ref()) {
                    match last.merge_with(command.as_ref()) {
                        Ok(()) => {
                            debug!(
                                "Merged '{}' into previous history entry",
                                command.description()
                            );
                            return;
                        }
                        Err(e) => warn!(
                            "Could not merge '{}', keeping it as its own entry: {}",
                            command.description(),
                            e
                        ),
                    }
                }
            }
        }

        self.undo_stack.push_back(command);

        // Trim history if needed
        if self.undo_stack.len() > self.max_history {
            self.undo_stack.pop_front();
            debug!("History limit {} reached, oldest entry dropped", self.max_history);
        }
    }

    /// Undo the last command
    ///
    /// Pops the last command from the undo stack, undoes it, and pushes it to the redo stack.
    ///
    /// # Errors
    /// Returns `CommandError::NothingToUndo` if the undo stack is empty.
    pub fn undo(&mut self) -> CommandResult<String> {
        let mut command = self
            .undo_stack
            .pop_back()
            .ok_or(CommandError::NothingToUndo)?;

        let description = command.description();

        command.undo();

        // Move to redo stack
        self.redo_stack.push_back(command);

        Ok(description)
    }

    /// Redo the last undone command
    ///
    /// Pops the last command from the redo stack, executes it again, and pushes it to the undo stack.
    ///
    /// # Errors
    /// Returns `CommandError::NothingToRedo` if the redo stack is empty.
    pub fn redo(&mut self) -> CommandResult<String> {
        let mut command = self
            .redo_stack
            .pop_back()
            .ok_or(CommandError::NothingToRedo)?;

        let description = command.description();

        // Re-execute the command
        command.execute();

        // Move to undo stack
        self.undo_stack.push_back(command);

        Ok(description)
    }

    /// Check if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get a description of the command that would be undone
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.back().map(|cmd| cmd.description())
    }

    /// Get a description of the command that would be redone
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.back().map(|cmd| cmd.description())
    }

    /// Clear all command history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Get the number of commands in the undo stack
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of commands in the redo stack
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for CommandManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::commands::{SetLayerOpacityCommand, SetLayerVisibilityCommand};
    use crate::model::layer::LayerStack;
    use std::any::Any;
    use std::cell::Cell;
    use std::rc::Rc;

    // Mock command for testing
    struct MockCommand {
        value: i32,
        executed: Rc<Cell<i32>>,
    }

    impl MockCommand {
        fn new(value: i32, executed: &Rc<Cell<i32>>) -> Self {
            Self {
                value,
                executed: Rc::clone(executed),
            }
        }
    }

    impl UndoableCommand for MockCommand {
        fn execute(&mut self) {
            self.executed.set(self.executed.get() + 1);
        }

        fn undo(&mut self) {
            self.executed.set(self.executed.get() - 1);
        }

        fn description(&self) -> String {
            format!("Set value to {}", self.value)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_execute_command() {
        let counter = Rc::new(Cell::new(0));
        let mut manager = CommandManager::new();

        manager.execute(Box::new(MockCommand::new(42, &counter)));

        assert_eq!(counter.get(), 1);
        assert_eq!(manager.undo_count(), 1);
        assert_eq!(manager.redo_count(), 0);
        assert!(manager.can_undo());
        assert!(!manager.can_redo());
    }

    #[test]
    fn test_undo() {
        let counter = Rc::new(Cell::new(0));
        let mut manager = CommandManager::new();

        manager.execute(Box::new(MockCommand::new(42, &counter)));

        let description = manager.undo().unwrap();
        assert_eq!(description, "Set value to 42");
        assert_eq!(counter.get(), 0);
        assert_eq!(manager.undo_count(), 0);
        assert_eq!(manager.redo_count(), 1);
    }

    #[test]
    fn test_redo() {
        let counter = Rc::new(Cell::new(0));
        let mut manager = CommandManager::new();

        manager.execute(Box::new(MockCommand::new(42, &counter)));
        manager.undo().unwrap();

        let description = manager.redo().unwrap();
        assert_eq!(description, "Set value to 42");
        assert_eq!(counter.get(), 1);
        assert_eq!(manager.undo_count(), 1);
        assert_eq!(manager.redo_count(), 0);
    }

    #[test]
    fn test_redo_stack_cleared_on_new_command() {
        let counter = Rc::new(Cell::new(0));
        let mut manager = CommandManager::new();

        // Execute, undo, then execute a new command
        manager.execute(Box::new(MockCommand::new(1, &counter)));
        manager.undo().unwrap();
        manager.execute(Box::new(MockCommand::new(2, &counter)));

        // Redo stack should be cleared
        assert!(!manager.can_redo());
        assert_eq!(manager.redo_count(), 0);
    }

    #[test]
    fn test_history_limit() {
        let counter = Rc::new(Cell::new(0));
        let mut manager = CommandManager::with_capacity(3);

        // Execute 5 commands (more than limit)
        for i in 0..5 {
            manager.execute(Box::new(MockCommand::new(i, &counter)));
        }

        // Should only keep the last 3
        assert_eq!(manager.undo_count(), 3);
        assert_eq!(manager.undo_description().as_deref(), Some("Set value to 4"));
    }

    #[test]
    fn test_undo_with_empty_stack() {
        let mut manager = CommandManager::new();
        assert_eq!(manager.undo(), Err(CommandError::NothingToUndo));
    }

    #[test]
    fn test_redo_with_empty_stack() {
        let mut manager = CommandManager::new();
        assert_eq!(manager.redo(), Err(CommandError::NothingToRedo));
    }

    // Claims to merge with anything but always refuses
    struct RefusingCommand {
        executed: Rc<Cell<i32>>,
    }

    impl UndoableCommand for RefusingCommand {
        fn execute(&mut self) {
            self.executed.set(self.executed.get() + 1);
        }

        fn undo(&mut self) {
            self.executed.set(self.executed.get() - 1);
        }

        fn description(&self) -> String {
            "Refuse".to_string()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn can_merge_with(&self, _other: &dyn UndoableCommand) -> bool {
            true
        }

        fn merge_with(&mut self, other: &dyn UndoableCommand) -> CommandResult<()> {
            Err(CommandError::MergeFailed(other.description()))
        }
    }

    #[test]
    fn test_failed_merge_keeps_command_undoable() {
        let counter = Rc::new(Cell::new(0));
        let mut manager = CommandManager::new();

        manager.execute(Box::new(RefusingCommand {
            executed: Rc::clone(&counter),
        }));
        manager.execute(Box::new(MockCommand::new(7, &counter)));

        assert_eq!(counter.get(), 2);
        assert_eq!(manager.undo_count(), 2);
        assert_eq!(manager.undo().unwrap(), "Set value to 7");
        assert_eq!(manager.undo().unwrap(), "Refuse");
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_consecutive_opacity_changes_merge() {
        let stack = LayerStack::new(2, 2).into_handle();
        let mut manager = CommandManager::new();

        manager.execute(Box::new(SetLayerOpacityCommand::from_current(&stack, 0, 0.8)));
        manager.execute(Box::new(SetLayerOpacityCommand::from_current(&stack, 0, 0.6)));
        manager.execute(Box::new(SetLayerOpacityCommand::from_current(&stack, 0, 0.3)));

        assert_eq!(manager.undo_count(), 1);
        assert_eq!(stack.borrow().layer(0).unwrap().opacity, 0.3);

        manager.undo().unwrap();
        assert_eq!(stack.borrow().layer(0).unwrap().opacity, 1.0);

        manager.redo().unwrap();
        assert_eq!(stack.borrow().layer(0).unwrap().opacity, 0.3);
    }

    #[test]
    fn test_merge_disabled_by_config() {
        let stack = LayerStack::new(2, 2).into_handle();
        let mut manager = CommandManager::from_config(&HistoryConfig {
            max_history: 10,
            merge_consecutive: false,
        });

        manager.execute(Box::new(SetLayerOpacityCommand::from_current(&stack, 0, 0.8)));
        manager.execute(Box::new(SetLayerOpacityCommand::from_current(&stack, 0, 0.6)));
        assert_eq!(manager.undo_count(), 2);
    }

    #[test]
    fn test_different_commands_do_not_merge() {
        let stack = LayerStack::new(2, 2).into_handle();
        let mut manager = CommandManager::new();

        manager.execute(Box::new(SetLayerOpacityCommand::from_current(&stack, 0, 0.8)));
        manager.execute(Box::new(SetLayerVisibilityCommand::new(&stack, 0, false)));
        assert_eq!(manager.undo_count(), 2);
        assert_eq!(manager.undo_description().as_deref(), Some("Hide Layer #0"));
    }
}
