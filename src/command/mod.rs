//! Command module
//!
//! Each CLI subcommand is a `PortalCommand`: it reads its inputs, does its
//! work and writes the result to the given output. The command to run is
//! selected at runtime from the parsed arguments.

use crate::cli::CommandType;
use crate::types::PortalError;
use std::io::Write;

pub mod purge;
pub mod state;

pub use purge::PurgeCommand;
pub use state::StateCommand;

/// A runnable CLI command
pub trait PortalCommand: Send + Sync {
    /// Run the command and write its output
    ///
    /// # Errors
    ///
    /// Returns an error if inputs cannot be read, the work fails, or the
    /// output cannot be written. Recoverable per-item problems (for example a
    /// file that could not be deleted) are reported in the output instead.
    fn run(&self, output: &mut dyn Write) -> Result<(), PortalError>;
}

/// Create the command selected on the command line
pub fn create_command(command: CommandType) -> Box<dyn PortalCommand> {
    match command {
        CommandType::State(args) => Box::new(StateCommand::new(args)),
        CommandType::PurgeSkeleton(args) => Box::new(PurgeCommand::new(args)),
    }
}
