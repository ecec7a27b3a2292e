pub mod command;
pub mod filesystem;
pub mod host;
pub mod output;

pub use command::{CommandExecutor, RealCommandExecutor};
pub use filesystem::{FileSystem, RealFileSystem};
pub use host::{EditorHost, TabInput, TerminalHost, TextDocumentShowOptions, TextEditor};
pub use output::{Output, TerminalOutput};

#[cfg(test)]
pub use command::{MockCommandExecutor, MockCommandResult};
#[cfg(test)]
pub use filesystem::MockFileSystem;
#[cfg(test)]
pub use host::MockEditorHost;
#[cfg(test)]
pub use output::{MockOutput, OutputMessage};
