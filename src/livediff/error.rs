use std::fmt;

/// Why a preview could not be produced
#[derive(Debug)]
pub enum FetchError {
    /// The preview tool could not be started
    Launch { command: String, message: String },

    /// The tool failed without printing anything usable
    ToolFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The tool printed something that is not a change order
    Malformed {
        command: String,
        message: String,
        stderr: String,
    },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Launch { command, message } => {
                write!(f, "Could not run '{}': {}", command, message)
            }
            FetchError::ToolFailed {
                command,
                exit_code,
                stderr,
            } => {
                write!(f, "'{}' failed", command)?;

                if let Some(code) = exit_code {
                    write!(f, " (exit code {})", code)?;
                }

                if !stderr.trim().is_empty() {
                    write!(f, ": {}", stderr.trim())?;
                }

                Ok(())
            }
            FetchError::Malformed {
                command,
                message,
                stderr,
            } => {
                write!(f, "'{}' returned unreadable output: {}", command, message)?;

                if !stderr.trim().is_empty() {
                    write!(f, " ({})", stderr.trim())?;
                }

                Ok(())
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// Failures of the virtual document registry
#[derive(Debug, PartialEq)]
pub enum ProviderError {
    /// Another session still owns the scheme
    SchemeInUse(String),

    /// Nothing is registered for the requested scheme
    NoProvider(String),

    /// A snapshot could not be rendered
    Serialize(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::SchemeInUse(scheme) => {
                write!(
                    f,
                    "A live diff is already being served for scheme '{}'",
                    scheme
                )
            }
            ProviderError::NoProvider(uri) => {
                write!(f, "No document provider for {}", uri)
            }
            ProviderError::Serialize(msg) => {
                write!(f, "Failed to render document: {}", msg)
            }
        }
    }
}

impl std::error::Error for ProviderError {}
