//! Runs `kusion preview` for a stack and turns its JSON into a preview

use std::sync::Arc;

use super::builder::PreviewBuilder;
use super::error::FetchError;
use super::types::{ChangeOrder, LiveDiffPreview};
use crate::context::Context;
use crate::stack::Stack;
use crate::traits::{CommandExecutor, Output};

/// Invokes the preview tool once per call; no retry, no cancellation
pub struct PreviewFetcher {
    command: Arc<dyn CommandExecutor>,
    output: Arc<dyn Output>,
    preview_command: String,
}

impl PreviewFetcher {
    pub fn new(
        command: Arc<dyn CommandExecutor>,
        output: Arc<dyn Output>,
        preview_command: &str,
    ) -> Self {
        Self {
            command,
            output,
            preview_command: preview_command.to_string(),
        }
    }

    pub fn from_context(ctx: &Context) -> Self {
        Self::new(
            Arc::clone(&ctx.command),
            Arc::clone(&ctx.output),
            &ctx.config.preview_command,
        )
    }

    /// Program and arguments for previewing `stack`
    pub fn command_line(&self, stack: &Stack) -> Vec<String> {
        let mut parts: Vec<String> = self
            .preview_command
            .split_whitespace()
            .map(str::to_string)
            .collect();

        parts.extend(
            ["preview", "-w", stack.name.as_str(), "--output", "json"]
                .iter()
                .map(|s| s.to_string()),
        );

        parts
    }

    /// Run the preview and fold its change order
    ///
    /// A parsable change order wins even if the tool also reported an error.
    /// Empty output from a clean run means there is nothing to change.
    pub fn fetch(&self, stack: &Stack) -> Result<LiveDiffPreview, FetchError> {
        let command_line = self.command_line(stack);
        let display = command_line.join(" ");

        // A blank program leaves only the five preview arguments
        if command_line.len() < 6 {
            return Err(FetchError::Launch {
                command: display,
                message: "preview command is empty".to_string(),
            });
        }

        let args: Vec<&str> = command_line[1..].iter().map(String::as_str).collect();
        let output = match self.command.execute(&command_line[0], &args, &stack.root) {
            Ok(output) => output,
            Err(e) => {
                self.report(&display, "", &format!("{:#}", e));
                return Err(FetchError::Launch {
                    command: display,
                    message: format!("{:#}", e),
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let failed = !output.status.success() || !stderr.trim().is_empty();

        if stdout.trim().is_empty() {
            if failed {
                self.report(&display, &stdout, &error_text(&output.status, &stderr));
                return Err(FetchError::ToolFailed {
                    command: display,
                    exit_code: output.status.code(),
                    stderr,
                });
            }

            self.output
                .dimmed(&format!("{} printed nothing; treating as no changes", display));
            return Ok(LiveDiffPreview::default());
        }

        match ChangeOrder::parse(&stdout) {
            Ok(order) => {
                if failed {
                    self.output.warning(&format!(
                        "{} reported an error ({}); using its output anyway",
                        display,
                        error_text(&output.status, &stderr)
                    ));
                }
                Ok(PreviewBuilder::from_order(&order))
            }
            Err(e) => {
                self.report(&display, &stdout, &error_text(&output.status, &stderr));
                Err(FetchError::Malformed {
                    command: display,
                    message: format!("{:#}", e),
                    stderr,
                })
            }
        }
    }

    /// Dump the raw tool output to the diagnostic channel and reveal it
    fn report(&self, command: &str, stdout: &str, error: &str) {
        self.output.append_line(&format!("{} failed:", command), false);
        if !stdout.trim().is_empty() {
            self.output.append_line(stdout, true);
        }
        if !error.trim().is_empty() {
            self.output.append_line(error, true);
        }
        self.output.show();
    }
}

fn error_text(status: &std::process::ExitStatus, stderr: &str) -> String {
    if status.success() {
        stderr.trim().to_string()
    } else if stderr.trim().is_empty() {
        status.to_string()
    } else {
        format!("{}, {}", status, stderr.trim())
    }
}
