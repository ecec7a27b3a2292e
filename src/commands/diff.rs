use crate::context::Context;
use crate::livediff::{DiffSession, update_live_diff_editor_status};
use anyhow::Result;

/// Handles the 'diff' command - shows runtime status against the desired spec
pub struct DiffCommand;

impl DiffCommand {
    /// Execute the diff command
    pub fn execute(ctx: &Context, path: Option<&str>, name: Option<&str>) -> Result<()> {
        let stack = super::resolve_stack(ctx, path, name)?;

        ctx.output.key_value("Stack", &stack.name);
        ctx.output.key_value("Root", &stack.root.display().to_string());

        DiffSession::new(ctx).show_diff(&stack)?;

        // Opening the diff moved focus to it
        let editor = ctx.host.active_text_editor();
        update_live_diff_editor_status(ctx.host.as_ref(), editor.as_ref(), &ctx.config)?;

        ctx.output.blank();
        ctx.output
            .success(&format!("Live diff for stack {} is ready", stack.name));

        Ok(())
    }
}
