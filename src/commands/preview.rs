use crate::context::Context;
use crate::livediff::{DiffSide, LiveDiffPreview, PreviewFetcher};
use anyhow::{Context as _, Result};
use clap::ValueEnum;

/// Which snapshot the preview command prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PreviewSide {
    /// Current runtime status (`from` values)
    Runtime,
    /// Desired spec (`to` values)
    Spec,
    /// Both snapshots under `status` and `spec`
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PreviewFormat {
    Yaml,
    Json,
}

/// Handles the 'preview' command - prints the live diff snapshots without opening a diff
pub struct PreviewCommand;

impl PreviewCommand {
    /// Execute the preview command
    pub fn execute(
        ctx: &Context,
        path: Option<&str>,
        name: Option<&str>,
        side: PreviewSide,
        format: PreviewFormat,
    ) -> Result<()> {
        let stack = super::resolve_stack(ctx, path, name)?;

        let preview = PreviewFetcher::from_context(ctx)
            .fetch(&stack)
            .with_context(|| format!("Failed to preview stack {}", stack.name))?;

        ctx.output.plain(&Self::render(&preview, side, format)?);

        Ok(())
    }

    fn render(preview: &LiveDiffPreview, side: PreviewSide, format: PreviewFormat) -> Result<String> {
        let side = match side {
            PreviewSide::Runtime => Some(DiffSide::Runtime),
            PreviewSide::Spec => Some(DiffSide::Spec),
            PreviewSide::All => None,
        };

        let text = match (side, format) {
            (Some(side), PreviewFormat::Yaml) => preview.to_yaml(side)?,
            (Some(side), PreviewFormat::Json) => {
                serde_json::to_string_pretty(preview.snapshot(side))?
            }
            (None, PreviewFormat::Yaml) => serde_yaml::to_string(preview)?,
            (None, PreviewFormat::Json) => serde_json::to_string_pretty(preview)?,
        };

        Ok(text)
    }
}
