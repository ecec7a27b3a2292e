pub mod diff;
pub mod preview;

pub use diff::DiffCommand;
pub use preview::{PreviewCommand, PreviewFormat, PreviewSide};

use crate::context::Context;
use crate::stack::Stack;
use anyhow::Result;
use std::path::Path;

/// Resolve the stack a command targets: `path` (default `.`) plus an optional name override
fn resolve_stack(ctx: &Context, path: Option<&str>, name: Option<&str>) -> Result<Stack> {
    let dir = Path::new(path.unwrap_or("."));
    // A missing directory is reported by Stack::from_dir
    let dir = ctx.fs.canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());

    Stack::from_dir(ctx.fs.as_ref(), &dir, name)
}
