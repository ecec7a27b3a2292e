//! Live diff between a stack's runtime status and its desired spec
//!
//! `kusion preview --output json` yields a change order: an ordered list of
//! per-resource steps, each carrying the resource's state before (`from`)
//! and after (`to`) the change. Folding those steps gives two snapshots keyed
//! by resource id, which are served as two read-only virtual documents and
//! shown side by side.
//!
//! # Example
//!
//! ```ignore
//! use crate::livediff::DiffSession;
//!
//! let ctx = Context::new(LiveDiffConfig::default());
//! let stack = Stack::new("dev", "/work/demo/dev");
//! DiffSession::new(&ctx).show_diff(&stack)?;
//! ```

pub mod builder;
pub mod error;
pub mod fetcher;
pub mod provider;
pub mod session;
pub mod types;

pub use fetcher::PreviewFetcher;
pub use provider::DocumentProviderRegistry;
pub use session::{DiffSession, update_live_diff_editor_status};
pub use types::{DiffSide, LiveDiffPreview};
