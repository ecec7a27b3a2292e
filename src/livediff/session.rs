//! Diff session orchestration and live diff tab tracking

use anyhow::{Context as _, Result};
use std::sync::Arc;
use url::Url;

use super::error::ProviderError;
use super::fetcher::PreviewFetcher;
use super::provider::LiveDiffContentProvider;
use super::types::DiffSide;
use crate::config::LiveDiffConfig;
use crate::context::Context;
use crate::stack::Stack;
use crate::traits::{EditorHost, TabInput, TextDocumentShowOptions, TextEditor};

/// Title of the diff view for `stack`
pub fn diff_title(stack: &Stack) -> String {
    format!("{} (Runtime) ↔ (Spec)", stack.name)
}

/// Locator of one side of the diff, e.g. `kusion:/stack/status?language=yaml#runtime`
pub fn document_uri(stack: &Stack, side: DiffSide, config: &LiveDiffConfig) -> Result<Url> {
    let mut uri = Url::parse(&format!("{}:/", config.scheme))
        .with_context(|| format!("Invalid document scheme '{}'", config.scheme))?;

    let path = stack.root.join(side.path_segment());
    uri.set_path(&path.to_string_lossy());
    uri.set_query(Some(&format!("language={}", config.language)));
    uri.set_fragment(Some(side.fragment()));

    Ok(uri)
}

/// Whether the focused tab is a diff with both sides on `scheme`
pub fn check_in_live_diff_tab(host: &dyn EditorHost, scheme: &str) -> bool {
    match host.active_tab() {
        Some(TabInput::TextDiff { original, modified }) => {
            original.scheme() == scheme && modified.scheme() == scheme
        }
        _ => false,
    }
}

/// React to an active-editor change
///
/// Inside a live diff the virtual documents are forced to the configured
/// language and the context flag is raised; anywhere else it is cleared.
pub fn update_live_diff_editor_status(
    host: &dyn EditorHost,
    editor: Option<&TextEditor>,
    config: &LiveDiffConfig,
) -> Result<()> {
    if editor.is_some() && check_in_live_diff_tab(host, &config.scheme) {
        for visible in host.visible_text_editors() {
            if visible.document.scheme() == config.scheme {
                host.set_text_document_language(&visible.document, &config.language)?;
            }
        }
        host.set_context_value(&config.context_key, true);
    } else {
        host.set_context_value(&config.context_key, false);
    }

    Ok(())
}

/// One live diff: fetch, serve both sides, present, release
pub struct DiffSession {
    ctx: Context,
}

impl DiffSession {
    pub fn new(ctx: &Context) -> Self {
        Self { ctx: ctx.clone() }
    }

    /// Show the runtime/spec diff of `stack` in the host
    ///
    /// Nothing is registered or shown if the preview fails. The provider is
    /// released as soon as the view has been presented, and on any error.
    pub fn show_diff(&self, stack: &Stack) -> Result<()> {
        let config = &self.ctx.config;
        let host = &self.ctx.host;

        let options = TextDocumentShowOptions {
            preserve_focus: false,
            preview: false,
            view_column: host.active_text_editor().and_then(|e| e.view_column),
        };

        // Don't launch the preview tool while another session holds the scheme
        if self.ctx.documents.is_registered(&config.scheme) {
            return Err(ProviderError::SchemeInUse(config.scheme.clone()))
                .context("Cannot start a live diff while another one is open");
        }

        let preview = PreviewFetcher::from_context(&self.ctx)
            .fetch(stack)
            .with_context(|| format!("Failed to preview stack {}", stack.name))?;
        let summary = if preview.is_empty() {
            format!("Stack {} has no pending changes", stack.name)
        } else {
            format!("Compared {} resource(s) of stack {}", preview.len(), stack.name)
        };

        let registration = self
            .ctx
            .documents
            .register(
                &config.scheme,
                Arc::new(LiveDiffContentProvider::new(preview, &config.placeholder)),
            )
            .context("Cannot start a live diff while another one is open")?;

        let runtime = document_uri(stack, DiffSide::Runtime, config)?;
        let spec = document_uri(stack, DiffSide::Spec, config)?;

        host.open_diff(&runtime, &spec, &diff_title(stack), &options)
            .with_context(|| format!("Failed to open the live diff for {}", stack.name))?;

        registration.dispose();
        host.set_context_value(&config.context_key, true);

        self.ctx.output.dimmed(&summary);

        Ok(())
    }
}
