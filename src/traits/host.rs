use anyhow::{Context, Result};
use similar::{ChangeTag, TextDiff};
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

use crate::livediff::DocumentProviderRegistry;

/// What the focused tab is showing
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum TabInput {
    /// A single text document
    Text(Url),
    /// A two-sided text diff
    TextDiff { original: Url, modified: Url },
    /// Anything else (settings, webviews, ...)
    Other,
}

/// A text editor visible in the host
#[derive(Debug, Clone, PartialEq)]
pub struct TextEditor {
    pub document: Url,
    pub view_column: Option<u32>,
}

/// How a diff should be presented
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub struct TextDocumentShowOptions {
    pub preserve_focus: bool,
    pub preview: bool,
    pub view_column: Option<u32>,
}

/// The editor hosting the live diff: tabs, visible editors, context flags
pub trait EditorHost: Send + Sync {
    /// Input of the active tab in the active tab group
    fn active_tab(&self) -> Option<TabInput>;

    /// The editor that currently has focus
    fn active_text_editor(&self) -> Option<TextEditor>;

    /// Every editor currently on screen
    fn visible_text_editors(&self) -> Vec<TextEditor>;

    /// Change the language mode of an open document
    fn set_text_document_language(&self, document: &Url, language: &str) -> Result<()>;

    /// Language mode currently assigned to an open document
    #[allow(dead_code)]
    fn document_language(&self, document: &Url) -> Option<String>;

    /// Set a boolean context flag consumed by UI visibility rules
    fn set_context_value(&self, key: &str, value: bool);

    /// Current value of a context flag
    #[allow(dead_code)]
    fn context_value(&self, key: &str) -> Option<bool>;

    /// Open a two-pane diff; returns once the view is presented
    fn open_diff(
        &self,
        original: &Url,
        modified: &Url,
        title: &str,
        options: &TextDocumentShowOptions,
    ) -> Result<()>;
}

#[derive(Default)]
struct HostState {
    active_tab: Option<TabInput>,
    editors: Vec<TextEditor>,
    languages: HashMap<Url, String>,
    context: HashMap<String, bool>,
}

/// Terminal host: a "diff view" is a colored unified diff printed to stdout
///
/// Document contents are resolved through the provider registry when the
/// diff opens, the same way an editor asks its content providers.
pub struct TerminalHost {
    documents: DocumentProviderRegistry,
    state: Mutex<HostState>,
}

impl TerminalHost {
    pub fn new(documents: DocumentProviderRegistry) -> Self {
        Self {
            documents,
            state: Mutex::new(HostState::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl EditorHost for TerminalHost {
    fn active_tab(&self) -> Option<TabInput> {
        self.lock().active_tab.clone()
    }

    fn active_text_editor(&self) -> Option<TextEditor> {
        self.lock().editors.last().cloned()
    }

    fn visible_text_editors(&self) -> Vec<TextEditor> {
        self.lock().editors.clone()
    }

    fn set_text_document_language(&self, document: &Url, language: &str) -> Result<()> {
        let mut state = self.lock();
        if !state.editors.iter().any(|e| &e.document == document) {
            anyhow::bail!("Document {} is not open", document);
        }
        state.languages.insert(document.clone(), language.to_string());
        Ok(())
    }

    fn document_language(&self, document: &Url) -> Option<String> {
        self.lock().languages.get(document).cloned()
    }

    fn set_context_value(&self, key: &str, value: bool) {
        self.lock().context.insert(key.to_string(), value);
    }

    fn context_value(&self, key: &str) -> Option<bool> {
        self.lock().context.get(key).copied()
    }

    fn open_diff(
        &self,
        original: &Url,
        modified: &Url,
        title: &str,
        options: &TextDocumentShowOptions,
    ) -> Result<()> {
        let left = self
            .documents
            .provide(original)
            .with_context(|| format!("Failed to open {}", original))?;
        let right = self
            .documents
            .provide(modified)
            .with_context(|| format!("Failed to open {}", modified))?;

        crate::output::section(title);
        let lines = unified_diff_lines(&left, &right);
        if lines.is_empty() {
            crate::output::dimmed("No differences between runtime and spec.");
        }
        for (marker, text) in &lines {
            crate::output::diff_line(*marker, text);
        }

        let mut state = self.lock();
        state.active_tab = Some(TabInput::TextDiff {
            original: original.clone(),
            modified: modified.clone(),
        });
        state.editors = vec![
            TextEditor {
                document: original.clone(),
                view_column: options.view_column,
            },
            TextEditor {
                document: modified.clone(),
                view_column: options.view_column,
            },
        ];

        Ok(())
    }
}

/// Unified diff of two documents as `(marker, text)` pairs
///
/// Markers are `@` for hunk headers and `-`, `+`, ` ` for lines.
pub fn unified_diff_lines(left: &str, right: &str) -> Vec<(char, String)> {
    let diff = TextDiff::from_lines(left, right);
    let mut lines = Vec::new();

    for hunk in diff.unified_diff().context_radius(3).iter_hunks() {
        lines.push(('@', hunk.header().to_string()));
        for change in hunk.iter_changes() {
            let marker = match change.tag() {
                ChangeTag::Delete => '-',
                ChangeTag::Insert => '+',
                ChangeTag::Equal => ' ',
            };
            lines.push((marker, change.value().trim_end_matches('\n').to_string()));
        }
    }

    lines
}

/// Mock host for testing: scripted tabs, recorded side effects
#[cfg(test)]
pub struct MockEditorHost {
    documents: Option<DocumentProviderRegistry>,
    state: Mutex<HostState>,
    opened: Mutex<Vec<OpenedDiff>>,
    fail_open: bool,
}

/// A diff opened through `MockEditorHost`
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub struct OpenedDiff {
    pub original: Url,
    pub modified: Url,
    pub title: String,
    pub options: TextDocumentShowOptions,
    /// Contents resolved while the diff was opening, if a registry was attached
    pub contents: Option<(String, String)>,
}

#[cfg(test)]
#[allow(dead_code)]
impl MockEditorHost {
    pub fn new() -> Self {
        Self {
            documents: None,
            state: Mutex::new(HostState::default()),
            opened: Mutex::new(Vec::new()),
            fail_open: false,
        }
    }

    /// Resolve documents through `documents` when a diff opens
    pub fn with_documents(documents: DocumentProviderRegistry) -> Self {
        Self {
            documents: Some(documents),
            ..Self::new()
        }
    }

    /// Make every `open_diff` fail
    pub fn failing() -> Self {
        Self {
            fail_open: true,
            ..Self::new()
        }
    }

    pub fn set_active_tab(&self, tab: Option<TabInput>) {
        self.state.lock().unwrap().active_tab = tab;
    }

    pub fn set_visible_editors(&self, editors: Vec<TextEditor>) {
        self.state.lock().unwrap().editors = editors;
    }

    pub fn opened(&self) -> Vec<OpenedDiff> {
        self.opened.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Default for MockEditorHost {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl EditorHost for MockEditorHost {
    fn active_tab(&self) -> Option<TabInput> {
        self.state.lock().unwrap().active_tab.clone()
    }

    fn active_text_editor(&self) -> Option<TextEditor> {
        self.state.lock().unwrap().editors.first().cloned()
    }

    fn visible_text_editors(&self) -> Vec<TextEditor> {
        self.state.lock().unwrap().editors.clone()
    }

    fn set_text_document_language(&self, document: &Url, language: &str) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .languages
            .insert(document.clone(), language.to_string());
        Ok(())
    }

    fn document_language(&self, document: &Url) -> Option<String> {
        self.state.lock().unwrap().languages.get(document).cloned()
    }

    fn set_context_value(&self, key: &str, value: bool) {
        self.state
            .lock()
            .unwrap()
            .context
            .insert(key.to_string(), value);
    }

    fn context_value(&self, key: &str) -> Option<bool> {
        self.state.lock().unwrap().context.get(key).copied()
    }

    fn open_diff(
        &self,
        original: &Url,
        modified: &Url,
        title: &str,
        options: &TextDocumentShowOptions,
    ) -> Result<()> {
        if self.fail_open {
            anyhow::bail!("diff view could not be opened");
        }

        let contents = match &self.documents {
            Some(documents) => Some((documents.provide(original)?, documents.provide(modified)?)),
            None => None,
        };

        self.opened.lock().unwrap().push(OpenedDiff {
            original: original.clone(),
            modified: modified.clone(),
            title: title.to_string(),
            options: options.clone(),
            contents,
        });

        let mut state = self.state.lock().unwrap();
        state.active_tab = Some(TabInput::TextDiff {
            original: original.clone(),
            modified: modified.clone(),
        });
        state.editors = [original, modified]
            .iter()
            .map(|document| TextEditor {
                document: (*document).clone(),
                view_column: options.view_column,
            })
            .collect();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::livediff::LiveDiffPreview;
    use crate::livediff::provider::LiveDiffContentProvider;
    use serde_json::json;
    use std::sync::Arc;

    fn url(text: &str) -> Url {
        Url::parse(text).unwrap()
    }

    #[test]
    fn test_unified_diff_lines_marks_changes() {
        let lines = unified_diff_lines("r1:\n  a: 1\n", "r1:\n  a: 2\n");

        assert_eq!(lines[0].0, '@');
        assert!(lines.contains(&(' ', "r1:".to_string())));
        assert!(lines.contains(&('-', "  a: 1".to_string())));
        assert!(lines.contains(&('+', "  a: 2".to_string())));
    }

    #[test]
    fn test_unified_diff_lines_identical_documents() {
        assert!(unified_diff_lines("a: 1\n", "a: 1\n").is_empty());
    }

    #[test]
    fn test_terminal_host_open_diff_activates_tab() {
        let documents = DocumentProviderRegistry::new();
        let mut preview = LiveDiffPreview::default();
        preview.status.insert("r1".to_string(), json!({"a": 1}));
        preview.spec.insert("r1".to_string(), json!({"a": 2}));
        let _registration = documents
            .register("kusion", Arc::new(LiveDiffContentProvider::new(preview, "default")))
            .unwrap();

        let host = TerminalHost::new(documents);
        let original = url("kusion:/stack/status?language=yaml#runtime");
        let modified = url("kusion:/stack/spec?language=yaml#spec");
        let options = TextDocumentShowOptions {
            preserve_focus: false,
            preview: false,
            view_column: None,
        };

        host.open_diff(&original, &modified, "dev (Runtime) ↔ (Spec)", &options)
            .unwrap();

        assert_eq!(
            host.active_tab(),
            Some(TabInput::TextDiff {
                original: original.clone(),
                modified: modified.clone()
            })
        );
        assert_eq!(host.visible_text_editors().len(), 2);
        host.set_text_document_language(&original, "yaml").unwrap();
        assert_eq!(host.document_language(&original), Some("yaml".to_string()));
    }

    #[test]
    fn test_terminal_host_open_diff_without_provider_fails() {
        let host = TerminalHost::new(DocumentProviderRegistry::new());
        let options = TextDocumentShowOptions {
            preserve_focus: false,
            preview: false,
            view_column: None,
        };

        let result = host.open_diff(
            &url("kusion:/stack/status#runtime"),
            &url("kusion:/stack/spec#spec"),
            "dev (Runtime) ↔ (Spec)",
            &options,
        );

        assert!(result.is_err());
        assert_eq!(host.active_tab(), None);
    }

    #[test]
    fn test_terminal_host_language_requires_open_document() {
        let host = TerminalHost::new(DocumentProviderRegistry::new());
        assert!(
            host.set_text_document_language(&url("kusion:/stack/spec#spec"), "yaml")
                .is_err()
        );
    }

    #[test]
    fn test_terminal_host_context_values() {
        let host = TerminalHost::new(DocumentProviderRegistry::new());
        assert_eq!(host.context_value("inKusionLiveDiff"), None);
        host.set_context_value("inKusionLiveDiff", true);
        assert_eq!(host.context_value("inKusionLiveDiff"), Some(true));
    }
}
