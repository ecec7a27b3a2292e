use crate::config::LiveDiffConfig;
use crate::livediff::DocumentProviderRegistry;
use crate::traits::{
    CommandExecutor, EditorHost, FileSystem, Output, RealCommandExecutor, RealFileSystem,
    TerminalHost, TerminalOutput,
};
#[cfg(test)]
use crate::traits::{MockCommandExecutor, MockEditorHost, MockFileSystem, MockOutput};
use std::sync::Arc;

/// Application context that holds all dependencies for dependency injection
pub struct Context {
    pub fs: Arc<dyn FileSystem>,
    pub output: Arc<dyn Output>,
    pub command: Arc<dyn CommandExecutor>,
    pub host: Arc<dyn EditorHost>,
    /// Virtual documents the host resolves through
    pub documents: DocumentProviderRegistry,
    pub config: LiveDiffConfig,
}

impl Context {
    /// Create a new context with real implementations (for production use)
    pub fn new(config: LiveDiffConfig) -> Self {
        let documents = DocumentProviderRegistry::new();

        Self {
            fs: Arc::new(RealFileSystem),
            output: Arc::new(TerminalOutput::new(&config.channel)),
            command: Arc::new(RealCommandExecutor::new()),
            host: Arc::new(TerminalHost::new(documents.clone())),
            documents,
            config,
        }
    }

    /// Create a new context with mock implementations (for testing)
    #[cfg(test)]
    #[allow(dead_code)]
    pub fn test() -> Self {
        let documents = DocumentProviderRegistry::new();

        Self {
            fs: Arc::new(MockFileSystem::new()),
            output: Arc::new(MockOutput::new()),
            command: Arc::new(MockCommandExecutor::new()),
            host: Arc::new(MockEditorHost::with_documents(documents.clone())),
            documents,
            config: LiveDiffConfig::default(),
        }
    }

    /// Create a test context with specific mock implementations
    #[cfg(test)]
    pub fn test_with(
        output: Arc<dyn Output>,
        command: Arc<dyn CommandExecutor>,
        host: Arc<dyn EditorHost>,
        documents: DocumentProviderRegistry,
    ) -> Self {
        Self {
            fs: Arc::new(MockFileSystem::new()),
            output,
            command,
            host,
            documents,
            config: LiveDiffConfig::default(),
        }
    }
}

impl Clone for Context {
    fn clone(&self) -> Self {
        Self {
            fs: Arc::clone(&self.fs),
            output: Arc::clone(&self.output),
            command: Arc::clone(&self.command),
            host: Arc::clone(&self.host),
            documents: self.documents.clone(),
            config: self.config.clone(),
        }
    }
}
