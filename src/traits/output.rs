use std::sync::Mutex;

/// Output message captured by MockOutput for testing
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum OutputMessage {
    Success(String),
    Error(String),
    Warning(String),
    Info(String),
    KeyValue(String, String),
    Dimmed(String),
    Plain(String),
    /// A raw line appended to the diagnostic channel
    Diagnostic(String),
    /// The diagnostic channel was revealed
    Shown,
    Blank,
}

/// Trait for terminal output operations to enable testing with mocks
///
/// Besides the regular session messages this also models the diagnostic
/// channel: `append_line` buffers raw tool output and `show` reveals it.
pub trait Output: Send + Sync {
    /// Print a success message
    fn success(&self, message: &str);

    /// Print an error message
    fn error(&self, message: &str);

    /// Print a warning message
    fn warning(&self, message: &str);

    /// Print an info message
    #[allow(dead_code)]
    fn info(&self, message: &str);

    /// Print a key-value pair
    fn key_value(&self, key: &str, value: &str);

    /// Print a dimmed/muted message
    fn dimmed(&self, message: &str);

    /// Print text verbatim, without styling (payloads meant for piping)
    fn plain(&self, text: &str);

    /// Append a line to the diagnostic channel
    ///
    /// `raw` lines are kept verbatim (tool output); others are channel notes.
    fn append_line(&self, line: &str, raw: bool);

    /// Reveal the diagnostic channel to the user
    fn show(&self);

    /// Print a blank line
    fn blank(&self);
}

/// Real terminal output implementation using the output module
pub struct TerminalOutput {
    channel: String,
    pending: Mutex<Vec<String>>,
}

impl TerminalOutput {
    pub fn new(channel: &str) -> Self {
        Self {
            channel: channel.to_string(),
            pending: Mutex::new(Vec::new()),
        }
    }
}

impl Output for TerminalOutput {
    fn success(&self, message: &str) {
        crate::output::success(message);
    }

    fn error(&self, message: &str) {
        crate::output::error(message);
    }

    fn warning(&self, message: &str) {
        crate::output::warning(message);
    }

    fn info(&self, message: &str) {
        crate::output::info(message);
    }

    fn key_value(&self, key: &str, value: &str) {
        crate::output::key_value(key, value);
    }

    fn dimmed(&self, message: &str) {
        crate::output::dimmed(message);
    }

    fn plain(&self, text: &str) {
        crate::output::plain(text);
    }

    fn append_line(&self, line: &str, raw: bool) {
        let line = if raw {
            line.trim_end().to_string()
        } else {
            format!("[{}] {}", self.channel, line)
        };

        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.push(line);
    }

    fn show(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        crate::output::diagnostic_header(&self.channel);
        for line in pending.drain(..) {
            crate::output::diagnostic(&line);
        }
    }

    fn blank(&self) {
        crate::output::blank();
    }
}

/// Mock output implementation for testing (captures output)
#[cfg(test)]
pub struct MockOutput {
    messages: Mutex<Vec<OutputMessage>>,
}

#[cfg(test)]
#[allow(dead_code)]
impl MockOutput {
    /// Create new mock output
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Get all captured messages
    pub fn get_messages(&self) -> Vec<OutputMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// Check if a specific message was output
    pub fn contains_message(&self, message: &OutputMessage) -> bool {
        self.messages.lock().unwrap().contains(message)
    }

    /// Check if any error message was output
    pub fn has_error(&self) -> bool {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .any(|m| matches!(m, OutputMessage::Error(_)))
    }

    /// Get every line appended to the diagnostic channel
    pub fn get_diagnostics(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter_map(|m| {
                if let OutputMessage::Diagnostic(line) = m {
                    Some(line.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Check whether the diagnostic channel was revealed
    pub fn was_shown(&self) -> bool {
        self.contains_message(&OutputMessage::Shown)
    }
}

#[cfg(test)]
impl Default for MockOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl Output for MockOutput {
    fn success(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(OutputMessage::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(OutputMessage::Error(message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(OutputMessage::Warning(message.to_string()));
    }

    fn info(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(OutputMessage::Info(message.to_string()));
    }

    fn key_value(&self, key: &str, value: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(OutputMessage::KeyValue(key.to_string(), value.to_string()));
    }

    fn dimmed(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(OutputMessage::Dimmed(message.to_string()));
    }

    fn plain(&self, text: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(OutputMessage::Plain(text.to_string()));
    }

    fn append_line(&self, line: &str, _raw: bool) {
        self.messages
            .lock()
            .unwrap()
            .push(OutputMessage::Diagnostic(line.to_string()));
    }

    fn show(&self) {
        self.messages.lock().unwrap().push(OutputMessage::Shown);
    }

    fn blank(&self) {
        self.messages.lock().unwrap().push(OutputMessage::Blank);
    }
}
