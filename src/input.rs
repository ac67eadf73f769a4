//! Line-by-line command input

/// Turns appended text into commands, each handed out once
///
/// The host passes only the newly appended text. Lines count as complete
/// once their newline arrives. Each complete line is returned once, trimmed,
/// and blank lines are skipped. Only the unfinished last line is kept.
///
/// # Examples
/// ```
/// use key_maze::CommandBuffer;
///
/// let mut buffer = CommandBuffer::new();
/// assert_eq!(buffer.push("right\npick"), vec!["right"]);
/// assert_eq!(buffer.push("up\nunlock"), vec!["pickup"]);
/// assert_eq!(buffer.finish(), Some("unlock".to_string()));
/// ```
#[derive(Debug, Default)]
pub struct CommandBuffer {
    /// Text after the last newline seen so far
    pending: String,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` and return the lines it completes
    pub fn push(&mut self, text: &str) -> Vec<String> {
        self.pending.push_str(text);
        let Some(end) = self.pending.rfind('\n') else {
            return Vec::new();
        };
        let complete: String = self.pending.drain(..=end).collect();
        complete
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Take the unfinished last line, once the input has ended
    pub fn finish(&mut self) -> Option<String> {
        let line = std::mem::take(&mut self.pending);
        let line = line.trim();
        (!line.is_empty()).then(|| line.to_string())
    }
}
