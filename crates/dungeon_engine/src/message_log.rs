use std::collections::VecDeque;

pub const MESSAGE_LOG_CAPACITY: usize = 5;

/// Most-recent-first narration buffer. Inserting at capacity evicts the oldest entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLog {
    entries: VecDeque<String>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MESSAGE_LOG_CAPACITY + 1),
        }
    }

    /// Blank or whitespace-only messages are dropped.
    pub fn add(&mut self, message: impl Into<String>) {
        let message = message.into();
        if message.trim().is_empty() {
            return;
        }
        self.entries.push_front(message);
        self.entries.truncate(MESSAGE_LOG_CAPACITY);
    }

    pub fn snapshot(&self) -> Vec<&str> {
        self.entries.iter().map(String::as_str).collect()
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_message_is_first() {
        let mut log = MessageLog::new();
        log.add("first");
        log.add("second");
        assert_eq!(log.snapshot(), vec!["second", "first"]);
        assert_eq!(log.latest(), Some("second"));
    }

    #[test]
    fn overflow_keeps_five_most_recent() {
        let mut log = MessageLog::new();
        for index in 0..8 {
            log.add(format!("message {index}"));
        }
        assert_eq!(log.len(), MESSAGE_LOG_CAPACITY);
        assert_eq!(
            log.snapshot(),
            vec!["message 7", "message 6", "message 5", "message 4", "message 3"]
        );
    }

    #[test]
    fn blank_messages_are_ignored() {
        let mut log = MessageLog::new();
        log.add("kept");
        log.add("");
        log.add("   \t\n");
        assert_eq!(log.len(), 1);
        assert_eq!(log.latest(), Some("kept"));
    }
}
