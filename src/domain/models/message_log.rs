use super::{Role, Turn};

/// Ordered, append-only record of the turns in one chat session.
#[derive(Debug)]
pub struct MessageLog {
    turns: Vec<Turn>,
    next_id: u64,
}

impl MessageLog {
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            next_id: 1,
        }
    }

    /// Append a new turn and return a reference to it.
    pub fn append(&mut self, role: Role, text: impl Into<String>) -> &Turn {
        let id = self.next_id;
        self.next_id += 1;
        self.turns.push(Turn::new(id, role, text));
        &self.turns[self.turns.len() - 1]
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Plain-text transcript, one `"<role>: <text>"` line per turn, no trailing newline.
    pub fn export_transcript(&self) -> String {
        self.turns
            .iter()
            .map(Turn::transcript_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_matches_contract() {
        let mut log = MessageLog::new();
        log.append(Role::User, "Hi");
        log.append(Role::Assistant, "Hello!");

        assert_eq!(log.export_transcript(), "user: Hi\nassistant: Hello!");
    }

    #[test]
    fn test_export_empty_log() {
        let log = MessageLog::new();
        assert_eq!(log.export_transcript(), "");
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut log = MessageLog::default();
        let first = log.append(Role::User, "a").id();
        let second = log.append(Role::Assistant, "b").id();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_export_line_count_equals_len() {
        let mut log = MessageLog::new();
        log.append(Role::User, "one");
        log.append(Role::Assistant, "two");
        log.append(Role::User, "three");

        assert_eq!(log.export_transcript().lines().count(), log.len());
    }
}
