/// Labels longer than this many chars are cut and end in `…`.
pub const HISTORY_LABEL_MAX_CHARS: usize = 30;

/// Sidebar label for a conversation's opening prompt.
pub fn history_label(text: &str) -> String {
    if text.chars().count() <= HISTORY_LABEL_MAX_CHARS {
        return text.to_string();
    }
    let mut label: String = text.chars().take(HISTORY_LABEL_MAX_CHARS).collect();
    label.push('…');
    label
}

/// Labels of conversations started this session, oldest first.
#[derive(Debug, Clone, Default)]
pub struct HistoryState {
    labels: Vec<String>,
}

impl HistoryState {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn record(&mut self, prompt: &str) {
        self.labels.push(history_label(prompt));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_label_unchanged() {
        assert_eq!(history_label("Hi"), "Hi");
        let exact = "a".repeat(30);
        assert_eq!(history_label(&exact), exact);
    }

    #[test]
    fn test_long_label_truncated() {
        let label = history_label(&"b".repeat(31));
        assert_eq!(label, format!("{}…", "b".repeat(30)));
        assert_eq!(label.chars().count(), 31);
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        let text = "Ω".repeat(40);
        assert_eq!(history_label(&text), format!("{}…", "Ω".repeat(30)));
    }

    #[test]
    fn test_record() {
        let mut history = HistoryState::default();
        history.record("Need a voltage regulator for 12V to 5V, 1A load.");
        assert_eq!(history.labels(), &["Need a voltage regulator for 1…"]);
    }
}
