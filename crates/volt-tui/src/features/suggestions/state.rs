use volt_core::prompts::SUGGESTED_PROMPTS;

use crate::input::InputState;

/// Cycles through the suggested prompts with Tab.
#[derive(Debug, Clone, Default)]
pub struct SuggestionsState {
    next: usize,
}

impl SuggestionsState {
    pub fn prompts(&self) -> &'static [&'static str] {
        SUGGESTED_PROMPTS
    }

    /// Index of the suggestion the next Tab will insert.
    pub fn next_index(&self) -> usize {
        self.next
    }

    /// Copies the next suggestion into the composer.
    ///
    /// Only replaces an empty composer or one still holding an untouched
    /// suggestion. Returns whether anything changed.
    pub fn fill(&mut self, input: &mut InputState) -> bool {
        let prompts = self.prompts();
        if prompts.is_empty() || !input.enabled {
            return false;
        }
        let current = input.text();
        if !current.is_empty() && !prompts.contains(&current.as_str()) {
            return false;
        }

        input.set_text(prompts[self.next % prompts.len()]);
        self.next = (self.next + 1) % prompts.len();
        true
    }
}
