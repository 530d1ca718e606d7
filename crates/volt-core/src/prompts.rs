//! Prompt text shipped with volt.

/// System instruction the chat session is configured with.
pub const SYSTEM_INSTRUCTION: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/system_instruction.md"
));

/// Example prompts shown before the first message is sent.
pub const SUGGESTED_PROMPTS: &[&str] = &[
    "Need a voltage regulator for 12V to 5V, 1A load.",
    "Design a low-side MOSFET driver for a 24V solenoid from a 3.3V MCU pin.",
    "How do I debounce a mechanical push button for an Arduino input?",
    "Suggest a Li-ion charger circuit for a single 18650 cell powered from USB-C.",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_instruction_asks_for_structured_sections() {
        assert!(SYSTEM_INSTRUCTION.contains("## Use Case Understanding"));
        assert!(SYSTEM_INSTRUCTION.contains("mermaid"));
    }

    #[test]
    fn suggestions_are_not_empty() {
        assert!(!SUGGESTED_PROMPTS.is_empty());
        assert!(SUGGESTED_PROMPTS.iter().all(|p| !p.trim().is_empty()));
    }
}
