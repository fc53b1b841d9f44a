//! Quick-reply chips derived from an assistant reply.

pub const MAX_SUGGESTIONS: usize = 3;

#[must_use]
pub fn extract_suggestions(reply: &str) -> Vec<String> {
    let lower = reply.to_lowercase();
    let mut suggestions = Vec::new();
    if lower.contains("breathing") {
        suggestions.push("Try breathing exercise".to_owned());
    }
    if lower.contains("talk") || lower.contains("feel") {
        suggestions.push("Tell me more".to_owned());
    }
    if suggestions.is_empty() {
        suggestions = vec!["I understand".to_owned(), "Continue".to_owned()];
    }
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_suggestions() {
        assert_eq!(
            extract_suggestions("Would a Breathing exercise help? How do you feel?"),
            vec!["Try breathing exercise", "Tell me more"]
        );
        assert_eq!(extract_suggestions("Want to talk?"), vec!["Tell me more"]);
    }

    #[test]
    fn test_default_suggestions() {
        assert_eq!(extract_suggestions("Okay."), vec!["I understand", "Continue"]);
    }
}
