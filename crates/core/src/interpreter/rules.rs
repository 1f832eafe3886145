//! Intent classification rule tables.
//!
//! Classification of a generated reply is a case-insensitive substring
//! scan over ordered tables: the first matching rule wins. The policy is
//! data, so it can be inspected, tested without the language model, and
//! swapped for a stricter classifier without touching the pipeline.
//!
//! Known limitation, kept on purpose: negated or multi-intent phrasing
//! ("don't create event") matches the same substrings and misclassifies.

/// Intent recognized in a generated reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    CreateEvent,
    FetchEvents,
    Unknown,
}

/// Ordered intent table; earlier rules win.
pub const INTENT_RULES: &[(&str, Intent)] =
    &[("create event", Intent::CreateEvent), ("show events", Intent::FetchEvents)];

/// Ordered summary table applied to create intents; earlier rules win.
pub const SUMMARY_RULES: &[(&str, &str)] = &[("meeting", "Meeting"), ("appointment", "Appointment")];

/// Classify a reply against [`INTENT_RULES`].
pub fn classify_intent(reply: &str) -> Intent {
    let lowered = reply.to_lowercase();
    INTENT_RULES
        .iter()
        .find(|(pattern, _)| lowered.contains(pattern))
        .map_or(Intent::Unknown, |(_, intent)| *intent)
}

/// Derive an event summary from a reply via [`SUMMARY_RULES`].
pub fn extract_summary(reply: &str) -> Option<&'static str> {
    let lowered = reply.to_lowercase();
    SUMMARY_RULES
        .iter()
        .find(|(pattern, _)| lowered.contains(pattern))
        .map(|(_, summary)| *summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_substring_classifies_create() {
        assert_eq!(classify_intent("Sure, I will CREATE EVENT for you"), Intent::CreateEvent);
        assert_eq!(classify_intent("create event: meeting at 3pm"), Intent::CreateEvent);
    }

    #[test]
    fn show_substring_classifies_fetch() {
        assert_eq!(classify_intent("Let me show events for this week"), Intent::FetchEvents);
        assert_eq!(classify_intent("SHOW EVENTS"), Intent::FetchEvents);
    }

    #[test]
    fn neither_substring_is_unknown() {
        assert_eq!(classify_intent("I cannot help with that"), Intent::Unknown);
        assert_eq!(classify_intent(""), Intent::Unknown);
    }

    #[test]
    fn earlier_rule_wins_when_both_match() {
        assert_eq!(
            classify_intent("create event first, then show events"),
            Intent::CreateEvent
        );
    }

    #[test]
    fn negation_is_a_documented_misclassification() {
        // The table has no negation handling; this is intentional.
        assert_eq!(classify_intent("please don't create event"), Intent::CreateEvent);
    }

    #[test]
    fn summary_rules_are_ordered() {
        assert_eq!(extract_summary("a meeting about the appointment"), Some("Meeting"));
        assert_eq!(extract_summary("dentist Appointment"), Some("Appointment"));
        assert_eq!(extract_summary("something else entirely"), None);
    }
}
