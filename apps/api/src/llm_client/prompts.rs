// Chat assistant prompt text.

/// System prompt for the conversational advisor.
pub const ADVISOR_SYSTEM: &str = "You are a helpful credit card advisor. \
    Ask relevant questions to recommend the best credit cards.";
