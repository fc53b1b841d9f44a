use mindflow_core::ActionCard;
use mindflow_core::constants::MAX_ACTION_CARDS;

/// Cards offered under a reply: crisis support first on a crisis turn,
/// then exercises the reply mentions.
#[must_use]
pub fn build_action_cards(reply: &str, is_crisis: bool) -> Vec<ActionCard> {
    let lower = reply.to_lowercase();
    let mut cards = Vec::new();
    if is_crisis {
        cards.push(ActionCard::crisis_support());
    }
    if lower.contains("breath") {
        cards.push(ActionCard::breathing());
    }
    if lower.contains("ground") || lower.contains("present") {
        cards.push(ActionCard::grounding());
    }
    cards.truncate(MAX_ACTION_CARDS);
    cards
}
