//! Fixed replies used when the chat backend is unavailable.

use crate::backend::Generation;

pub const FALLBACK_MODEL_ID: &str = "fallback";

pub const CRISIS_FALLBACK_REPLY: &str = "I'm here for you. If you're in crisis, please reach out to \
the 988 Suicide & Crisis Lifeline by calling or texting 988. You matter, and help is available.";

pub const GENERIC_FALLBACK_REPLY: &str =
    "I'm here to support you. Could you tell me a bit more about how you're feeling right now?";

/// Zero-token generation carrying the fixed reply.
#[must_use]
pub fn fallback_generation(is_crisis: bool) -> Generation {
    let text = if is_crisis { CRISIS_FALLBACK_REPLY } else { GENERIC_FALLBACK_REPLY };
    Generation { text: text.to_owned(), tokens_used: 0, model_id: FALLBACK_MODEL_ID.to_owned() }
}
