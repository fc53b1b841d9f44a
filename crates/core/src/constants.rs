//! Shared constants for MindFlow.
//!
//! Detector thresholds live next to the code that applies them; this module
//! holds the values shared across crates.

/// Lowest accepted mood / energy / anxiety score.
pub const MIN_SCORE: u8 = 1;

/// Highest accepted mood / energy / anxiety score.
pub const MAX_SCORE: u8 = 10;

/// Lowest accepted factor impact score.
pub const MIN_IMPACT: i8 = -5;

/// Highest accepted factor impact score.
pub const MAX_IMPACT: i8 = 5;

/// Maximum length of a free-text mood note, in characters.
pub const MAX_NOTE_CHARS: usize = 500;

/// Maximum length of a chat message, in characters.
pub const MAX_CHAT_MESSAGE_CHARS: usize = 4000;

/// Embedding vector dimension (all-MiniLM-L6-v2: 384d).
pub const EMBEDDING_DIMENSION: usize = 384;

/// Number of prior chat messages sent to the AI backend with each turn.
pub const CONTEXT_WINDOW_MESSAGES: usize = 10;

/// Maximum number of crisis resources attached to an alert.
pub const MAX_ALERT_RESOURCES: usize = 5;

/// Maximum number of action cards or quick-reply suggestions per response.
pub const MAX_ACTION_CARDS: usize = 3;

/// Default number of results when a page size is not specified by the caller.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Maximum page size for any listing (DoS protection).
pub const MAX_PAGE_SIZE: usize = 100;
