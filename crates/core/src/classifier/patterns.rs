//! Built-in phrase table, strongest tier first.
//!
//! Ids are stable: they are persisted on crisis events and appear in audit logs.

use crate::severity::PatternTier;

/// One tier of the table: `(pattern_id, regex)` pairs in match order.
#[derive(Debug, Clone, Copy)]
pub struct TierPatterns {
    pub tier: PatternTier,
    pub patterns: &'static [(&'static str, &'static str)],
}

/// Self-harm and suicide language.
const CRITICAL: &[(&str, &str)] = &[
    ("kill_end_self", r"\b(kill|end|take)\s+(myself|my\s+life|it\s+all)\b"),
    ("suicide", r"\bsuicid(e|al)\b"),
    ("not_want_to_live", r"\bdon'?t\s+want\s+to\s+(live|be\s+here|exist)\b"),
    ("want_to_die", r"\b(want|going)\s+to\s+die\b"),
    ("ending_it", r"\bending\s+(it|my\s+life|everything)\b"),
    ("no_reason_to_live", r"\bno\s+reason\s+to\s+live\b"),
];

/// Self-injury, hopelessness and worthlessness language.
const HIGH: &[(&str, &str)] = &[
    ("self_harm", r"\bself[- ]?harm\b"),
    ("hurt_self", r"\bhurt(ing)?\s+myself\b"),
    ("cut_self", r"\bcut(ting)?\s+myself\b"),
    ("worthless", r"\bworthless\b"),
    ("better_without_me", r"\beveryone\b.*\bbetter\b.*\bwithout\s+me\b"),
    ("give_up", r"\bgive\s+up\b"),
    ("no_hope", r"\bno\s+hope\b"),
];

/// Distress and exhaustion language.
const MEDIUM: &[(&str, &str)] = &[
    ("hopeless", r"\bhopeless\b"),
    ("desperate", r"\bdesperate\b"),
    ("cant_cope", r"\bcan'?t\s+(go\s+on|take\s+it|cope)\b"),
    ("trapped", r"\btrapped\b"),
    ("burden", r"\b(a|the)\s+burden\b"),
    ("exhausted_by_life", r"\bexhausted\b.*\b(living|life)\b"),
];

pub const DEFAULT_TABLE: &[TierPatterns] = &[
    TierPatterns { tier: PatternTier::Critical, patterns: CRITICAL },
    TierPatterns { tier: PatternTier::High, patterns: HIGH },
    TierPatterns { tier: PatternTier::Medium, patterns: MEDIUM },
];
