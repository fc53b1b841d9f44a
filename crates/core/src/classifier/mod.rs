//! Deterministic crisis-language classifier.
//!
//! Text is matched against a tiered phrase table. Precedence is strict and
//! conservative: a single high-tier phrase outranks any number of medium-tier
//! phrases, and a critical-tier phrase outranks everything.

mod patterns;

use regex::{Regex, RegexBuilder};
use unicode_normalization::UnicodeNormalization as _;

pub use patterns::{DEFAULT_TABLE, TierPatterns};

use crate::error::CoreError;
use crate::severity::{ClassificationResult, Indicator, PatternTier, SeverityLevel};

pub const CRITICAL_CONFIDENCE: f64 = 0.95;
pub const HIGH_CONFIDENCE: f64 = 0.85;
pub const MEDIUM_CONFIDENCE: f64 = 0.70;
pub const LOW_CONFIDENCE: f64 = 0.50;
pub const NO_SIGNAL_CONFIDENCE: f64 = 0.90;

/// Medium-tier matches needed before the result is escalated from low to medium.
pub const MEDIUM_MATCHES_FOR_MEDIUM: usize = 2;

/// Indicator id reported when the phrase table could not be compiled.
pub const UNAVAILABLE_PATTERN_ID: &str = "classifier_unavailable";

struct CompiledTier {
    tier: PatternTier,
    patterns: Vec<(&'static str, Regex)>,
}

/// Classifies free text into a [`SeverityLevel`].
///
/// Construction compiles the table once; the classifier is immutable afterwards
/// and can be shared between requests.
pub struct SeverityClassifier {
    tiers: Result<Vec<CompiledTier>, CoreError>,
}

impl std::fmt::Debug for SeverityClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let patterns = self
            .tiers
            .as_ref()
            .map_or(0, |tiers| tiers.iter().map(|t| t.patterns.len()).sum::<usize>());
        f.debug_struct("SeverityClassifier")
            .field("available", &self.tiers.is_ok())
            .field("patterns", &patterns)
            .finish()
    }
}

impl Default for SeverityClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SeverityClassifier {
    /// Classifier over the built-in phrase table.
    #[must_use]
    pub fn new() -> Self {
        Self::from_table(DEFAULT_TABLE)
    }

    /// Classifier over a custom table.
    ///
    /// A table that fails to compile does not panic: the classifier is built in
    /// its fail-safe mode, see [`SeverityClassifier::classify`].
    #[must_use]
    pub fn from_table(table: &[TierPatterns]) -> Self {
        let tiers = table
            .iter()
            .map(|entry| {
                let patterns = entry
                    .patterns
                    .iter()
                    .map(|(id, pattern)| {
                        RegexBuilder::new(pattern)
                            .case_insensitive(true)
                            .build()
                            .map(|re| (*id, re))
                            .map_err(|e| CoreError::Classifier(format!("{}/{id}: {e}", entry.tier)))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CompiledTier { tier: entry.tier, patterns })
            })
            .collect::<Result<Vec<_>, CoreError>>();

        if let Err(e) = &tiers {
            tracing::error!(error = %e, "Crisis pattern table failed to compile, classifier will fail safe");
        }
        Self { tiers }
    }

    /// Whether the phrase table compiled.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.tiers.is_ok()
    }

    /// Why the phrase table is unavailable, if it is.
    #[must_use]
    pub fn load_error(&self) -> Option<&CoreError> {
        self.tiers.as_ref().err()
    }

    /// Classify `text`. Never fails.
    ///
    /// Absent or blank text yields `none` with confidence 0.9. When the table is
    /// unavailable every non-blank input is reported as `high` risk with
    /// confidence 0.0, so detection is never silently skipped.
    #[must_use]
    pub fn classify(&self, text: Option<&str>) -> ClassificationResult {
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            return ClassificationResult::new(SeverityLevel::None, Vec::new(), NO_SIGNAL_CONFIDENCE);
        };

        let tiers = match &self.tiers {
            Ok(tiers) => tiers,
            Err(e) => {
                tracing::error!(error = %e, "Classifier unavailable, treating input as high risk");
                return ClassificationResult::new(
                    SeverityLevel::High,
                    vec![Indicator::new(PatternTier::High, UNAVAILABLE_PATTERN_ID)],
                    0.0,
                );
            },
        };

        let normalized = normalize(text);
        let mut indicators = Vec::new();
        let (mut critical, mut high, mut medium) = (0_usize, 0_usize, 0_usize);

        for compiled in tiers {
            for (id, re) in &compiled.patterns {
                if !re.is_match(&normalized) {
                    continue;
                }
                indicators.push(Indicator::new(compiled.tier, *id));
                match compiled.tier {
                    PatternTier::Critical => critical += 1,
                    PatternTier::High => high += 1,
                    PatternTier::Medium => medium += 1,
                }
            }
        }

        let (severity, confidence) = decide(critical, high, medium);

        if !indicators.is_empty() {
            tracing::warn!(
                severity = %severity,
                indicator_count = indicators.len(),
                "Crisis indicators detected"
            );
        }

        ClassificationResult::new(severity, indicators, confidence)
    }
}

/// Decision table, first rule wins.
const fn decide(critical: usize, high: usize, medium: usize) -> (SeverityLevel, f64) {
    if critical > 0 {
        (SeverityLevel::Critical, CRITICAL_CONFIDENCE)
    } else if high > 0 {
        (SeverityLevel::High, HIGH_CONFIDENCE)
    } else if medium >= MEDIUM_MATCHES_FOR_MEDIUM {
        (SeverityLevel::Medium, MEDIUM_CONFIDENCE)
    } else if medium == 1 {
        (SeverityLevel::Low, LOW_CONFIDENCE)
    } else {
        (SeverityLevel::None, NO_SIGNAL_CONFIDENCE)
    }
}

/// NFKC-folds the text, drops zero-width characters and unifies apostrophes.
fn normalize(text: &str) -> String {
    text.nfkc()
        .filter(|c| !matches!(c, '\u{200B}'..='\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}'))
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{02BC}' => '\'',
            other => other,
        })
        .collect()
}
