use anyhow::{Result, bail};
use mindflow_core::SeverityClassifier;

use super::print_json;

pub(crate) fn run(text: &str) -> Result<()> {
    let classifier = SeverityClassifier::new();
    if let Some(e) = classifier.load_error() {
        bail!("crisis pattern table failed to compile: {e}");
    }
    print_json(&classifier.classify(Some(text)))
}
