use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use mindflow_core::{CrisisAlert, Insight, MoodSample, MoodStats, MoodTrends, SeverityClassifier};
use mindflow_service::{InsightService, MoodService, ServiceConfig};
use mindflow_storage::InMemoryStorage;
use serde::Serialize;
use uuid::Uuid;

use super::{crisis_service, print_json};

#[derive(Serialize)]
struct Analysis {
    stats: MoodStats,
    trends: MoodTrends,
    insights: Vec<Insight>,
    crisis_alerts: Vec<CrisisAlert>,
}

pub(crate) async fn run(file: &Path, period: u32) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let samples: Vec<MoodSample> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of mood samples", file.display()))?;

    let config = ServiceConfig::from_env();
    let storage = Arc::new(InMemoryStorage::new());
    let crisis = crisis_service(&config, storage.clone());
    let moods = MoodService::new(storage.clone(), Arc::new(SeverityClassifier::new()), crisis);
    let insights = InsightService::new(storage, Arc::new(config.insight_engine()))
        .with_lookback_days(config.insight_lookback_days);

    // Analyze as of the newest sample so historical exports still fall in the window.
    let as_of = samples.iter().map(|s| s.timestamp).max().unwrap_or_else(Utc::now);
    let user = Uuid::new_v4();

    let mut crisis_alerts = Vec::new();
    for (index, sample) in samples.into_iter().enumerate() {
        let logged = moods
            .log_mood(user, sample)
            .await
            .with_context(|| format!("sample {index} rejected"))?;
        crisis_alerts.extend(logged.crisis_alert);
    }

    let analysis = Analysis {
        stats: moods.stats(user, period, as_of).await?,
        trends: moods.trends(user, period, as_of).await?,
        insights: insights.generate_insights(user, as_of).await?,
        crisis_alerts,
    };
    print_json(&analysis)
}
