use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use mindflow_core::Insight;
use mindflow_core::constants::MAX_PAGE_SIZE;
use mindflow_insights::PatternInsightEngine;
use mindflow_storage::{Storage, StorageError};
use serde::Serialize;
use uuid::Uuid;

use crate::config::DEFAULT_INSIGHT_LOOKBACK_DAYS;
use crate::error::ServiceError;

/// One page of active insights.
#[derive(Debug, Clone, Serialize)]
pub struct InsightPage {
    pub items: Vec<Insight>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

pub struct InsightService {
    storage: Arc<dyn Storage>,
    engine: Arc<PatternInsightEngine>,
    lookback: Duration,
}

impl InsightService {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, engine: Arc<PatternInsightEngine>) -> Self {
        Self { storage, engine, lookback: Duration::days(DEFAULT_INSIGHT_LOOKBACK_DAYS) }
    }

    #[must_use]
    pub fn with_lookback_days(mut self, days: i64) -> Self {
        self.lookback = Duration::days(days.max(1));
        self
    }

    /// Analyze the lookback window and persist every insight produced.
    pub async fn generate_insights(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Insight>, ServiceError> {
        let samples = self.storage.moods_since(user_id, now - self.lookback).await?;
        let insights = self.engine.analyze(&samples, now).await;
        for insight in &insights {
            self.storage.save_insight(user_id, insight).await?;
        }
        tracing::info!(
            user_id = %user_id,
            samples = samples.len(),
            insights = insights.len(),
            "Insights generated"
        );
        Ok(insights)
    }

    /// Active insights, newest first. Items on the page are marked shown.
    pub async fn list_insights(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        page: usize,
        per_page: usize,
    ) -> Result<InsightPage, ServiceError> {
        if page == 0 {
            return Err(ServiceError::InvalidInput("page starts at 1".to_owned()));
        }
        if per_page == 0 || per_page > MAX_PAGE_SIZE {
            return Err(ServiceError::InvalidInput(format!(
                "per_page must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        let mut active: Vec<Insight> = self
            .storage
            .list_insights(user_id)
            .await?
            .into_iter()
            .filter(|i| i.is_active(now))
            .collect();
        // Insertion order breaks ties, so reverse before the stable sort.
        active.reverse();
        active.sort_by(|a, b| b.valid_from.cmp(&a.valid_from));
        let total = active.len();

        let offset = (page - 1).saturating_mul(per_page);
        let mut items: Vec<Insight> = active.into_iter().skip(offset).take(per_page).collect();
        for insight in items.iter_mut().filter(|i| i.shown_at.is_none()) {
            insight.mark_shown(now);
            self.storage.update_insight(user_id, insight).await?;
        }

        Ok(InsightPage { items, total, page, per_page })
    }

    pub async fn dismiss(
        &self,
        user_id: Uuid,
        insight_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Insight, ServiceError> {
        let mut insight = self.owned_insight(user_id, insight_id).await?;
        insight.dismiss(now);
        self.storage.update_insight(user_id, &insight).await?;
        Ok(insight)
    }

    pub async fn rate(
        &self,
        user_id: Uuid,
        insight_id: Uuid,
        rating: u8,
    ) -> Result<Insight, ServiceError> {
        let mut insight = self.owned_insight(user_id, insight_id).await?;
        insight.rate(rating)?;
        self.storage.update_insight(user_id, &insight).await?;
        Ok(insight)
    }

    async fn owned_insight(&self, user_id: Uuid, insight_id: Uuid) -> Result<Insight, ServiceError> {
        self.storage
            .get_insight(user_id, insight_id)
            .await?
            .ok_or_else(|| StorageError::not_found("insight", insight_id).into())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use mindflow_core::{InsightKind, MoodSample};
    use mindflow_storage::{InMemoryStorage, InsightStore, MoodStore};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 14, 12, 0, 0).unwrap()
    }

    fn service(storage: Arc<InMemoryStorage>) -> InsightService {
        InsightService::new(storage, Arc::new(PatternInsightEngine::default()))
    }

    fn insight(title: &str, valid_from: DateTime<Utc>) -> Insight {
        Insight::new(InsightKind::Pattern, title, "narrative", 0.5, serde_json::json!({}), valid_from)
            .valid_until(valid_from + Duration::days(7))
    }

    #[tokio::test]
    async fn test_generate_below_floor_is_empty() {
        let storage = Arc::new(InMemoryStorage::new());
        let user = Uuid::new_v4();
        for d in 0..13 {
            let sample = MoodSample::new(now() - Duration::days(d), 5);
            storage.save_mood(user, &sample).await.unwrap();
        }
        let insights = service(storage.clone()).generate_insights(user, now()).await.unwrap();
        assert!(insights.is_empty());
        assert!(storage.list_insights(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_persists_insights() {
        let storage = Arc::new(InMemoryStorage::new());
        let user = Uuid::new_v4();
        // Thirty contiguous days yields at least the streak insight.
        for d in 0..30 {
            let sample = MoodSample::new(now() - Duration::days(d), 6);
            storage.save_mood(user, &sample).await.unwrap();
        }
        let insights = service(storage.clone()).generate_insights(user, now()).await.unwrap();
        assert!(!insights.is_empty());
        assert!(insights.iter().all(|i| i.valid_until == Some(now() + Duration::days(7))));
        assert_eq!(storage.list_insights(user).await.unwrap().len(), insights.len());
    }

    #[tokio::test]
    async fn test_lookback_excludes_old_samples() {
        let storage = Arc::new(InMemoryStorage::new());
        let user = Uuid::new_v4();
        for d in 0..30 {
            let sample = MoodSample::new(now() - Duration::days(100 + d), 6);
            storage.save_mood(user, &sample).await.unwrap();
        }
        let insights = service(storage).generate_insights(user, now()).await.unwrap();
        assert!(insights.is_empty());
    }

    #[tokio::test]
    async fn test_list_newest_first_paginated_and_marks_shown() {
        let storage = Arc::new(InMemoryStorage::new());
        let user = Uuid::new_v4();
        for h in 0..3 {
            let i = insight(&format!("insight-{h}"), now() - Duration::hours(3 - h));
            storage.save_insight(user, &i).await.unwrap();
        }
        let expired = insight("expired", now() - Duration::days(30));
        storage.save_insight(user, &expired).await.unwrap();

        let service = service(storage.clone());
        let page = service.list_insights(user, now(), 1, 2).await.unwrap();
        assert_eq!(page.total, 3);
        let titles: Vec<&str> = page.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["insight-2", "insight-1"]);
        assert!(page.items.iter().all(|i| i.shown_at == Some(now())));

        let second = service.list_insights(user, now(), 2, 2).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].title, "insight-0");
    }

    #[tokio::test]
    async fn test_dismissed_insight_leaves_listing() {
        let storage = Arc::new(InMemoryStorage::new());
        let user = Uuid::new_v4();
        let i = insight("a", now() - Duration::hours(1));
        storage.save_insight(user, &i).await.unwrap();

        let service = service(storage);
        let dismissed = service.dismiss(user, i.id, now()).await.unwrap();
        assert!(dismissed.dismissed_at.is_some());
        assert_eq!(service.list_insights(user, now(), 1, 20).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_rate_validates_range_and_owner() {
        let storage = Arc::new(InMemoryStorage::new());
        let user = Uuid::new_v4();
        let i = insight("a", now());
        storage.save_insight(user, &i).await.unwrap();

        let service = service(storage);
        assert_eq!(service.rate(user, i.id, 4).await.unwrap().helpful_rating, Some(4));
        assert!(service.rate(user, i.id, 6).await.unwrap_err().is_invalid_input());
        assert!(service.rate(Uuid::new_v4(), i.id, 4).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_list_rejects_bad_paging() {
        let service = service(Arc::new(InMemoryStorage::new()));
        let user = Uuid::new_v4();
        assert!(service.list_insights(user, now(), 0, 20).await.unwrap_err().is_invalid_input());
        assert!(service.list_insights(user, now(), 1, 101).await.unwrap_err().is_invalid_input());
    }
}
