use std::sync::Arc;

use anyhow::Result;
use mindflow_core::SelfCheck;
use mindflow_service::ServiceConfig;
use mindflow_storage::InMemoryStorage;
use uuid::Uuid;

use super::{crisis_service, print_json};

pub(crate) async fn run_self_check(check: &SelfCheck) -> Result<()> {
    let config = ServiceConfig::from_env();
    let crisis = crisis_service(&config, Arc::new(InMemoryStorage::new()));
    let outcome = crisis.self_check(Uuid::new_v4(), check).await;
    print_json(&outcome)
}

pub(crate) async fn run_resources(country: Option<String>, language: Option<String>) -> Result<()> {
    let mut config = ServiceConfig::from_env();
    if let Some(country) = country {
        config.resource_country = country;
    }
    if let Some(language) = language {
        config.resource_language = language;
    }
    let crisis = crisis_service(&config, Arc::new(InMemoryStorage::new()));
    print_json(&crisis.get_resources().await)
}
