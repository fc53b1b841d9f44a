pub(crate) mod analyze;
pub(crate) mod chat;
pub(crate) mod classify;
pub(crate) mod crisis;

use std::sync::Arc;

use anyhow::Result;
use mindflow_service::{CrisisEscalationPolicy, CrisisService, ServiceConfig};
use mindflow_storage::Storage;
use serde::Serialize;

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn crisis_service(config: &ServiceConfig, storage: Arc<dyn Storage>) -> Arc<CrisisService> {
    let policy = CrisisEscalationPolicy::new(
        config.resource_country.clone(),
        config.resource_language.clone(),
    );
    Arc::new(CrisisService::new(storage, policy))
}
