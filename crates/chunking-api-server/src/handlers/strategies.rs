use axum::Json;
use std::collections::BTreeMap;

use crate::chunking::{available_strategies, StrategyDescriptor};

pub async fn strategies_handler() -> Json<BTreeMap<&'static str, StrategyDescriptor>> {
    Json(available_strategies())
}
