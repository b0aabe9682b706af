use axum::{
    extract::{Query, State},
    response::Redirect,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::StoredConfig;
use crate::db::{self, HistoryRepo};
use crate::domain::{HistoryFilters, HistoryPage, PageRequest, StatsOverview};
use crate::error::{Error, Result};
use crate::query::DEFAULT_TIME_RANGE;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    #[serde(default = "default_page")]
    pub page: i64,

    #[serde(default = "default_page_size")]
    pub page_size: i64,

    #[serde(default)]
    pub filters: HistoryFilters,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    #[serde(rename = "timeRange")]
    pub time_range: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub db_path: String,
    pub theme: String,
    pub top_sites_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDbPathRequest {
    pub db_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateDbPathRequest {
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateDbPathResponse {
    pub valid: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

/// GET /
pub async fn root() -> Redirect {
    Redirect::temporary("/static/index.html")
}

/// POST /api/list_history
pub async fn list_history(
    State(state): State<AppState>,
    Json(request): Json<ListRequest>,
) -> Result<Json<HistoryPage>> {
    let page = PageRequest::new(request.page, request.page_size)?;
    let repo = state.repo().await;
    Ok(Json(repo.list_history(page, &request.filters).await?))
}

/// GET /api/stats_overview
pub async fn stats_overview(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsOverview>> {
    let token = query.time_range.as_deref().unwrap_or(DEFAULT_TIME_RANGE);
    let repo = state.repo().await;
    Ok(Json(
        repo.stats_overview(token, state.settings.top_sites_count)
            .await?,
    ))
}

/// GET /api/get_config
pub async fn get_config(State(state): State<AppState>) -> Result<Json<ConfigResponse>> {
    let stored = StoredConfig::load(&state.config_file);
    let repo = state.repo().await;

    Ok(Json(ConfigResponse {
        db_path: repo.source().to_string(),
        theme: stored.theme,
        top_sites_count: state.settings.top_sites_count,
    }))
}

/// POST /api/set_db_path
///
/// Builds a fresh repository against the new path and swaps it in for
/// subsequent requests, then persists the choice.
pub async fn set_db_path(
    State(state): State<AppState>,
    Json(request): Json<SetDbPathRequest>,
) -> Result<Json<ActionResponse>> {
    let path = request
        .db_path
        .filter(|p| !p.is_empty())
        .ok_or(Error::EmptyDbPath)?;

    let repo = HistoryRepo::open(&path).await?;
    state.swap_repo(repo).await;

    let mut stored = StoredConfig::load(&state.config_file);
    stored.db_path = Some(path.clone());
    stored.save(&state.config_file)?;

    info!("switched history database to {path}");
    Ok(Json(ActionResponse {
        success: true,
        message: "database path updated".to_string(),
    }))
}

/// POST /api/validate_db_path
pub async fn validate_db_path(
    Json(request): Json<ValidateDbPathRequest>,
) -> Json<ValidateDbPathResponse> {
    let Some(path) = request.path.filter(|p| !p.is_empty()) else {
        return Json(ValidateDbPathResponse {
            valid: false,
            message: "path must not be empty".to_string(),
        });
    };

    if db::validate_database(&path).await {
        Json(ValidateDbPathResponse {
            valid: true,
            message: "database looks valid".to_string(),
        })
    } else {
        Json(ValidateDbPathResponse {
            valid: false,
            message: "not a readable history database".to_string(),
        })
    }
}
