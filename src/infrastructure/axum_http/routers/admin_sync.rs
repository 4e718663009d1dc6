use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::{Deserialize, Serialize};

use crate::{
    application::usecases::catalog_sync::{
        CatalogSyncUseCase, DEFAULT_STATS_WINDOW_DAYS, VideoProvider,
    },
    config::config_model::DotEnvyConfig,
    domain::repositories::{categories::CategoryRepository, videos::VideoRepository},
    infrastructure::{
        axum_http::auth::AuthUser,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{categories::CategoryPostgres, videos::VideoPostgres},
        },
        youtube::youtube_client::YoutubeClient,
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let provider = YoutubeClient::new(config.youtube.api_key.clone());
    let video_repository = VideoPostgres::new(Arc::clone(&db_pool));
    let category_repository = CategoryPostgres::new(Arc::clone(&db_pool));
    let catalog_sync_usecase = CatalogSyncUseCase::new(
        Arc::new(provider),
        Arc::new(video_repository),
        Arc::new(category_repository),
    );

    Router::new()
        .route("/sync/channels/:channel_id", post(sync_channel))
        .route("/sync/statistics", post(refresh_statistics))
        .with_state(Arc::new(catalog_sync_usecase))
}

#[derive(Debug, Serialize)]
pub struct SyncResultDto {
    pub processed: u64,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub days: Option<i64>,
}

pub async fn sync_channel<P, V, C>(
    State(catalog_sync_usecase): State<Arc<CatalogSyncUseCase<P, V, C>>>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
) -> impl IntoResponse
where
    P: VideoProvider + Send + Sync,
    V: VideoRepository + Send + Sync,
    C: CategoryRepository + Send + Sync,
{
    if !auth.is_admin() {
        return (StatusCode::FORBIDDEN, "Admin role required").into_response();
    }

    match catalog_sync_usecase.sync_channel(&channel_id).await {
        Ok(processed) => Json(SyncResultDto { processed }).into_response(),
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}

pub async fn refresh_statistics<P, V, C>(
    State(catalog_sync_usecase): State<Arc<CatalogSyncUseCase<P, V, C>>>,
    auth: AuthUser,
    Query(query): Query<StatsQuery>,
) -> impl IntoResponse
where
    P: VideoProvider + Send + Sync,
    V: VideoRepository + Send + Sync,
    C: CategoryRepository + Send + Sync,
{
    if !auth.is_admin() {
        return (StatusCode::FORBIDDEN, "Admin role required").into_response();
    }

    let days = query.days.unwrap_or(DEFAULT_STATS_WINDOW_DAYS);
    match catalog_sync_usecase.refresh_recent_statistics(days).await {
        Ok(processed) => Json(SyncResultDto { processed }).into_response(),
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}
