use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    application::usecases::interactions::InteractionUseCase,
    domain::{
        repositories::{interactions::InteractionRepository, videos::VideoRepository},
        value_objects::interactions::{RecordWatchModel, ToggleBookmarkModel},
    },
    infrastructure::{
        axum_http::auth::AuthUser,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{interactions::InteractionPostgres, videos::VideoPostgres},
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let interaction_repository = InteractionPostgres::new(Arc::clone(&db_pool));
    let video_repository = VideoPostgres::new(Arc::clone(&db_pool));
    let interaction_usecase = InteractionUseCase::new(
        Arc::new(interaction_repository),
        Arc::new(video_repository),
    );

    Router::new()
        .route("/videos/:video_id/watch", post(record_watch))
        .route("/videos/:video_id/bookmark", post(toggle_bookmark))
        .route("/history", get(list_history))
        .route("/bookmarks", get(list_bookmarks))
        .with_state(Arc::new(interaction_usecase))
}

pub async fn record_watch<I, V>(
    State(interaction_usecase): State<Arc<InteractionUseCase<I, V>>>,
    auth: AuthUser,
    Path(video_id): Path<Uuid>,
    Json(model): Json<RecordWatchModel>,
) -> impl IntoResponse
where
    I: InteractionRepository + Send + Sync,
    V: VideoRepository + Send + Sync,
{
    match interaction_usecase
        .record_watch(auth.user_id, video_id, model)
        .await
    {
        Ok(entry_id) => (StatusCode::CREATED, Json(entry_id)).into_response(),
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}

pub async fn list_history<I, V>(
    State(interaction_usecase): State<Arc<InteractionUseCase<I, V>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    I: InteractionRepository + Send + Sync,
    V: VideoRepository + Send + Sync,
{
    match interaction_usecase.list_history(auth.user_id).await {
        Ok(entries) => Json(entries).into_response(),
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}

pub async fn toggle_bookmark<I, V>(
    State(interaction_usecase): State<Arc<InteractionUseCase<I, V>>>,
    auth: AuthUser,
    Path(video_id): Path<Uuid>,
    Json(model): Json<ToggleBookmarkModel>,
) -> impl IntoResponse
where
    I: InteractionRepository + Send + Sync,
    V: VideoRepository + Send + Sync,
{
    match interaction_usecase
        .toggle_bookmark(auth.user_id, video_id, model)
        .await
    {
        Ok(toggle) => Json(toggle).into_response(),
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}

pub async fn list_bookmarks<I, V>(
    State(interaction_usecase): State<Arc<InteractionUseCase<I, V>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    I: InteractionRepository + Send + Sync,
    V: VideoRepository + Send + Sync,
{
    match interaction_usecase.list_bookmarks(auth.user_id).await {
        Ok(bookmarks) => Json(bookmarks).into_response(),
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}
