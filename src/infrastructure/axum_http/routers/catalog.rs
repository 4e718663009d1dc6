use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    application::usecases::catalog::CatalogUseCase,
    domain::repositories::{categories::CategoryRepository, videos::VideoRepository},
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{categories::CategoryPostgres, videos::VideoPostgres},
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let video_repository = VideoPostgres::new(Arc::clone(&db_pool));
    let category_repository = CategoryPostgres::new(Arc::clone(&db_pool));
    let catalog_usecase =
        CatalogUseCase::new(Arc::new(video_repository), Arc::new(category_repository));

    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/:slug", get(category_detail))
        .route("/videos/featured", get(featured_videos))
        .route("/videos/:video_id", get(video_detail))
        .with_state(Arc::new(catalog_usecase))
}

pub async fn list_categories<V, C>(
    State(catalog_usecase): State<Arc<CatalogUseCase<V, C>>>,
) -> impl IntoResponse
where
    V: VideoRepository + Send + Sync,
    C: CategoryRepository + Send + Sync,
{
    match catalog_usecase.list_categories().await {
        Ok(categories) => Json(categories).into_response(),
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}

pub async fn category_detail<V, C>(
    State(catalog_usecase): State<Arc<CatalogUseCase<V, C>>>,
    Path(slug): Path<String>,
) -> impl IntoResponse
where
    V: VideoRepository + Send + Sync,
    C: CategoryRepository + Send + Sync,
{
    match catalog_usecase.category_detail(&slug).await {
        Ok(detail) => Json(detail).into_response(),
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}

pub async fn video_detail<V, C>(
    State(catalog_usecase): State<Arc<CatalogUseCase<V, C>>>,
    Path(video_id): Path<Uuid>,
) -> impl IntoResponse
where
    V: VideoRepository + Send + Sync,
    C: CategoryRepository + Send + Sync,
{
    match catalog_usecase.video_detail(video_id).await {
        Ok(detail) => Json(detail).into_response(),
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}

pub async fn featured_videos<V, C>(
    State(catalog_usecase): State<Arc<CatalogUseCase<V, C>>>,
) -> impl IntoResponse
where
    V: VideoRepository + Send + Sync,
    C: CategoryRepository + Send + Sync,
{
    match catalog_usecase.featured_videos().await {
        Ok(videos) => Json(videos).into_response(),
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}
