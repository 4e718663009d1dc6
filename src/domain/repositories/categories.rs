use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    entities::categories::CategoryEntity, value_objects::enums::category_kinds::CategoryKind,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository {
    /// Upserts the fixed seed set by slug and returns their ids. Called before
    /// classification so the classifier stays side-effect free.
    async fn ensure_seed_categories(&self) -> Result<HashMap<CategoryKind, Uuid>>;

    async fn list(&self) -> Result<Vec<CategoryEntity>>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryEntity>>;
}
