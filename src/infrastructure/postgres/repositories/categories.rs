use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{insert_into, prelude::*};
use uuid::Uuid;

use crate::{
    domain::{
        entities::categories::{CategoryEntity, InsertCategoryEntity},
        repositories::categories::CategoryRepository,
        value_objects::enums::category_kinds::CategoryKind,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::categories},
};

pub struct CategoryPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CategoryPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CategoryRepository for CategoryPostgres {
    async fn ensure_seed_categories(&self) -> Result<HashMap<CategoryKind, Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut ids = HashMap::with_capacity(CategoryKind::SEED.len());
        for kind in CategoryKind::SEED {
            let insert_category = InsertCategoryEntity {
                name: kind.name().to_string(),
                slug: kind.slug().to_string(),
                description: kind.description().to_string(),
            };

            let id = insert_into(categories::table)
                .values(&insert_category)
                .on_conflict(categories::slug)
                .do_update()
                .set((
                    categories::name.eq(kind.name()),
                    categories::description.eq(kind.description()),
                ))
                .returning(categories::id)
                .get_result::<Uuid>(&mut conn)?;

            ids.insert(kind, id);
        }

        Ok(ids)
    }

    async fn list(&self) -> Result<Vec<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = categories::table
            .order(categories::name.asc())
            .select(CategoryEntity::as_select())
            .load::<CategoryEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = categories::table
            .filter(categories::slug.eq(slug))
            .select(CategoryEntity::as_select())
            .first::<CategoryEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }
}
