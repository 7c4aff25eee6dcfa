//! SeaORM implementation of EventRepository

use async_trait::async_trait;
use chrono::{NaiveTime, TimeZone, Utc};
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{DomainError, DomainResult, Event, EventRepository, EventSearch};
use crate::infrastructure::database::entities::event;

pub struct SeaOrmEventRepository {
    db: DatabaseConnection,
}

impl SeaOrmEventRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: event::Model) -> Event {
    Event {
        id: m.id,
        name: m.name,
        description: m.description,
        start_time: m.start_time,
        end_time: m.end_time,
        location: m.location,
        category: m.category,
        capacity: m.capacity,
        published: m.published,
        version: m.version,
        organizer_id: m.organizer_id,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Unexpected(format!("Database error: {}", e))
}

// ── EventRepository impl ────────────────────────────────────────

#[async_trait]
impl EventRepository for SeaOrmEventRepository {
    async fn save(&self, e: Event) -> DomainResult<()> {
        let model = event::ActiveModel {
            id: Set(e.id),
            name: Set(e.name),
            description: Set(e.description),
            start_time: Set(e.start_time),
            end_time: Set(e.end_time),
            location: Set(e.location),
            category: Set(e.category),
            capacity: Set(e.capacity),
            published: Set(e.published),
            version: Set(e.version),
            organizer_id: Set(e.organizer_id),
            created_at: Set(e.created_at),
            updated_at: Set(e.updated_at),
        };
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Event>> {
        let model = event::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Event>> {
        let models = event::Entity::find()
            .order_by_asc(event::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_published(&self) -> DomainResult<Vec<Event>> {
        let models = event::Entity::find()
            .filter(event::Column::Published.eq(true))
            .order_by_asc(event::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_organizer(&self, organizer_id: &str) -> DomainResult<Vec<Event>> {
        let models = event::Entity::find()
            .filter(event::Column::OrganizerId.eq(organizer_id))
            .order_by_asc(event::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn search(&self, filter: &EventSearch) -> DomainResult<Vec<Event>> {
        let mut query = event::Entity::find().filter(event::Column::Published.eq(true));

        if let Some(ref keyword) = filter.keyword {
            query = query.filter(
                Condition::any()
                    .add(event::Column::Name.contains(keyword))
                    .add(event::Column::Description.contains(keyword)),
            );
        }

        if let Some(ref category) = filter.category {
            query = query.filter(event::Column::Category.eq(category));
        }

        if let Some(date) = filter.date {
            // Match the calendar day of the start time
            let day_start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
            let day_end = day_start + chrono::Duration::days(1);
            query = query
                .filter(event::Column::StartTime.gte(day_start))
                .filter(event::Column::StartTime.lt(day_end));
        }

        let models = query
            .order_by_asc(event::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, e: Event) -> DomainResult<()> {
        let existing = event::Entity::find_by_id(&e.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::not_found("Event", "id", e.id));
        };

        let mut active: event::ActiveModel = existing.into();
        active.name = Set(e.name);
        active.description = Set(e.description);
        active.start_time = Set(e.start_time);
        active.end_time = Set(e.end_time);
        active.location = Set(e.location);
        active.category = Set(e.category);
        active.capacity = Set(e.capacity);
        active.published = Set(e.published);
        active.updated_at = Set(e.updated_at);
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = event::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Event", "id", id));
        }
        Ok(())
    }

    async fn claim_version(&self, id: &str, expected_version: i64) -> DomainResult<bool> {
        let result = event::Entity::update_many()
            .filter(event::Column::Id.eq(id))
            .filter(event::Column::Version.eq(expected_version))
            .col_expr(event::Column::Version, Expr::value(expected_version + 1))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected == 1)
    }
}
