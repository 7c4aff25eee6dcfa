//! SeaORM implementation of RegistrationRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{
    DomainError, DomainResult, Registration, RegistrationRepository, RegistrationStatus,
};
use crate::infrastructure::database::entities::registration;

pub struct SeaOrmRegistrationRepository {
    db: DatabaseConnection,
}

impl SeaOrmRegistrationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: registration::Model) -> Registration {
    Registration {
        id: m.id,
        user_id: m.user_id,
        event_id: m.event_id,
        status: RegistrationStatus::parse(&m.status),
        registered_at: m.registered_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Unexpected(format!("Database error: {}", e))
}

// ── RegistrationRepository impl ─────────────────────────────────

#[async_trait]
impl RegistrationRepository for SeaOrmRegistrationRepository {
    async fn save(&self, r: Registration) -> DomainResult<()> {
        let model = registration::ActiveModel {
            id: Set(r.id),
            user_id: Set(r.user_id),
            event_id: Set(r.event_id),
            status: Set(r.status.as_str().to_string()),
            registered_at: Set(r.registered_at),
        };
        model.insert(&self.db).await.map_err(|e| {
            // The unique (user_id, event_id) index backstops the
            // service-level duplicate check under concurrency.
            if e.to_string().contains("UNIQUE") || e.to_string().contains("duplicate") {
                DomainError::Conflict("User is already registered for this event".to_string())
            } else {
                db_err(e)
            }
        })?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Registration>> {
        let model = registration::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Registration>> {
        let models = registration::Entity::find()
            .order_by_desc(registration::Column::RegisteredAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_user(&self, user_id: &str) -> DomainResult<Vec<Registration>> {
        let models = registration::Entity::find()
            .filter(registration::Column::UserId.eq(user_id))
            .order_by_desc(registration::Column::RegisteredAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_event(&self, event_id: &str) -> DomainResult<Vec<Registration>> {
        let models = registration::Entity::find()
            .filter(registration::Column::EventId.eq(event_id))
            .order_by_desc(registration::Column::RegisteredAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_user_and_event(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> DomainResult<Option<Registration>> {
        let model = registration::Entity::find()
            .filter(registration::Column::UserId.eq(user_id))
            .filter(registration::Column::EventId.eq(event_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn count_confirmed_for_event(&self, event_id: &str) -> DomainResult<u64> {
        registration::Entity::find()
            .filter(registration::Column::EventId.eq(event_id))
            .filter(registration::Column::Status.eq(RegistrationStatus::Confirmed.as_str()))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn update(&self, r: Registration) -> DomainResult<()> {
        let existing = registration::Entity::find_by_id(&r.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::not_found("Registration", "id", r.id));
        };

        let mut active: registration::ActiveModel = existing.into();
        active.status = Set(r.status.as_str().to_string());
        active.registered_at = Set(r.registered_at);
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = registration::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Registration", "id", id));
        }
        Ok(())
    }
}
