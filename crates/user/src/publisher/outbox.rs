use async_trait::async_trait;
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::{SqlitePool, prelude::FromRow};
use userhub_db::table::UserEvent as UserEventTable;
use userhub_shared::{USER_TOPIC, UserEvent};

use super::{PublishError, Publisher};

/// Appends events to the `user_event` table. A relay outside this service
/// drains the table into the broker.
#[derive(Clone)]
pub struct OutboxPublisher {
    pool: SqlitePool,
}

#[derive(Clone, Debug, FromRow, Serialize)]
pub struct OutboxMessage {
    pub id: i64,
    pub topic: String,
    pub event_key: String,
    pub payload: String,
    pub created_at: i64,
}

impl OutboxMessage {
    pub fn event(&self) -> Result<UserEvent, serde_json::Error> {
        serde_json::from_str(&self.payload)
    }
}

impl OutboxPublisher {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Most recent messages on the users topic, newest first.
    pub async fn recent(&self, limit: u64) -> Result<Vec<OutboxMessage>, sqlx::Error> {
        let statement = Query::select()
            .columns([
                UserEventTable::Id,
                UserEventTable::Topic,
                UserEventTable::EventKey,
                UserEventTable::Payload,
                UserEventTable::CreatedAt,
            ])
            .from(UserEventTable::Table)
            .and_where(Expr::col(UserEventTable::Topic).eq(USER_TOPIC))
            .order_by(UserEventTable::Id, Order::Desc)
            .limit(limit)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, OutboxMessage, _>(&sql, values)
            .fetch_all(&self.pool)
            .await
    }
}

#[async_trait]
impl Publisher for OutboxPublisher {
    async fn publish(&self, event: &UserEvent) -> Result<(), PublishError> {
        let payload = serde_json::to_string(event)?;
        let statement = Query::insert()
            .into_table(UserEventTable::Table)
            .columns([
                UserEventTable::Topic,
                UserEventTable::EventKey,
                UserEventTable::Payload,
                UserEventTable::CreatedAt,
            ])
            .values_panic([
                USER_TOPIC.into(),
                event.email.to_owned().into(),
                payload.into(),
                userhub_shared::to_millis(userhub_shared::now()).into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        tracing::debug!(
            topic = USER_TOPIC,
            email = %event.email,
            operation = %event.operation,
            "user event stored in outbox"
        );

        Ok(())
    }
}
