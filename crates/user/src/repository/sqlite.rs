use async_trait::async_trait;
use sea_query::{Expr, ExprTrait, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};
use userhub_db::table::User as UserTable;
use userhub_shared::{Error, Result};

use crate::{NewUser, User, email::EMAIL_IN_USE};

use super::Store;

#[derive(FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    age: i32,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<UserRow> for User {
    type Error = Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            age: row.age,
            created_at: userhub_shared::from_millis(row.created_at)?,
            updated_at: userhub_shared::from_millis(row.updated_at)?,
        })
    }
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn select_user() -> SelectStatement {
    Query::select()
        .columns([
            UserTable::Id,
            UserTable::Name,
            UserTable::Email,
            UserTable::Age,
            UserTable::CreatedAt,
            UserTable::UpdatedAt,
        ])
        .from(UserTable::Table)
        .to_owned()
}

fn map_write_error(err: sqlx::Error) -> Error {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Error::Conflict(EMAIL_IN_USE.to_owned())
        }
        err => err.into(),
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let statement = select_user()
            .and_where(Expr::col(UserTable::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, UserRow, _>(&sql, values)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let statement = Query::select()
            .column(UserTable::Id)
            .from(UserTable::Table)
            .and_where(Expr::col(UserTable::Email).eq(email))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let now = userhub_shared::now();
        let millis = userhub_shared::to_millis(now);
        let statement = Query::insert()
            .into_table(UserTable::Table)
            .columns([
                UserTable::Name,
                UserTable::Email,
                UserTable::Age,
                UserTable::CreatedAt,
                UserTable::UpdatedAt,
            ])
            .values_panic([
                user.name.to_owned().into(),
                user.email.to_owned().into(),
                user.age.into(),
                millis.into(),
                millis.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(User {
            id: result.last_insert_rowid(),
            name: user.name,
            email: user.email,
            age: user.age,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(&self, user: &User) -> Result<User> {
        let now = userhub_shared::now();
        let statement = Query::update()
            .table(UserTable::Table)
            .value(UserTable::Name, user.name.to_owned())
            .value(UserTable::Email, user.email.to_owned())
            .value(UserTable::Age, user.age)
            .value(UserTable::UpdatedAt, userhub_shared::to_millis(now))
            .and_where(Expr::col(UserTable::Id).eq(user.id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            userhub_shared::not_found!("User not found");
        }

        Ok(User {
            updated_at: now,
            ..user.clone()
        })
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let statement = Query::delete()
            .from_table(UserTable::Table)
            .and_where(Expr::col(UserTable::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        let statement = select_user()
            .order_by(UserTable::Id, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, UserRow, _>(&sql, values)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }
}
