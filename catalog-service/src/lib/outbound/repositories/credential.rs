use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::SqlitePool;

use crate::domain::session::models::CredentialRecord;
use crate::domain::session::models::NewCredential;
use crate::domain::session::models::UserId;
use crate::domain::session::models::Username;
use crate::domain::session::ports::CredentialRepository;
use crate::session::errors::SessionError;

pub struct SqliteCredentialRepository {
    pool: SqlitePool,
}

impl SqliteCredentialRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CredentialRow {
    id: i64,
    username: String,
    password_digest: String,
    refresh_token: Option<String>,
    refresh_token_expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<CredentialRow> for CredentialRecord {
    type Error = SessionError;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        Ok(CredentialRecord {
            id: UserId(row.id),
            username: Username::new(row.username)?,
            password_digest: row.password_digest,
            refresh_token: row.refresh_token,
            refresh_token_expires_at: row.refresh_token_expires_at,
        })
    }
}

#[async_trait]
impl CredentialRepository for SqliteCredentialRepository {
    async fn create(&self, credential: NewCredential) -> Result<CredentialRecord, SessionError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_digest)
            VALUES (?, ?)
            "#,
        )
        .bind(credential.username.as_str())
        .bind(&credential.password_digest)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return SessionError::UsernameAlreadyExists(
                        credential.username.as_str().to_string(),
                    );
                }
            }
            SessionError::DatabaseError(e.to_string())
        })?;

        Ok(CredentialRecord {
            id: UserId(result.last_insert_rowid()),
            username: credential.username,
            password_digest: credential.password_digest,
            refresh_token: None,
            refresh_token_expires_at: None,
        })
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<CredentialRecord>, SessionError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, username, password_digest, refresh_token, refresh_token_expires_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        row.map(CredentialRecord::try_from).transpose()
    }

    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<CredentialRecord>, SessionError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, username, password_digest, refresh_token, refresh_token_expires_at
            FROM users
            WHERE refresh_token = ?
            "#,
        )
        .bind(refresh_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        row.map(CredentialRecord::try_from).transpose()
    }

    async fn save(&self, record: CredentialRecord) -> Result<CredentialRecord, SessionError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = ?, refresh_token_expires_at = ?
            WHERE id = ?
            "#,
        )
        .bind(record.refresh_token.as_deref())
        .bind(record.refresh_token_expires_at)
        .bind(record.id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(SessionError::DatabaseError(format!(
                "No credential record with id {}",
                record.id
            )));
        }

        Ok(record)
    }

    async fn clear_refresh_token(&self, refresh_token: &str) -> Result<(), SessionError> {
        sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = NULL, refresh_token_expires_at = NULL
            WHERE refresh_token = ?
            "#,
        )
        .bind(refresh_token)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn repository() -> SqliteCredentialRepository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        SqliteCredentialRepository::new(pool)
    }

    fn new_credential(username: &str) -> NewCredential {
        NewCredential {
            username: Username::new(username.to_string()).unwrap(),
            password_digest: "$argon2id$v=19$m=65536,t=1,p=4$salt$key".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_username() {
        let repository = repository().await;

        let created = repository
            .create(new_credential("admin"))
            .await
            .expect("Failed to create credential");

        let found = repository
            .find_by_username(&created.username)
            .await
            .expect("Lookup failed")
            .expect("Record should exist");

        assert_eq!(found.id, created.id);
        assert_eq!(found.password_digest, created.password_digest);
        assert!(found.refresh_token.is_none());
        assert!(found.refresh_token_expires_at.is_none());

        let missing = repository
            .find_by_username(&Username::new("nobody".to_string()).unwrap())
            .await
            .expect("Lookup failed");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_username() {
        let repository = repository().await;

        repository.create(new_credential("admin")).await.unwrap();
        let result = repository.create(new_credential("admin")).await;

        assert!(matches!(
            result,
            Err(SessionError::UsernameAlreadyExists(name)) if name == "admin"
        ));
    }

    #[tokio::test]
    async fn test_save_and_find_by_refresh_token() {
        let repository = repository().await;

        let mut record = repository.create(new_credential("admin")).await.unwrap();
        let expires_at = Utc::now() + Duration::days(7);
        record.start_session("token-one".to_string(), expires_at);
        repository.save(record).await.expect("Save failed");

        let found = repository
            .find_by_refresh_token("token-one")
            .await
            .expect("Lookup failed")
            .expect("Record should hold token");
        assert_eq!(found.username.as_str(), "admin");
        assert_eq!(
            found.refresh_token_expires_at.map(|t| t.timestamp()),
            Some(expires_at.timestamp())
        );

        assert!(repository
            .find_by_refresh_token("token-two")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_second_save_overwrites_previous_token() {
        let repository = repository().await;

        let mut record = repository.create(new_credential("admin")).await.unwrap();
        record.start_session("first".to_string(), Utc::now() + Duration::days(7));
        let mut record = repository.save(record).await.unwrap();
        record.start_session("second".to_string(), Utc::now() + Duration::days(7));
        repository.save(record).await.unwrap();

        assert!(repository.find_by_refresh_token("first").await.unwrap().is_none());
        assert!(repository.find_by_refresh_token("second").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_save_missing_record() {
        let repository = repository().await;

        let mut record = repository.create(new_credential("admin")).await.unwrap();
        record.id = UserId(999);
        record.start_session("token".to_string(), Utc::now());

        let result = repository.save(record).await;
        assert!(matches!(result, Err(SessionError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_clear_refresh_token_is_idempotent() {
        let repository = repository().await;

        let mut record = repository.create(new_credential("admin")).await.unwrap();
        record.start_session("token".to_string(), Utc::now() + Duration::days(7));
        repository.save(record).await.unwrap();

        repository.clear_refresh_token("token").await.expect("Clear failed");
        repository
            .clear_refresh_token("token")
            .await
            .expect("Second clear should be a no-op");

        let record = repository
            .find_by_username(&Username::new("admin".to_string()).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(record.refresh_token.is_none());
        assert!(record.refresh_token_expires_at.is_none());
    }
}
