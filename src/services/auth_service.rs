use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::auth_dto::RegisterRequest;
use crate::error::{Error, Result};
use crate::models::user::User;
use crate::utils::crypto;

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<User> {
        let email_taken: Option<(Uuid,)> =
            sqlx::query_as(r#"SELECT id FROM users WHERE email = $1"#)
                .bind(&req.email)
                .fetch_optional(&self.pool)
                .await?;
        if email_taken.is_some() {
            return Err(Error::BadRequest("Email already registered".to_string()));
        }

        let reg_taken: Option<(Uuid,)> =
            sqlx::query_as(r#"SELECT id FROM users WHERE registration_number = $1"#)
                .bind(&req.registration_number)
                .fetch_optional(&self.pool)
                .await?;
        if reg_taken.is_some() {
            return Err(Error::BadRequest(
                "Registration number already exists".to_string(),
            ));
        }

        let hashed_password = crypto::hash_password(&req.password)
            .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, registration_number, hashed_password,
                               degree, branch, batch, college)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&req.email)
        .bind(&req.name)
        .bind(&req.registration_number)
        .bind(&hashed_password)
        .bind(&req.degree)
        .bind(&req.branch)
        .bind(&req.batch)
        .bind(&req.college)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT * FROM users WHERE email = $1 AND is_active = TRUE"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::Unauthorized("Incorrect email or password".to_string()))?;

        let ok = crypto::verify_password(password, &user.hashed_password)
            .map_err(|e| Error::Internal(format!("Failed to verify password: {}", e)))?;
        if !ok {
            return Err(Error::Unauthorized(
                "Incorrect email or password".to_string(),
            ));
        }
        Ok(user)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1 AND is_active = TRUE"#)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::Unauthorized("User not found".to_string()))
    }
}
