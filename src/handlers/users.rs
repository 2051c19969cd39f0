use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    jwt::create_token,
    middleware::AuthUser,
    password::{hash_password, verify_password},
};
use crate::error::{AppError, AppJson, AppResult};
use crate::models::user::{ProfileFields, User, UserProfile};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub profile: Option<ProfileFields>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

pub async fn register(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let email = body.email.trim().to_lowercase();

    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&state.db)
        .await?;

    if existing > 0 {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let pwd_hash = hash_password(&body.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name, email, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&body.name)
    .bind(&email)
    .bind(&pwd_hash)
    .fetch_one(&state.db)
    .await?;

    let token = create_token(user.id, &user.email, &state.config)?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let email = body.email.trim().to_lowercase();

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&body.password, &user.password_hash) {
        return Err(AppError::Unauthorized);
    }

    let token = create_token(user.id, &user.email, &state.config)?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserProfile>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(auth_user.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(Json(user.into()))
}

/// Partial update: provided fields overwrite, everything else is kept.
/// Profile fields merge individually so updating the weight does not drop
/// the stored age. A fresh token is returned since the email may change.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<AuthResponse>> {
    let pwd_hash = match body.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };
    let email = body
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .map(|e| e.trim().to_lowercase());
    let profile = body.profile.unwrap_or_default();

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            name = COALESCE($2, name),
            email = COALESCE($3, email),
            password_hash = COALESCE($4, password_hash),
            age = COALESCE($5, age),
            gender = COALESCE($6, gender),
            disease_start_date = COALESCE($7, disease_start_date),
            height_cm = COALESCE($8, height_cm),
            weight_kg = COALESCE($9, weight_kg),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(auth_user.id)
    .bind(body.name.as_deref().filter(|n| !n.is_empty()))
    .bind(email)
    .bind(pwd_hash)
    .bind(profile.age)
    .bind(profile.gender)
    .bind(profile.disease_start_date)
    .bind(profile.height_cm)
    .bind(profile.weight_kg)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("User not found".into()))?;

    let token = create_token(user.id, &user.email, &state.config)?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}
