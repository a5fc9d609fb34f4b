use axum::{extract::State, http::StatusCode, Json};
use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::auth::jwt::{sign_token, TOKEN_TTL_HOURS};
use crate::config::AdminSeed;
use crate::dtos::profile::{LoginRequest, LoginResponse, ProfileResponse, RegisterRequest};
use crate::error::{map_unique_violation, AppError};
use crate::ledger::Role;
use crate::models::profile::{Profile, PROFILE_COLUMNS};
use crate::state::AppState;

fn validate_registration(payload: &RegisterRequest) -> Result<(), AppError> {
    if payload.role == Role::Admin {
        return Err(AppError::validation("Invalid role"));
    }
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("Username required"));
    }
    let email = payload.email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
        _ => return Err(AppError::validation("Valid email required")),
    }
    if payload.password.len() < 6 {
        return Err(AppError::validation("Password too short"));
    }
    Ok(())
}

/// Unknown users and wrong passwords get the same 401 so logins cannot be
/// used to discover which usernames exist.
fn check_credentials(user: Option<Profile>, password: &str) -> Result<Profile, AppError> {
    let Some(user) = user else {
        return Err(AppError::Unauthorized);
    };

    let ok = verify(password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Password verify error: {e}")))?;

    if !ok {
        return Err(AppError::Unauthorized);
    }
    Ok(user)
}

#[instrument(skip(db_pool, payload), fields(username = %payload.username, role = %payload.role))]
pub async fn register(
    State(AppState { db_pool, .. }): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), AppError> {
    validate_registration(&payload)?;

    let password_hash = hash(&payload.password, DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Hash error: {e}")))?;

    let mut tx = db_pool.begin().await?;

    let profile = sqlx::query_as::<_, Profile>(&format!(
        "INSERT INTO profiles (username, email, password_hash, role, phone, location)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(payload.username.trim())
    .bind(payload.email.trim())
    .bind(&password_hash)
    .bind(payload.role.as_str())
    .bind(&payload.phone)
    .bind(&payload.location)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| map_unique_violation(e, "Username or email already exists"))?;

    // Milkmen start out pending until an admin approves them.
    if profile.role == Role::Milkman {
        sqlx::query(
            "INSERT INTO milkmen (id, name, location, phone) VALUES ($1, $2, $3, $4)"
        )
        .bind(profile.id)
        .bind(&profile.username)
        .bind(profile.location.as_deref().unwrap_or_default())
        .bind(profile.phone.as_deref().unwrap_or_default())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!(user_id = profile.id, "Profile registered");

    Ok((StatusCode::CREATED, Json(ProfileResponse::from(profile))))
}

pub async fn login(
    State(AppState { db_pool, config }): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("Username required"));
    }
    if payload.password.is_empty() {
        return Err(AppError::validation("Password required"));
    }

    let user = sqlx::query_as::<_, Profile>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE username = $1"
    ))
    .bind(payload.username.trim())
    .fetch_optional(&db_pool)
    .await?;

    let user = check_credentials(user, &payload.password)?;

    let token = sign_token(user.id, user.role, &user.username, &config.jwt_secret)?;

    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer",
        expires_in_seconds: TOKEN_TTL_HOURS * 60 * 60,
        role: user.role,
    }))
}

/// Admin accounts cannot self-register; the first one comes from config.
pub async fn seed_admin(db_pool: &PgPool, seed: &AdminSeed) -> Result<(), AppError> {
    let password_hash = hash(&seed.password, DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Hash error: {e}")))?;

    let inserted = sqlx::query(
        "INSERT INTO profiles (username, email, password_hash, role)
         VALUES ($1, $2, $3, 'admin')
         ON CONFLICT (username) DO NOTHING"
    )
    .bind(&seed.username)
    .bind(&seed.email)
    .bind(&password_hash)
    .execute(db_pool)
    .await?
    .rows_affected();

    if inserted > 0 {
        info!(username = %seed.username, "Bootstrap admin created");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(role: Role, username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            role,
            phone: None,
            location: None,
        }
    }

    fn profile(password: &str) -> Profile {
        Profile {
            id: 3,
            username: "asha".into(),
            email: "asha@mail.in".into(),
            password_hash: hash(password, 4).unwrap(),
            role: Role::Buyer,
            phone: None,
            location: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn login_failures_are_indistinguishable() {
        let unknown = check_credentials(None, "secret1").unwrap_err();
        let wrong = check_credentials(Some(profile("secret1")), "secret2").unwrap_err();
        assert!(matches!(unknown, AppError::Unauthorized));
        assert!(matches!(wrong, AppError::Unauthorized));
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn correct_password_returns_profile() {
        let user = check_credentials(Some(profile("secret1")), "secret1").unwrap();
        assert_eq!(user.id, 3);
    }

    #[test]
    fn registration_rules() {
        assert!(validate_registration(&request(Role::Buyer, "asha", "asha@mail.in", "secret1")).is_ok());
        assert!(validate_registration(&request(Role::Milkman, "gopal", "g@farm.in", "secret1")).is_ok());
        assert!(validate_registration(&request(Role::Admin, "boss", "b@d.in", "secret1")).is_err());
        assert!(validate_registration(&request(Role::Buyer, "  ", "a@b.in", "secret1")).is_err());
        assert!(validate_registration(&request(Role::Buyer, "asha", "asha.mail.in", "secret1")).is_err());
        assert!(validate_registration(&request(Role::Buyer, "asha", "asha@mail.in", "123")).is_err());
    }
}
