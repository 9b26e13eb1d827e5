use crate::{
    auth::{hash_password, verify_password, AuthResponse, LoginRequest, RegisterRequest, TokenManager},
    error::AppError,
    models::{User, UserCredentials},
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Register a new user
///
/// Creates a new user account and returns an authentication token.
/// Registering an email that already has an account is a conflict.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    tokens: web::Data<TokenManager>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    register_data.validate()?;

    // Check if email already exists
    let existing_user = sqlx::query_as::<_, (i32,)>("SELECT id FROM users WHERE email = $1")
        .bind(&register_data.email)
        .fetch_optional(&**pool)
        .await?;

    if existing_user.is_some() {
        return Err(AppError::Conflict("User already exists".into()));
    }

    // Hash password
    let password_hash = hash_password(&register_data.password)?;

    // Insert new user
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3)
         RETURNING id, name, email, created_at",
    )
    .bind(&register_data.name)
    .bind(&register_data.email)
    .bind(password_hash)
    .fetch_one(&**pool)
    .await?;

    // Generate token
    let token = tokens.issue(user.id)?;

    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}

/// Login user
///
/// Authenticates a user and returns an authentication token. An unknown
/// email and a wrong password produce the identical response, so a caller
/// cannot tell which of the two failed.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    tokens: web::Data<TokenManager>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    login_data.validate()?;

    // Get user from database
    let user = sqlx::query_as::<_, UserCredentials>(
        "SELECT id, password_hash FROM users WHERE email = $1",
    )
    .bind(&login_data.email)
    .fetch_optional(&**pool)
    .await?;

    match user {
        Some(user) => {
            // Verify password
            if verify_password(&login_data.password, &user.password_hash)? {
                let token = tokens.issue(user.id)?;
                Ok(HttpResponse::Ok().json(AuthResponse { token }))
            } else {
                Err(AppError::InvalidCredentials)
            }
        }
        None => Err(AppError::InvalidCredentials),
    }
}
