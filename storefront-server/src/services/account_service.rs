//! Account Service
//!
//! Registration, login and admin account management.

use crate::auth::JwtService;
use crate::db::repository::{RepoError, user as user_repo};
use crate::security_log;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validation::{
    FieldErrors, MAX_PASSWORD_LEN, MAX_PERSON_NAME_LEN, MAX_PHONE_LEN, MIN_ADMIN_PASSWORD_LEN,
    is_valid_email, normalize_email, validate_password_strength,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    AdminCreate, AuthResponse, AuthUser, CustomerOverview, LoginRequest, RegisterRequest, User,
    UserRole, split_name,
};
use shared::util::now_millis;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AccountService {
    pool: SqlitePool,
    jwt: Arc<JwtService>,
}

impl AccountService {
    pub fn new(pool: SqlitePool, jwt: Arc<JwtService>) -> Self {
        Self { pool, jwt }
    }

    /// Create a customer account and sign it in
    pub async fn register(&self, req: RegisterRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&req.email);
        let phone = req.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());

        let mut errors = FieldErrors::new();
        check_email(&mut errors, &email);
        check_person_name(&mut errors, "first_name", &req.first_name);
        check_person_name(&mut errors, "last_name", &req.last_name);
        if req.password.is_empty() {
            errors.add("password", "password is required");
        }
        check_phone(&mut errors, phone);
        errors.into_result()?;
        validate_password_strength(&req.password)?;

        if user_repo::email_exists(&self.pool, &email).await? {
            return Err(email_taken());
        }

        let user = self
            .create_user(
                &email,
                &req.password,
                req.first_name.trim(),
                req.last_name.trim(),
                phone,
                UserRole::Customer,
            )
            .await?;

        tracing::info!(user_id = user.id, "Customer registered");
        self.issue(&user)
    }

    /// Exchange credentials for a token
    pub async fn login(&self, req: LoginRequest) -> AppResult<AuthResponse> {
        let identifier = req
            .identifier()
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::RequiredField, "Email and password are required")
            })?
            .to_string();
        if req.password.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "Email and password are required",
            ));
        }
        let email = normalize_email(&identifier);

        let record = user_repo::find_record_by_email(&self.pool, &email).await?;
        let Some(record) = record else {
            security_log!("WARN", "login_failed", reason = "unknown_user");
            return Err(AppError::invalid_credentials());
        };
        if !record.user.is_active {
            security_log!("WARN", "login_failed", reason = "inactive", user_id = record.user.id);
            return Err(AppError::invalid_credentials());
        }
        if !verify_password(&req.password, &record.password_hash) {
            security_log!("WARN", "login_failed", reason = "bad_password", user_id = record.user.id);
            return Err(AppError::invalid_credentials());
        }

        tracing::info!(user_id = record.user.id, role = %record.user.role, "User logged in");
        self.issue(&record.user)
    }

    /// Current state of an account, for endpoints that must not trust claims
    pub async fn active_user(&self, user_id: i64) -> AppResult<User> {
        let user = user_repo::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::with_message(ErrorCode::UserNotFound, "User not found"))?;
        if !user.is_active {
            return Err(AppError::new(ErrorCode::AccountDisabled));
        }
        Ok(user)
    }

    pub async fn list_customers(&self) -> AppResult<Vec<CustomerOverview>> {
        Ok(user_repo::list_customers(&self.pool).await?)
    }

    pub async fn list_admins(&self) -> AppResult<Vec<User>> {
        Ok(user_repo::list_admins(&self.pool).await?)
    }

    pub async fn create_admin(&self, req: AdminCreate) -> AppResult<User> {
        let email = normalize_email(&req.email);
        let phone = req.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());
        let (first_name, last_name) = split_name(&req.name);

        let mut errors = FieldErrors::new();
        check_person_name(&mut errors, "name", &req.name);
        check_email(&mut errors, &email);
        check_admin_password(&mut errors, &req.password);
        check_phone(&mut errors, phone);
        errors.into_result()?;

        if user_repo::email_exists(&self.pool, &email).await? {
            return Err(email_taken());
        }

        let user = self
            .create_user(&email, &req.password, &first_name, &last_name, phone, UserRole::Admin)
            .await?;
        security_log!("INFO", "admin_created", user_id = user.id);
        Ok(user)
    }

    /// Delete another admin account
    pub async fn delete_admin(&self, acting_id: i64, admin_id: i64) -> AppResult<()> {
        if acting_id == admin_id {
            return Err(AppError::with_message(
                ErrorCode::CannotModifySelf,
                "You cannot delete your own account",
            ));
        }
        if !user_repo::delete_admin(&self.pool, admin_id).await? {
            return Err(admin_not_found());
        }
        security_log!("INFO", "admin_deleted", user_id = admin_id, by = acting_id);
        Ok(())
    }

    /// Reset another admin's password
    pub async fn reset_admin_password(
        &self,
        acting_id: i64,
        admin_id: i64,
        password: &str,
    ) -> AppResult<()> {
        if acting_id == admin_id {
            return Err(AppError::with_message(
                ErrorCode::CannotModifySelf,
                "You cannot reset your own password here",
            ));
        }
        let mut errors = FieldErrors::new();
        check_admin_password(&mut errors, password);
        errors.into_result()?;

        let hash = hash(password)?;
        if !user_repo::set_admin_password(&self.pool, admin_id, &hash, now_millis()).await? {
            return Err(admin_not_found());
        }
        security_log!("INFO", "admin_password_reset", user_id = admin_id, by = acting_id);
        Ok(())
    }

    async fn create_user(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        phone: Option<&str>,
        role: UserRole,
    ) -> AppResult<User> {
        let password_hash = hash(password)?;
        let new_user = user_repo::NewUser {
            email,
            password_hash: &password_hash,
            first_name,
            last_name,
            phone,
            role,
        };
        user_repo::create(&self.pool, &new_user, now_millis())
            .await
            .map_err(|e| match e {
                // lost a race with a concurrent registration
                RepoError::Duplicate(_) => email_taken(),
                other => other.into(),
            })
    }

    fn issue(&self, user: &User) -> AppResult<AuthResponse> {
        let token = self
            .jwt
            .generate_token(user.id, &user.email, user.role)
            .map_err(|e| AppError::internal("Failed to generate token").with_cause(e.to_string()))?;
        Ok(AuthResponse {
            token,
            user: AuthUser::from(user),
        })
    }
}

fn hash(password: &str) -> AppResult<String> {
    hash_password(password)
        .map_err(|e| AppError::internal("Failed to hash password").with_cause(e.to_string()))
}

fn email_taken() -> AppError {
    AppError::with_message(ErrorCode::EmailAlreadyRegistered, "Email is already registered")
        .with_detail("email", "taken")
}

fn admin_not_found() -> AppError {
    AppError::with_message(ErrorCode::UserNotFound, "Admin not found")
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.is_empty() {
        errors.add("email", "email is required");
    } else if !is_valid_email(email) {
        errors.add("email", "Invalid email address");
    }
}

fn check_person_name(errors: &mut FieldErrors, field: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, format!("{field} is required"));
    } else if value.chars().count() > MAX_PERSON_NAME_LEN {
        errors.add(field, format!("{field} must be at most {MAX_PERSON_NAME_LEN} characters"));
    }
}

fn check_phone(errors: &mut FieldErrors, phone: Option<&str>) {
    if phone.is_some_and(|p| p.chars().count() > MAX_PHONE_LEN) {
        errors.add("phone", format!("phone must be at most {MAX_PHONE_LEN} characters"));
    }
}

fn check_admin_password(errors: &mut FieldErrors, password: &str) {
    let len = password.chars().count();
    if len < MIN_ADMIN_PASSWORD_LEN {
        errors.add(
            "password",
            format!("password must be at least {MIN_ADMIN_PASSWORD_LEN} characters"),
        );
    } else if len > MAX_PASSWORD_LEN {
        errors.add(
            "password",
            format!("password must be at most {MAX_PASSWORD_LEN} characters"),
        );
    }
}
