//! Login, registration and student verification.

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{AuthResponse, RegisterRequest, User},
    store::UserStore,
    utils::{
        hash::{check_password, hash_password},
        jwt::TokenSigner,
    },
};

/// Emails are compared case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn auth_response(tokens: &TokenSigner, user: User) -> Result<AuthResponse, AppError> {
    Ok(AuthResponse {
        token: tokens.issue(&user)?,
        token_type: "Bearer",
        user,
    })
}

pub async fn login(
    users: &dyn UserStore,
    tokens: &TokenSigner,
    email: &str,
    password: &str,
) -> Result<AuthResponse, AppError> {
    let user = users
        .find_by_email(&normalize_email(email))
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    check_password(password, &user.password)?;

    tracing::info!("User {} logged in", user.id);
    auth_response(tokens, user)
}

pub async fn register(
    users: &dyn UserStore,
    tokens: &TokenSigner,
    mut request: RegisterRequest,
) -> Result<AuthResponse, AppError> {
    request.name = request.name.trim().to_string();
    request.validate()?;

    let email = normalize_email(&request.email);
    // Checked before hashing; insert re-checks under the write lock.
    if users.find_by_email(&email).await?.is_some() {
        return Err(AppError::DuplicateEmail(email));
    }

    let user = User::new(
        Uuid::new_v4().to_string(),
        email,
        request.name,
        hash_password(&request.password)?,
        request.is_student,
    );
    let user = users.insert(user).await?;

    tracing::info!("Registered user {} (student: {})", user.id, user.is_student);
    auth_response(tokens, user)
}

/// Marks a student account as verified when `code` matches.
pub async fn verify_student(
    users: &dyn UserStore,
    expected_code: &str,
    email: &str,
    code: &str,
) -> Result<User, AppError> {
    if code != expected_code {
        return Err(AppError::InvalidCode);
    }

    let user = users
        .find_by_email(&normalize_email(email))
        .await?
        .ok_or(AppError::InvalidCode)?;

    let user = users
        .update_with(
            &user.id,
            Box::new(|u| {
                u.is_verified = true;
                Ok(())
            }),
        )
        .await?;

    tracing::info!("Student account {} verified", user.id);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryUserStore;

    fn request(email: &str, is_student: bool) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "password123".to_string(),
            name: "Jane Doe".to_string(),
            is_student,
        }
    }

    #[tokio::test]
    async fn register_then_login_yields_matching_claims() {
        let users = MemoryUserStore::new();
        let tokens = TokenSigner::new("test-secret", 3600);

        let registered = register(&users, &tokens, request("Jane@Example.com", false))
            .await
            .unwrap();
        assert_eq!(registered.user.email, "jane@example.com");
        assert!(registered.user.is_verified);
        assert_eq!(
            registered.user.subscription,
            crate::models::user::Subscription::Basic
        );

        let logged_in = login(&users, &tokens, "jane@example.com", "password123")
            .await
            .unwrap();
        let claims = tokens.verify(&logged_in.token).unwrap();
        assert_eq!(claims.sub, registered.user.id);
        assert_eq!(claims.email, "jane@example.com");
    }

    #[tokio::test]
    async fn register_twice_fails() {
        let users = MemoryUserStore::new();
        let tokens = TokenSigner::new("test-secret", 3600);

        register(&users, &tokens, request("jane@example.com", false))
            .await
            .unwrap();
        let err = register(&users, &tokens, request("jane@example.com", false))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn login_failures_are_distinguished() {
        let users = MemoryUserStore::new();
        let tokens = TokenSigner::new("test-secret", 3600);
        register(&users, &tokens, request("jane@example.com", false))
            .await
            .unwrap();

        assert!(matches!(
            login(&users, &tokens, "nobody@example.com", "password123").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            login(&users, &tokens, "jane@example.com", "wrong").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn student_verification_requires_code_and_account() {
        let users = MemoryUserStore::new();
        let tokens = TokenSigner::new("test-secret", 3600);
        let student = register(&users, &tokens, request("kid@school.edu", true))
            .await
            .unwrap();
        assert!(!student.user.is_verified);

        assert!(matches!(
            verify_student(&users, "123456", "kid@school.edu", "000000").await,
            Err(AppError::InvalidCode)
        ));
        assert!(matches!(
            verify_student(&users, "123456", "ghost@school.edu", "123456").await,
            Err(AppError::InvalidCode)
        ));

        let verified = verify_student(&users, "123456", "kid@school.edu", "123456")
            .await
            .unwrap();
        assert!(verified.is_verified);
    }
}
