use crate::auth::password::{generate_salt, hash_password, verify_password};
use crate::auth::SessionStore;
use crate::models::{AuthSession, LoginRequest, NewProfile, RegisterRequest, Role};
use crate::services::validation::validate_registration;
use crate::store::DataStore;
use crate::utils::error::AppError;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Creates an organizer profile and signs it in.
pub async fn register(
    store: &dyn DataStore,
    sessions: &SessionStore,
    request: RegisterRequest,
) -> Result<AuthSession, AppError> {
    validate_registration(&request)?;

    let salt = generate_salt();
    let profile = store
        .insert_profile(NewProfile {
            email: normalize_email(&request.email),
            full_name: request.full_name.trim().to_string(),
            role: Role::Organizer,
            password_hash: hash_password(&request.password, &salt),
            password_salt: salt,
        })
        .await?;

    tracing::info!(profile_id = %profile.id, "Profile registered");
    let token = sessions.create_session(profile.id).await;
    Ok(AuthSession { token, profile })
}

pub async fn login(
    store: &dyn DataStore,
    sessions: &SessionStore,
    request: LoginRequest,
) -> Result<AuthSession, AppError> {
    let invalid = || AppError::unauthorized("Invalid email or password");

    let credentials = store
        .find_credentials(&normalize_email(&request.email))
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(
        &request.password,
        &credentials.password_salt,
        &credentials.password_hash,
    ) {
        return Err(invalid());
    }

    let profile = store
        .get_profile(credentials.profile_id)
        .await?
        .ok_or_else(invalid)?;

    let token = sessions.create_session(profile.id).await;
    tracing::info!(profile_id = %profile.id, "Profile signed in");
    Ok(AuthSession { token, profile })
}

pub async fn logout(sessions: &SessionStore, token: &str) {
    if !sessions.delete_session(token).await {
        tracing::debug!("Logout with an unknown session token");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn registration(email: &str) -> RegisterRequest {
        RegisterRequest {
            full_name: "Kofi Mensah".to_string(),
            email: email.to_string(),
            password: "kente2024".to_string(),
            confirm_password: "kente2024".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let store = MemoryStore::new();
        let sessions = SessionStore::default();

        let registered = register(&store, &sessions, registration("Kofi@Example.com"))
            .await
            .unwrap();
        assert_eq!(registered.profile.role, Role::Organizer);
        assert_eq!(registered.profile.email, "kofi@example.com");

        let session = login(
            &store,
            &sessions,
            LoginRequest {
                email: "kofi@example.com ".to_string(),
                password: "kente2024".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(session.profile.id, registered.profile.id);
        assert!(sessions.get_session(&session.token).await.is_some());
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let store = MemoryStore::new();
        let sessions = SessionStore::default();
        register(&store, &sessions, registration("kofi@example.com"))
            .await
            .unwrap();

        let err = login(
            &store,
            &sessions,
            LoginRequest {
                email: "kofi@example.com".to_string(),
                password: "wrong-password".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::AuthError(_)));
    }

    #[tokio::test]
    async fn test_register_twice_conflicts() {
        let store = MemoryStore::new();
        let sessions = SessionStore::default();
        register(&store, &sessions, registration("kofi@example.com"))
            .await
            .unwrap();

        let err = register(&store, &sessions, registration("KOFI@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
