use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::domain::user::NewUser;
use crate::forms::auth::LoginForm;
use crate::repository::{UserReader, UserWriter};

use super::{ServiceError, ServiceResult};

/// Username of the account provisioned at first startup.
pub const ADMIN_USERNAME: &str = "admin";

/// Hash a plaintext password into a salted PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Constant-time verification against a stored PHC string.
pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Check submitted credentials and produce the session principal.
///
/// Every failure mode collapses into `Unauthorized` so the login page can
/// show a single generic message without leaking which usernames exist.
pub fn login<R>(form: &LoginForm, repo: &R) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader,
{
    if form.validate().is_err() {
        return Err(ServiceError::Unauthorized);
    }

    let user = match repo.get_user_by_username(&form.username) {
        Ok(Some(user)) => user,
        Ok(None) => return Err(ServiceError::Unauthorized),
        Err(e) => {
            log::error!("Failed to look up user: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if !verify_password(&user.password_hash, &form.password) {
        return Err(ServiceError::Unauthorized);
    }

    Ok(AuthenticatedUser::from(&user))
}

/// Outcome of the first-run admin provisioning step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    AlreadyProvisioned,
    Created,
}

/// Ensure the admin account exists. There is no fixed default password: on
/// first run the initial password must be supplied explicitly, otherwise
/// startup is refused.
pub fn bootstrap_admin<R>(repo: &R, initial_password: Option<&str>) -> ServiceResult<BootstrapOutcome>
where
    R: UserReader + UserWriter,
{
    match repo.get_user_by_username(ADMIN_USERNAME) {
        Ok(Some(_)) => return Ok(BootstrapOutcome::AlreadyProvisioned),
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to look up admin account: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let password = initial_password.filter(|p| !p.is_empty()).ok_or_else(|| {
        ServiceError::Form(
            "no admin account exists yet; set INKPOST_ADMIN_PASSWORD for the first run"
                .to_string(),
        )
    })?;

    let password_hash = hash_password(password).map_err(|e| {
        log::error!("Failed to hash admin password: {e}");
        ServiceError::Internal
    })?;

    let admin = NewUser {
        username: ADMIN_USERNAME.to_string(),
        password_hash,
        is_admin: true,
    };

    match repo.create_user(&admin) {
        Ok(_) => {
            log::info!("Provisioned admin account; unset INKPOST_ADMIN_PASSWORD now");
            Ok(BootstrapOutcome::Created)
        }
        Err(e) => {
            log::error!("Failed to create admin account: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::UserReader;
    use crate::repository::test::TestRepository;

    fn login_form(username: &str, password: &str) -> LoginForm {
        LoginForm {
            username: username.into(),
            password: password.into(),
        }
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password(&hash, "hunter2"));
        assert!(!verify_password(&hash, "hunter3"));
    }

    #[test]
    fn login_is_generic_about_failures() {
        let repo = TestRepository::new();
        let missing_user = login(&login_form("ghost", "pw"), &repo).unwrap_err();

        bootstrap_admin(&repo, Some("correct horse")).unwrap();
        let wrong_password = login(&login_form(ADMIN_USERNAME, "wrong"), &repo).unwrap_err();

        assert_eq!(missing_user, ServiceError::Unauthorized);
        assert_eq!(wrong_password, ServiceError::Unauthorized);
    }

    #[test]
    fn login_returns_principal_for_valid_credentials() {
        let repo = TestRepository::new();
        bootstrap_admin(&repo, Some("correct horse")).unwrap();

        let principal = login(&login_form(ADMIN_USERNAME, "correct horse"), &repo).unwrap();
        assert_eq!(principal.username, ADMIN_USERNAME);
        assert!(principal.is_admin);
    }

    #[test]
    fn bootstrap_requires_a_password_on_first_run() {
        let repo = TestRepository::new();
        assert!(matches!(
            bootstrap_admin(&repo, None),
            Err(ServiceError::Form(_))
        ));

        assert_eq!(
            bootstrap_admin(&repo, Some("initial")).unwrap(),
            BootstrapOutcome::Created
        );
        // Second run no longer needs the variable.
        assert_eq!(
            bootstrap_admin(&repo, None).unwrap(),
            BootstrapOutcome::AlreadyProvisioned
        );
        assert!(
            repo.get_user_by_username(ADMIN_USERNAME)
                .unwrap()
                .unwrap()
                .is_admin
        );
    }
}
