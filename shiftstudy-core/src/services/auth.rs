//! Auth service - registration, login and the signed-in user
//!
//! Local-only authentication: the stored digest is compared with the
//! digest of the supplied password. There is no token or session protocol;
//! the signed-in user lives in memory for the lifetime of the service.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::validation::{validate_login, validate_signup};
use crate::domain::User;
use crate::ports::UserStore;
use crate::services::password::{hash_password, verify_password};

pub const REGISTRATION_SUCCESSFUL: &str = "Registration successful";
pub const LOGIN_SUCCESSFUL: &str = "Login successful";

/// Status of the last auth operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum AuthState {
    Idle,
    Loading,
    Success(String),
    Error(String),
}

/// Signup form as entered
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub retype_password: String,
}

/// User repository with the registration and login rules on top
pub struct AuthService {
    users: Arc<dyn UserStore>,
    current_user: Mutex<Option<User>>,
    state: Mutex<AuthState>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            current_user: Mutex::new(None),
            state: Mutex::new(AuthState::Idle),
        }
    }

    /// Register a new user
    ///
    /// Fails with [`Error::DuplicateEmail`] when the email is taken, whether
    /// the lookup or the store's unique constraint catches it.
    pub fn register(&self, email: &str, password: &str, name: &str) -> Result<User> {
        self.set_state(AuthState::Loading);
        let result = self.try_register(email, password, name);
        self.finish(result, REGISTRATION_SUCCESSFUL)
    }

    fn try_register(&self, email: &str, password: &str, name: &str) -> Result<User> {
        if self.users.get_user_by_email(email)?.is_some() {
            return Err(Error::DuplicateEmail);
        }

        let user = User::new(email, hash_password(password), name);
        let user_id = self.users.insert_user(&user)?;
        Ok(user.with_id(user_id))
    }

    /// Log in with email and password
    ///
    /// Unknown email and wrong password fail identically.
    pub fn login(&self, email: &str, password: &str) -> Result<User> {
        self.set_state(AuthState::Loading);
        let result = self.try_login(email, password);
        self.finish(result, LOGIN_SUCCESSFUL)
    }

    fn try_login(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .users
            .get_user_by_email(email)?
            .ok_or(Error::InvalidCredentials)?;

        if !verify_password(password, &user.password) {
            return Err(Error::InvalidCredentials);
        }
        Ok(user)
    }

    /// Validate the signup form, then register with the trimmed email
    pub fn submit_signup(&self, form: &SignupForm) -> Result<User> {
        if let Err(e) = validate_signup(
            &form.name,
            &form.email,
            &form.password,
            &form.retype_password,
        ) {
            self.set_state(AuthState::Error(e.to_string()));
            return Err(e);
        }
        self.register(form.email.trim(), &form.password, form.name.trim())
    }

    /// Validate the login form, then log in with the trimmed email
    pub fn submit_login(&self, email: &str, password: &str) -> Result<User> {
        if let Err(e) = validate_login(email, password) {
            self.set_state(AuthState::Error(e.to_string()));
            return Err(e);
        }
        self.login(email.trim(), password)
    }

    fn finish(&self, result: Result<User>, success_message: &str) -> Result<User> {
        match &result {
            Ok(user) => {
                self.set_current_user(Some(user.clone()));
                self.set_state(AuthState::Success(success_message.to_string()));
            }
            Err(e) => self.set_state(AuthState::Error(e.to_string())),
        }
        result
    }

    pub fn current_user(&self) -> Option<User> {
        self.current_user.lock().ok().and_then(|u| u.clone())
    }

    pub fn state(&self) -> AuthState {
        self.state
            .lock()
            .map(|s| s.clone())
            .unwrap_or(AuthState::Idle)
    }

    /// Forget the signed-in user
    pub fn logout(&self) {
        self.set_current_user(None);
        self.set_state(AuthState::Idle);
    }

    pub fn reset_state(&self) {
        self.set_state(AuthState::Idle);
    }

    fn set_current_user(&self, user: Option<User>) {
        if let Ok(mut current) = self.current_user.lock() {
            *current = user;
        }
    }

    fn set_state(&self, state: AuthState) {
        if let Ok(mut current) = self.state.lock() {
            *current = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::duckdb::DuckDbRepository;
    use crate::domain::result::INVALID_CREDENTIALS;

    fn service() -> (AuthService, Arc<DuckDbRepository>) {
        let repo = Arc::new(DuckDbRepository::open_in_memory().unwrap());
        repo.ensure_schema().unwrap();
        (AuthService::new(repo.clone()), repo)
    }

    fn form(email: &str) -> SignupForm {
        SignupForm {
            name: "Ada".to_string(),
            email: email.to_string(),
            password: "password1".to_string(),
            retype_password: "password1".to_string(),
        }
    }

    #[test]
    fn test_register_assigns_id_and_hashes() {
        let (auth, repo) = service();
        let user = auth.register("ada@uni.edu", "password1", "Ada").unwrap();

        assert!(user.id > 0);
        assert_eq!(user.password, hash_password("password1"));

        let stored = repo.get_user_by_id(user.id).unwrap().unwrap();
        assert_eq!(stored.email, "ada@uni.edu");
        assert_ne!(stored.password, "password1");
        assert_eq!(
            auth.state(),
            AuthState::Success(REGISTRATION_SUCCESSFUL.to_string())
        );
        assert_eq!(auth.current_user().map(|u| u.id), Some(user.id));
    }

    #[test]
    fn test_register_duplicate_email() {
        let (auth, repo) = service();
        auth.register("ada@uni.edu", "password1", "Ada").unwrap();

        let err = auth.register("ada@uni.edu", "different1", "Other").unwrap_err();
        assert!(matches!(err, Error::DuplicateEmail));
        assert_eq!(repo.count_users_with_email("ada@uni.edu").unwrap(), 1);
        assert_eq!(
            auth.state(),
            AuthState::Error("Email already exists".to_string())
        );
    }

    #[test]
    fn test_email_is_case_sensitive() {
        let (auth, _repo) = service();
        auth.register("ada@uni.edu", "password1", "Ada").unwrap();
        assert!(auth.register("Ada@uni.edu", "password1", "Ada").is_ok());
    }

    #[test]
    fn test_login_success() {
        let (auth, _repo) = service();
        let registered = auth.register("ada@uni.edu", "password1", "Ada").unwrap();
        auth.logout();

        let user = auth.login("ada@uni.edu", "password1").unwrap();
        assert_eq!(user.id, registered.id);
        assert_eq!(user.name, "Ada");
        assert_eq!(auth.state(), AuthState::Success(LOGIN_SUCCESSFUL.to_string()));
    }

    #[test]
    fn test_login_failures_are_indistinguishable() {
        let (auth, _repo) = service();
        auth.register("ada@uni.edu", "password1", "Ada").unwrap();
        auth.logout();

        let wrong_password = auth.login("ada@uni.edu", "password2").unwrap_err();
        let unknown_email = auth.login("bob@uni.edu", "password1").unwrap_err();

        assert_eq!(wrong_password.to_string(), INVALID_CREDENTIALS);
        assert_eq!(unknown_email.to_string(), INVALID_CREDENTIALS);
        assert!(auth.current_user().is_none());
    }

    #[test]
    fn test_submit_signup_validates_before_store() {
        let (auth, repo) = service();
        let mut bad = form("ada@uni.edu");
        bad.retype_password = "password2".to_string();

        let err = auth.submit_signup(&bad).unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
        assert_eq!(repo.count_users_with_email("ada@uni.edu").unwrap(), 0);
        assert_eq!(
            auth.state(),
            AuthState::Error("Passwords do not match".to_string())
        );
    }

    #[test]
    fn test_submit_signup_trims_email() {
        let (auth, _repo) = service();
        let user = auth.submit_signup(&form("  ada@uni.edu ")).unwrap();
        assert_eq!(user.email, "ada@uni.edu");
        assert!(auth.submit_login(" ada@uni.edu", "password1").is_ok());
    }

    #[test]
    fn test_submit_login_blank_fields() {
        let (auth, _repo) = service();
        let err = auth.submit_login("", "password1").unwrap_err();
        assert_eq!(err.to_string(), "Please enter your email");
        let err = auth.submit_login("ada@uni.edu", " ").unwrap_err();
        assert_eq!(err.to_string(), "Please enter your password");
    }

    #[test]
    fn test_logout_and_reset() {
        let (auth, _repo) = service();
        auth.register("ada@uni.edu", "password1", "Ada").unwrap();

        auth.reset_state();
        assert_eq!(auth.state(), AuthState::Idle);
        assert!(auth.current_user().is_some());

        auth.logout();
        assert!(auth.current_user().is_none());
    }
}
