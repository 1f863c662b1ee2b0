use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use quiz_core::model::UserId;

use super::provider::{IdentityProvider, IdentityUser, SignInAttempt, SignUpAttempt};
use crate::error::ProviderError;

/// Code accepted for email verification and password resets unless overridden.
pub const DEFAULT_VERIFICATION_CODE: &str = "424242";

#[derive(Debug, Clone)]
struct Account {
    id: UserId,
    name: String,
    password: String,
    verified: bool,
    second_factor: bool,
}

#[derive(Debug, Default)]
struct Accounts {
    by_email: HashMap<String, Account>,
    pending_sign_up: Option<String>,
    pending_reset: Option<String>,
    current: Option<String>,
    next_id: u64,
}

impl Accounts {
    fn identity(&self, email: &str) -> Option<IdentityUser> {
        self.by_email.get(email).map(|account| IdentityUser {
            id: account.id.clone(),
            email: email.to_owned(),
            first_name: Some(account.name.clone()).filter(|n| !n.is_empty()),
            image_url: None,
        })
    }

    fn next_user_id(&mut self) -> Result<UserId, ProviderError> {
        self.next_id += 1;
        UserId::new(format!("user_{}", self.next_id))
            .map_err(|e| ProviderError::Unavailable(e.to_string()))
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// In-process identity provider for offline runs and tests.
///
/// Every verification or reset code must equal the configured code.
#[derive(Debug)]
pub struct LocalIdentityProvider {
    code: String,
    accounts: Mutex<Accounts>,
}

impl Default for LocalIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalIdentityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            code: DEFAULT_VERIFICATION_CODE.to_owned(),
            accounts: Mutex::new(Accounts::default()),
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Register a verified account up front.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::AccountExists` if the email is already registered.
    pub fn with_account(
        self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, ProviderError> {
        self.insert_account(name, email, password, true, false)?;
        Ok(self)
    }

    /// Register a verified account whose sign-in always asks for a second factor.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::AccountExists` if the email is already registered.
    pub fn with_second_factor_account(
        self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, ProviderError> {
        self.insert_account(name, email, password, true, true)?;
        Ok(self)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Accounts>, ProviderError> {
        self.accounts
            .lock()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))
    }

    fn insert_account(
        &self,
        name: &str,
        email: &str,
        password: &str,
        verified: bool,
        second_factor: bool,
    ) -> Result<UserId, ProviderError> {
        let email = normalize(email);
        let mut accounts = self.lock()?;
        if accounts.by_email.contains_key(&email) {
            return Err(ProviderError::AccountExists);
        }
        let id = accounts.next_user_id()?;
        accounts.by_email.insert(
            email,
            Account {
                id: id.clone(),
                name: name.trim().to_owned(),
                password: password.to_owned(),
                verified,
                second_factor,
            },
        );
        Ok(id)
    }

    fn check_code(&self, code: &str) -> Result<(), ProviderError> {
        if code.trim() == self.code {
            Ok(())
        } else {
            Err(ProviderError::InvalidCode)
        }
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn current_user(&self) -> Result<Option<IdentityUser>, ProviderError> {
        let accounts = self.lock()?;
        Ok(accounts
            .current
            .as_deref()
            .and_then(|email| accounts.identity(email)))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInAttempt, ProviderError> {
        let email = normalize(email);
        let mut accounts = self.lock()?;
        let account = accounts
            .by_email
            .get(&email)
            .filter(|a| a.verified && a.password == password)
            .ok_or(ProviderError::InvalidCredentials)?;
        if account.second_factor {
            return Ok(SignInAttempt::NeedsSecondFactor);
        }
        let user = accounts
            .identity(&email)
            .ok_or(ProviderError::InvalidCredentials)?;
        accounts.current = Some(email);
        debug!(user = %user.id, "local sign-in");
        Ok(SignInAttempt::Complete(user))
    }

    async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<SignUpAttempt, ProviderError> {
        self.insert_account(name, email, password, false, false)?;
        let email = normalize(email);
        self.lock()?.pending_sign_up = Some(email.clone());
        Ok(SignUpAttempt::NeedsEmailVerification { email })
    }

    async fn verify_email_code(&self, code: &str) -> Result<IdentityUser, ProviderError> {
        let mut accounts = self.lock()?;
        let email = accounts
            .pending_sign_up
            .clone()
            .ok_or(ProviderError::NothingPending)?;
        self.check_code(code)?;
        if let Some(account) = accounts.by_email.get_mut(&email) {
            account.verified = true;
        }
        let user = accounts
            .identity(&email)
            .ok_or(ProviderError::NothingPending)?;
        accounts.pending_sign_up = None;
        accounts.current = Some(email);
        Ok(user)
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), ProviderError> {
        let email = normalize(email);
        let mut accounts = self.lock()?;
        if !accounts.by_email.contains_key(&email) {
            return Err(ProviderError::InvalidCredentials);
        }
        accounts.pending_reset = Some(email);
        Ok(())
    }

    async fn reset_password(
        &self,
        code: &str,
        new_password: &str,
    ) -> Result<IdentityUser, ProviderError> {
        let mut accounts = self.lock()?;
        let email = accounts
            .pending_reset
            .clone()
            .ok_or(ProviderError::NothingPending)?;
        self.check_code(code)?;
        if let Some(account) = accounts.by_email.get_mut(&email) {
            new_password.clone_into(&mut account.password);
        }
        let user = accounts
            .identity(&email)
            .ok_or(ProviderError::NothingPending)?;
        accounts.pending_reset = None;
        accounts.current = Some(email);
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.lock()?.current = None;
        Ok(())
    }

    async fn delete_user(&self) -> Result<(), ProviderError> {
        let mut accounts = self.lock()?;
        let email = accounts.current.take().ok_or(ProviderError::NotSignedIn)?;
        accounts.by_email.remove(&email);
        Ok(())
    }
}
