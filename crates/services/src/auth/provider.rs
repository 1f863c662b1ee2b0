use async_trait::async_trait;

use quiz_core::model::{User, UserId};

use crate::error::ProviderError;

/// Account as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
    pub id: UserId,
    pub email: String,
    pub first_name: Option<String>,
    pub image_url: Option<String>,
}

impl IdentityUser {
    /// Local profile; the display name falls back to the email's local part.
    #[must_use]
    pub fn to_user(&self) -> User {
        let user = User::new(self.id.clone(), &self.email, self.first_name.clone());
        match &self.image_url {
            Some(url) => user.with_image_url(url),
            None => user,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInAttempt {
    Complete(IdentityUser),
    /// The provider wants a second factor before the session is active.
    NeedsSecondFactor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpAttempt {
    Complete(IdentityUser),
    /// A code was sent to the address; finish with `verify_email_code`.
    NeedsEmailVerification { email: String },
}

/// Hosted identity service. Implementations own the session; callers only
/// orchestrate.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the provider cannot be reached.
    async fn current_user(&self) -> Result<Option<IdentityUser>, ProviderError>;

    /// # Errors
    ///
    /// Returns `ProviderError::InvalidCredentials` for a wrong email/password pair.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInAttempt, ProviderError>;

    /// # Errors
    ///
    /// Returns `ProviderError::AccountExists` if the email is taken.
    async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<SignUpAttempt, ProviderError>;

    /// Complete a pending sign-up.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidCode` or `NothingPending`.
    async fn verify_email_code(&self, code: &str) -> Result<IdentityUser, ProviderError>;

    /// Send a reset code to `email`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the request is rejected.
    async fn request_password_reset(&self, email: &str) -> Result<(), ProviderError>;

    /// Finish a pending reset; the account is signed in afterwards.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidCode` or `NothingPending`.
    async fn reset_password(
        &self,
        code: &str,
        new_password: &str,
    ) -> Result<IdentityUser, ProviderError>;

    /// # Errors
    ///
    /// Returns `ProviderError` if the provider rejects the sign-out.
    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Delete the signed-in account.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::NotSignedIn` when no session is active.
    async fn delete_user(&self) -> Result<(), ProviderError>;
}
