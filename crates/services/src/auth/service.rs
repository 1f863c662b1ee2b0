use std::sync::Arc;

use tracing::{info, warn};

use quiz_core::forms::{
    FieldErrors, FormField, LoginForm, PasswordResetForm, SignUpForm, validate_code,
    validate_email, validate_reset_code,
};
use quiz_core::model::User;
use quiz_core::redirect::CallbackParams;

use super::provider::{IdentityProvider, IdentityUser, SignInAttempt, SignUpAttempt};
use super::user_data::UserDataStore;
use crate::error::AuthError;
use crate::preferences_service::PreferencesService;

/// Outcome of a sign-up submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpStep {
    SignedIn(User),
    VerifyEmail { email: String },
}

/// Account flows on top of an `IdentityProvider`.
///
/// Forms are validated before the provider is called. A completed sign-in
/// caches the profile locally and refreshes the remote profile document.
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
    user_data: Arc<dyn UserDataStore>,
    prefs: PreferencesService,
}

impl AuthService {
    #[must_use]
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        user_data: Arc<dyn UserDataStore>,
        prefs: PreferencesService,
    ) -> Self {
        Self {
            provider,
            user_data,
            prefs,
        }
    }

    /// # Errors
    ///
    /// Returns `AuthError::Validation` for bad input, `VerificationRequired` when
    /// the provider asks for a second factor, or `Provider` on rejection.
    pub async fn sign_in(&self, form: &LoginForm) -> Result<User, AuthError> {
        form.validate()?;
        match self
            .provider
            .sign_in_with_password(form.email.trim(), &form.password)
            .await?
        {
            SignInAttempt::Complete(identity) => Ok(self.establish(&identity).await),
            SignInAttempt::NeedsSecondFactor => Err(AuthError::VerificationRequired),
        }
    }

    /// # Errors
    ///
    /// Returns `AuthError::Validation` for bad input or `Provider` on rejection.
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<SignUpStep, AuthError> {
        form.validate()?;
        let attempt = self
            .provider
            .sign_up(form.name.trim(), form.email.trim(), &form.password)
            .await?;
        Ok(match attempt {
            SignUpAttempt::Complete(identity) => SignUpStep::SignedIn(self.establish(&identity).await),
            SignUpAttempt::NeedsEmailVerification { email } => SignUpStep::VerifyEmail { email },
        })
    }

    /// Finish sign-up with the emailed code.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for a blank code or `Provider` on rejection.
    pub async fn verify_sign_up(&self, code: &str) -> Result<User, AuthError> {
        if let Some(msg) = validate_code(code) {
            return Err(single(FormField::Code, msg).into());
        }
        let identity = self.provider.verify_email_code(code.trim()).await?;
        Ok(self.establish(&identity).await)
    }

    /// # Errors
    ///
    /// Returns `AuthError::Validation` for a bad email or `Provider` on rejection.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = email.trim();
        if let Some(msg) = validate_email(email) {
            return Err(single(FormField::Email, msg).into());
        }
        self.provider.request_password_reset(email).await?;
        Ok(())
    }

    /// Set a new password with the reset code; signs the user in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` with every invalid field, or `Provider` on rejection.
    pub async fn reset_password(
        &self,
        code: &str,
        form: &PasswordResetForm,
    ) -> Result<User, AuthError> {
        let mut errors = FieldErrors::new();
        if let Some(msg) = validate_reset_code(code) {
            errors.insert(FormField::Code, msg);
        }
        if let Err(form_errors) = form.validate() {
            for (field, msg) in form_errors.iter() {
                errors.insert(field, msg);
            }
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }
        let identity = self
            .provider
            .reset_password(code.trim(), &form.password)
            .await?;
        Ok(self.establish(&identity).await)
    }

    /// Provider sign-out first; the local logout always happens.
    pub async fn sign_out(&self) {
        if let Err(err) = self.provider.sign_out().await {
            warn!(error = %err, "provider sign-out failed");
        }
        self.prefs.logout().await;
    }

    /// Delete remote user data, then the provider account, then sign out locally.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotSignedIn` without a session, or `Storage` if the
    /// remote data cannot be deleted. Provider failures are logged only.
    pub async fn delete_account(&self) -> Result<(), AuthError> {
        let user_id = self
            .provider
            .current_user()
            .await?
            .map(|identity| identity.id)
            .ok_or(AuthError::NotSignedIn)?;
        self.user_data.delete_user_data(&user_id).await?;
        if let Err(err) = self.provider.delete_user().await {
            warn!(error = %err, user = %user_id, "provider account deletion failed");
        }
        self.prefs.logout().await;
        info!(user = %user_id, "account deleted");
        Ok(())
    }

    /// Whether a session is active; the identity provider decides.
    pub async fn is_signed_in(&self) -> bool {
        match self.provider.current_user().await {
            Ok(user) => user.is_some(),
            Err(err) => {
                warn!(error = %err, "identity provider unavailable");
                false
            }
        }
    }

    /// Cached profile; display only, see `session_user` for access checks.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.prefs.user()
    }

    /// The signed-in user, reconciled against the provider session.
    ///
    /// A cached profile without a live session is dropped from local state.
    /// Theme and quiz progress are kept.
    pub async fn session_user(&self) -> Option<User> {
        let identity = match self.provider.current_user().await {
            Ok(identity) => identity,
            Err(err) => {
                warn!(error = %err, "identity provider unavailable");
                None
            }
        };
        let cached = self.prefs.user();
        match identity {
            Some(identity) => match cached {
                Some(user) if user.id == identity.id => Some(user),
                _ => {
                    let user = identity.to_user();
                    self.prefs.set_user(Some(user.clone())).await;
                    Some(user)
                }
            },
            None => {
                if let Some(stale) = cached {
                    info!(user = %stale.id, "no provider session, dropping cached user");
                    self.prefs.set_user(None).await;
                }
                None
            }
        }
    }

    /// Route to open after an OAuth callback.
    pub async fn oauth_destination(&self, params: &CallbackParams) -> String {
        params.destination(self.is_signed_in().await)
    }

    async fn establish(&self, identity: &IdentityUser) -> User {
        let user = identity.to_user();
        self.prefs.set_user(Some(user.clone())).await;
        if let Err(err) = self.user_data.upsert_user(&user).await {
            warn!(error = %err, user = %user.id, "failed to store user profile");
        }
        info!(user = %user.id, "signed in");
        user
    }
}

fn single(field: FormField, msg: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field, msg);
    errors
}
