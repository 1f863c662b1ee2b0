//! Account flows: the identity provider port, its local adapter and the
//! orchestration service used by the auth screens.

mod local;
mod provider;
mod service;
mod user_data;

pub use crate::error::{AuthError, ProviderError};
pub use local::{DEFAULT_VERIFICATION_CODE, LocalIdentityProvider};
pub use provider::{IdentityProvider, IdentityUser, SignInAttempt, SignUpAttempt};
pub use service::{AuthService, SignUpStep};
pub use user_data::{StorageUserDataStore, UserDataStore};
