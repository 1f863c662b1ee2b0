//! Validation for the account forms (login, sign-up, password reset).
//!
//! Each form collects at most one message per field, in field order, so the
//! view can show them inline.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_RESET_PASSWORD_LEN: usize = 8;
pub const MIN_NAME_LEN: usize = 2;
pub const RESET_CODE_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Email,
    Password,
    ConfirmPassword,
    Code,
}

impl FormField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Password => "password",
            FormField::ConfirmPassword => "confirmPassword",
            FormField::Code => "code",
        }
    }
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(FormField, String)>,
}

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message; the first message for a field wins.
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.entries.push((field, message.into()));
        }
    }

    #[must_use]
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, msg)| msg.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.entries.iter().map(|(f, msg)| (*f, msg.as_str()))
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, msg) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {msg}", field.as_str())?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

//
// ─── FIELD RULES ──────────────────────────────────────────────────────────────
//

/// Returns the message for an invalid email, or `None` when it is acceptable.
#[must_use]
pub fn validate_email(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        return Some("Email is required");
    }
    let valid = EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email));
    if valid { None } else { Some("Invalid email format") }
}

fn validate_password(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some("Password is required")
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        Some("Password must be at least 6 characters")
    } else {
        None
    }
}

fn validate_reset_password(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some("Password is required")
    } else if password.chars().count() < MIN_RESET_PASSWORD_LEN {
        Some("Password must be at least 8 characters")
    } else if !(has_lowercase(password) && has_uppercase(password) && has_digit(password)) {
        Some("Password must contain uppercase, lowercase, and number")
    } else {
        None
    }
}

fn validate_confirmation(password: &str, confirm: &str) -> Option<&'static str> {
    if confirm.is_empty() {
        Some("Please confirm your password")
    } else if password != confirm {
        Some("Passwords do not match")
    } else {
        None
    }
}

/// Sign-up verification only requires a code to be present.
#[must_use]
pub fn validate_code(code: &str) -> Option<&'static str> {
    if code.trim().is_empty() {
        Some("Verification code is required")
    } else {
        None
    }
}

/// Password reset codes are exactly six characters.
#[must_use]
pub fn validate_reset_code(code: &str) -> Option<&'static str> {
    let code = code.trim();
    if code.is_empty() {
        Some("Verification code is required")
    } else if code.chars().count() != RESET_CODE_LEN {
        Some("Code must be 6 digits")
    } else {
        None
    }
}

fn has_lowercase(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_lowercase())
}

fn has_uppercase(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_uppercase())
}

fn has_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

//
// ─── FORMS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns the collected `FieldErrors` when any field is invalid.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(msg) = validate_email(self.email.trim()) {
            errors.insert(FormField::Email, msg);
        }
        if let Some(msg) = validate_password(&self.password) {
            errors.insert(FormField::Password, msg);
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    /// # Errors
    ///
    /// Returns the collected `FieldErrors` when any field is invalid.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = self.name.trim();
        if name.is_empty() {
            errors.insert(FormField::Name, "Name is required");
        } else if name.chars().count() < MIN_NAME_LEN {
            errors.insert(FormField::Name, "Name must be at least 2 characters");
        }
        if let Some(msg) = validate_email(self.email.trim()) {
            errors.insert(FormField::Email, msg);
        }
        if let Some(msg) = validate_password(&self.password) {
            errors.insert(FormField::Password, msg);
        }
        if let Some(msg) = validate_confirmation(&self.password, &self.confirm_password) {
            errors.insert(FormField::ConfirmPassword, msg);
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordResetForm {
    pub password: String,
    pub confirm_password: String,
}

impl PasswordResetForm {
    /// # Errors
    ///
    /// Returns the collected `FieldErrors` when any field is invalid.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(msg) = validate_reset_password(&self.password) {
            errors.insert(FormField::Password, msg);
        }
        if let Some(msg) = validate_confirmation(&self.password, &self.confirm_password) {
            errors.insert(FormField::ConfirmPassword, msg);
        }
        errors.into_result()
    }

    #[must_use]
    pub fn strength(&self) -> PasswordStrength {
        PasswordStrength::of(&self.password)
    }
}

//
// ─── PASSWORD STRENGTH ────────────────────────────────────────────────────────
//

/// Meter shown under the new-password field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Empty,
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    #[must_use]
    pub fn of(password: &str) -> Self {
        if password.is_empty() {
            return Self::Empty;
        }
        let len = password.chars().count();
        let points = [
            len >= 8,
            len >= 12,
            has_lowercase(password) && has_uppercase(password),
            has_digit(password),
            password.chars().any(|c| !c.is_ascii_alphanumeric()),
        ]
        .into_iter()
        .filter(|hit| *hit)
        .count();

        match points {
            0..=2 => Self::Weak,
            3 => Self::Medium,
            _ => Self::Strong,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PasswordStrength::Empty => "",
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Medium => "Medium",
            PasswordStrength::Strong => "Strong",
        }
    }

    /// Width of the meter bar in percent.
    #[must_use]
    pub fn meter_percent(self) -> u8 {
        match self {
            PasswordStrength::Empty => 0,
            PasswordStrength::Weak => 33,
            PasswordStrength::Medium => 66,
            PasswordStrength::Strong => 100,
        }
    }
}
