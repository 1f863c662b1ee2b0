use dioxus::prelude::*;
use dioxus_router::{Link, Navigator, use_navigator};
use quiz_core::forms::{FieldErrors, FormField, LoginForm, PasswordResetForm, SignUpForm};
use quiz_core::model::User;
use services::{AuthError, SignUpStep};

use crate::app::AppSignals;
use crate::context::AppContext;
use crate::routes::Route;

/// Inline field errors plus a form-level message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct FormFeedback {
    fields: FieldErrors,
    message: Option<String>,
}

impl FormFeedback {
    fn field(&self, field: FormField) -> Option<String> {
        self.fields.get(field).map(str::to_owned)
    }
}

impl From<AuthError> for FormFeedback {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(fields) => Self {
                fields,
                message: None,
            },
            other => Self {
                fields: FieldErrors::new(),
                message: Some(other.to_string()),
            },
        }
    }
}

/// Store the signed-in user and leave the auth screens.
fn finish_sign_in(mut signals: AppSignals, navigator: Navigator, user: User) {
    signals.user.set(Some(user));
    navigator.replace(Route::Home {});
}

#[component]
fn FieldInput(
    id: &'static str,
    label: &'static str,
    kind: &'static str,
    mut value: Signal<String>,
    error: Option<String>,
) -> Element {
    rsx! {
        div { class: if error.is_some() { "field field--invalid" } else { "field" },
            label { r#for: id, "{label}" }
            input {
                id: "{id}",
                r#type: kind,
                value: "{value}",
                oninput: move |evt| value.set(evt.value()),
            }
            if let Some(ref error) = error {
                p { class: "field-error", "{error}" }
            }
        }
    }
}

#[component]
fn FormMessage(feedback: FormFeedback) -> Element {
    rsx! {
        if let Some(message) = feedback.message {
            p { class: "form-error", role: "alert", "{message}" }
        }
    }
}

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let signals = use_context::<AppSignals>();
    let navigator = use_navigator();
    let auth = ctx.auth();

    let email = use_signal(String::new);
    let password = use_signal(String::new);
    let mut feedback = use_signal(FormFeedback::default);
    let mut submitting = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let auth = auth.clone();
        let form = LoginForm {
            email: email(),
            password: password(),
        };
        spawn(async move {
            submitting.set(true);
            match auth.sign_in(&form).await {
                Ok(user) => {
                    feedback.set(FormFeedback::default());
                    finish_sign_in(signals, navigator, user);
                }
                Err(err) => feedback.set(err.into()),
            }
            submitting.set(false);
        });
    };

    let current = feedback();
    rsx! {
        div { class: "auth-page",
            h2 { "Welcome Back" }
            p { class: "muted", "Sign in to continue" }
            form { class: "auth-form", onsubmit: on_submit,
                FieldInput {
                    id: "login-email",
                    label: "Email",
                    kind: "email",
                    value: email,
                    error: current.field(FormField::Email),
                }
                FieldInput {
                    id: "login-password",
                    label: "Password",
                    kind: "password",
                    value: password,
                    error: current.field(FormField::Password),
                }
                FormMessage { feedback: current.clone() }
                button {
                    class: "btn btn--primary",
                    r#type: "submit",
                    disabled: submitting(),
                    if submitting() { "Signing in..." } else { "Sign In" }
                }
            }
            div { class: "auth-links",
                Link { to: Route::ForgotPassword {}, "Forgot password?" }
                Link { to: Route::SignUp {}, "Don't have an account? Sign Up" }
            }
        }
    }
}

#[component]
pub fn SignUpView() -> Element {
    let ctx = use_context::<AppContext>();
    let signals = use_context::<AppSignals>();
    let navigator = use_navigator();
    let auth = ctx.auth();

    let name = use_signal(String::new);
    let email = use_signal(String::new);
    let password = use_signal(String::new);
    let confirm_password = use_signal(String::new);
    let code = use_signal(String::new);
    let mut pending_email = use_signal(|| None::<String>);
    let mut feedback = use_signal(FormFeedback::default);
    let mut submitting = use_signal(|| false);

    let on_submit = {
        let auth = auth.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            if submitting() {
                return;
            }
            let auth = auth.clone();
            let form = SignUpForm {
                name: name(),
                email: email(),
                password: password(),
                confirm_password: confirm_password(),
            };
            spawn(async move {
                submitting.set(true);
                match auth.sign_up(&form).await {
                    Ok(SignUpStep::SignedIn(user)) => {
                        feedback.set(FormFeedback::default());
                        finish_sign_in(signals, navigator, user);
                    }
                    Ok(SignUpStep::VerifyEmail { email }) => {
                        feedback.set(FormFeedback::default());
                        pending_email.set(Some(email));
                    }
                    Err(err) => feedback.set(err.into()),
                }
                submitting.set(false);
            });
        }
    };

    let on_verify = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let auth = auth.clone();
        let code = code();
        spawn(async move {
            submitting.set(true);
            match auth.verify_sign_up(&code).await {
                Ok(user) => {
                    feedback.set(FormFeedback::default());
                    finish_sign_in(signals, navigator, user);
                }
                Err(err) => feedback.set(err.into()),
            }
            submitting.set(false);
        });
    };

    let current = feedback();
    if let Some(address) = pending_email() {
        return rsx! {
            div { class: "auth-page",
                h2 { "Verify Your Email" }
                p { class: "muted", "We sent a verification code to {address}" }
                form { class: "auth-form", onsubmit: on_verify,
                    FieldInput {
                        id: "signup-code",
                        label: "Verification Code",
                        kind: "text",
                        value: code,
                        error: current.field(FormField::Code),
                    }
                    FormMessage { feedback: current.clone() }
                    button {
                        class: "btn btn--primary",
                        r#type: "submit",
                        disabled: submitting(),
                        "Verify"
                    }
                }
            }
        };
    }

    rsx! {
        div { class: "auth-page",
            h2 { "Create Account" }
            p { class: "muted", "Sign up to start taking quizzes" }
            form { class: "auth-form", onsubmit: on_submit,
                FieldInput {
                    id: "signup-name",
                    label: "Full Name",
                    kind: "text",
                    value: name,
                    error: current.field(FormField::Name),
                }
                FieldInput {
                    id: "signup-email",
                    label: "Email",
                    kind: "email",
                    value: email,
                    error: current.field(FormField::Email),
                }
                FieldInput {
                    id: "signup-password",
                    label: "Password",
                    kind: "password",
                    value: password,
                    error: current.field(FormField::Password),
                }
                FieldInput {
                    id: "signup-confirm",
                    label: "Confirm Password",
                    kind: "password",
                    value: confirm_password,
                    error: current.field(FormField::ConfirmPassword),
                }
                FormMessage { feedback: current.clone() }
                button {
                    class: "btn btn--primary",
                    r#type: "submit",
                    disabled: submitting(),
                    if submitting() { "Creating account..." } else { "Sign Up" }
                }
            }
            div { class: "auth-links",
                Link { to: Route::Login {}, "Already have an account? Sign In" }
            }
        }
    }
}

#[component]
pub fn ForgotPasswordView() -> Element {
    let ctx = use_context::<AppContext>();
    let signals = use_context::<AppSignals>();
    let navigator = use_navigator();
    let auth = ctx.auth();

    let email = use_signal(String::new);
    let code = use_signal(String::new);
    let password = use_signal(String::new);
    let confirm_password = use_signal(String::new);
    let mut code_sent = use_signal(|| false);
    let mut feedback = use_signal(FormFeedback::default);
    let mut submitting = use_signal(|| false);

    let on_request = {
        let auth = auth.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            if submitting() {
                return;
            }
            let auth = auth.clone();
            let address = email();
            spawn(async move {
                submitting.set(true);
                match auth.request_password_reset(&address).await {
                    Ok(()) => {
                        feedback.set(FormFeedback::default());
                        code_sent.set(true);
                    }
                    Err(err) => feedback.set(err.into()),
                }
                submitting.set(false);
            });
        }
    };

    let on_reset = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let auth = auth.clone();
        let code = code();
        let form = PasswordResetForm {
            password: password(),
            confirm_password: confirm_password(),
        };
        spawn(async move {
            submitting.set(true);
            match auth.reset_password(&code, &form).await {
                Ok(user) => {
                    feedback.set(FormFeedback::default());
                    finish_sign_in(signals, navigator, user);
                }
                Err(err) => feedback.set(err.into()),
            }
            submitting.set(false);
        });
    };

    let current = feedback();
    if code_sent() {
        let strength = PasswordResetForm {
            password: password(),
            confirm_password: String::new(),
        }
        .strength();
        return rsx! {
            div { class: "auth-page",
                h2 { "Reset Password" }
                p { class: "muted", "Enter the code sent to {email} and choose a new password." }
                form { class: "auth-form", onsubmit: on_reset,
                    FieldInput {
                        id: "reset-code",
                        label: "Reset Code",
                        kind: "text",
                        value: code,
                        error: current.field(FormField::Code),
                    }
                    FieldInput {
                        id: "reset-password",
                        label: "New Password",
                        kind: "password",
                        value: password,
                        error: current.field(FormField::Password),
                    }
                    div { class: "strength-meter",
                        div {
                            class: "strength-fill",
                            style: "width: {strength.meter_percent()}%",
                        }
                        span { class: "strength-label", "{strength.label()}" }
                    }
                    FieldInput {
                        id: "reset-confirm",
                        label: "Confirm Password",
                        kind: "password",
                        value: confirm_password,
                        error: current.field(FormField::ConfirmPassword),
                    }
                    FormMessage { feedback: current.clone() }
                    button {
                        class: "btn btn--primary",
                        r#type: "submit",
                        disabled: submitting(),
                        "Reset Password"
                    }
                }
            }
        };
    }

    rsx! {
        div { class: "auth-page",
            h2 { "Forgot Password" }
            p { class: "muted", "Enter your email and we'll send you a reset code." }
            form { class: "auth-form", onsubmit: on_request,
                FieldInput {
                    id: "forgot-email",
                    label: "Email",
                    kind: "email",
                    value: email,
                    error: current.field(FormField::Email),
                }
                FormMessage { feedback: current.clone() }
                button {
                    class: "btn btn--primary",
                    r#type: "submit",
                    disabled: submitting(),
                    "Send Reset Code"
                }
            }
            div { class: "auth-links",
                Link { to: Route::Login {}, "Back to Sign In" }
            }
        }
    }
}
