use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::api::{ApiError, CreateUserPayload, UsersApi};
use super::i18n::LocaleContext;
use crate::users::dto::UserPublic;

pub const USERNAME_MIN_CHARS: usize = 3;
pub const PASSWORD_MIN_CHARS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Username,
    Email,
    Password,
    ConfirmPassword,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterFormData {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterFormData {
    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Username => &mut self.username,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
            Field::ConfirmPassword => &mut self.confirm_password,
        }
    }
}

pub type FieldErrors = BTreeMap<Field, String>;

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        // Dot-separated local part, dot-separated host labels, alphabetic TLD of 2+ letters.
        static ref EMAIL_RE: Regex = Regex::new(
            r"^(?:[A-Za-z0-9_'+-]+\.)*[A-Za-z0-9_'+-]*[A-Za-z0-9_+-]@(?:[A-Za-z0-9][A-Za-z0-9-]*\.)+[A-Za-z]{2,}$"
        )
        .unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Client-side rules; keeps the first message per field.
pub fn validate(data: &RegisterFormData, i18n: &LocaleContext) -> FieldErrors {
    let checks = [
        (
            Field::Username,
            data.username.chars().count() >= USERNAME_MIN_CHARS,
            "signup.errors.usernameMin",
        ),
        (
            Field::Email,
            is_valid_email(&data.email),
            "signup.errors.emailInvalid",
        ),
        (
            Field::Password,
            data.password.chars().count() >= PASSWORD_MIN_CHARS,
            "signup.errors.passwordMin",
        ),
        (
            Field::ConfirmPassword,
            data.password == data.confirm_password,
            "signup.errors.passwordsMismatch",
        ),
    ];

    let mut errors = FieldErrors::new();
    for (field, ok, key) in checks {
        if !ok {
            errors.entry(field).or_insert_with(|| i18n.t(key));
        }
    }
    errors
}

/// State of the sign-up form between renders.
#[derive(Debug, Default)]
pub struct RegisterForm {
    data: RegisterFormData,
    errors: FieldErrors,
    is_submitting: bool,
    server_error: Option<String>,
    success_message: Option<String>,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &RegisterFormData {
        &self.data
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn server_error(&self) -> Option<&str> {
        self.server_error.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn change(&mut self, field: Field, value: impl Into<String>) {
        *self.data.slot(field) = value.into();
        self.errors.remove(&field);
        self.server_error = None;
        self.success_message = None;
    }

    /// Validates, then posts the form. Returns the created user on success.
    pub async fn submit(&mut self, api: &dyn UsersApi, i18n: &LocaleContext) -> Option<UserPublic> {
        self.errors.clear();
        self.server_error = None;
        self.success_message = None;

        let errors = validate(&self.data, i18n);
        if !errors.is_empty() {
            self.errors = errors;
            return None;
        }

        self.is_submitting = true;
        let payload = CreateUserPayload {
            username: self.data.username.clone(),
            email: self.data.email.clone(),
            password: self.data.password.clone(),
        };
        let result = api.create_user(&payload).await;
        self.is_submitting = false;

        match result {
            Ok(user) => {
                info!(user_id = user.id, "account created");
                self.success_message = Some(i18n.t("signup.title"));
                self.data = RegisterFormData::default();
                Some(user)
            }
            Err(ApiError::Network(e)) => {
                warn!(error = %e, "sign-up request did not reach the server");
                self.server_error = Some(i18n.t("signup.errors.networkError"));
                None
            }
            Err(ApiError::Status { error, message, .. }) => {
                let shown = [message, error]
                    .into_iter()
                    .flatten()
                    .find(|m| !m.is_empty())
                    .unwrap_or_else(|| i18n.t("signup.errors.serverCreateFailed"));
                self.server_error = Some(shown);
                None
            }
            Err(e @ ApiError::Decode(_)) => {
                warn!(error = %e, "sign-up response was not a user");
                self.server_error = Some(i18n.t("signup.errors.serverCreateFailed"));
                None
            }
        }
    }
}
