//! Authentication routes: login, registration, logout.
//!
//! The site itself holds no credentials. Login posts to the backend, which
//! issues a bearer token; the token and account summary are stowed in the
//! server-side session and replayed on authorized backend calls. Logout
//! drops the account from the session but leaves the rest of it (generated
//! rental agreements) intact.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use estatehub_core::{Phone, UserRole};

use crate::backend::types::{LoginRequest, RegisterRequest};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::session::CurrentUser;
use crate::routes::{MessageQuery, redirect_error, redirect_success, user_message};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<String>,
    /// Roles an account can sign up as. Admin accounts are provisioned
    /// backend-side, never self-registered.
    pub roles: [UserRole; 3],
}

// =============================================================================
// Form Types
// =============================================================================

/// Login form submission.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form submission.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
    pub confirm_password: String,
    pub role: String,
}

impl RegisterForm {
    /// Local checks before the backend sees the submission.
    fn validate(&self) -> std::result::Result<(Phone, UserRole), String> {
        if self.first_name.trim().is_empty()
            || self.username.trim().is_empty()
            || self.email.trim().is_empty()
        {
            return Err("Please fill in all required fields.".to_string());
        }

        let phone = Phone::parse(&self.mobile)
            .map_err(|_| "Please enter a valid 10-digit mobile number.".to_string())?;

        if self.password.len() < MIN_PASSWORD_LEN {
            return Err("Password must be at least 6 characters.".to_string());
        }
        if self.password != self.confirm_password {
            return Err("Passwords do not match.".to_string());
        }

        let role: UserRole = self
            .role
            .parse()
            .map_err(|_| "Please choose a valid account type.".to_string())?;
        if role == UserRole::Admin {
            return Err("Please choose a valid account type.".to_string());
        }

        Ok((phone, role))
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    // Already signed in users land on their dashboard instead
    if user.is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    LoginTemplate {
        user,
        error: query.error,
        success: query.success,
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    if form.username.trim().is_empty() || form.password.is_empty() {
        return redirect_error("/auth/login", "Please enter your username and password.");
    }

    let request = LoginRequest {
        username: form.username.trim().to_string(),
        password: form.password,
    };

    let auth = match state.backend().login(&request).await {
        Ok(auth) => auth,
        Err(e) => {
            tracing::warn!("Login failed for {}: {e}", request.username);
            return redirect_error("/auth/login", &login_message(&e));
        }
    };

    let current = CurrentUser {
        id: auth.user.id,
        username: auth
            .user
            .username
            .clone()
            .unwrap_or_else(|| request.username.clone()),
        display_name: auth.user.display_name(),
        role: auth.user.role,
        token: auth.token,
    };

    if let Err(e) = set_current_user(&session, &current).await {
        tracing::error!("Failed to store session after login: {e}");
        return redirect_error(
            "/auth/login",
            "Could not start your session. Please try again.",
        );
    }

    tracing::info!("User {} logged in as {}", current.username, current.role);
    Redirect::to("/dashboard").into_response()
}

/// Display the registration page.
pub async fn register_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    RegisterTemplate {
        user,
        error: query.error,
        roles: [UserRole::Buyer, UserRole::Seller, UserRole::Agent],
    }
    .into_response()
}

/// Handle registration form submission.
#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let (phone, role) = match form.validate() {
        Ok(checked) => checked,
        Err(message) => return redirect_error("/auth/register", &message),
    };

    let request = RegisterRequest {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        username: form.username.trim().to_string(),
        email: form.email.trim().to_string(),
        mobile_number: phone.into_inner(),
        password: form.password,
        role,
    };

    match state.backend().register(&request).await {
        Ok(()) => redirect_success("/auth/login", "Account created! Please sign in."),
        Err(e) => {
            tracing::warn!("Registration failed for {}: {e}", request.username);
            redirect_error("/auth/register", &user_message(&e))
        }
    }
}

/// Log the user out and return to the home page.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session on logout: {e}");
    }
    Redirect::to("/").into_response()
}

/// Login failures deliberately collapse to one message so the form does not
/// reveal which accounts exist.
fn login_message(error: &crate::backend::BackendError) -> String {
    use crate::backend::BackendError;
    match error {
        BackendError::Rejected(_) | BackendError::Unauthorized | BackendError::Status { .. } => {
            "Invalid username or password.".to_string()
        }
        _ => user_message(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RegisterForm {
        RegisterForm {
            first_name: "Ravi".to_string(),
            last_name: "Kumar".to_string(),
            username: "ravi".to_string(),
            email: "ravi@example.com".to_string(),
            mobile: "9876543210".to_string(),
            password: "secret123".to_string(),
            confirm_password: "secret123".to_string(),
            role: "BUYER".to_string(),
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        let (phone, role) = valid_form().validate().unwrap();
        assert_eq!(phone.as_str(), "9876543210");
        assert_eq!(role, UserRole::Buyer);
    }

    #[test]
    fn test_short_password_is_rejected() {
        let mut form = valid_form();
        form.password = "abc12".to_string();
        form.confirm_password = "abc12".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_mismatched_passwords_are_rejected() {
        let mut form = valid_form();
        form.confirm_password = "different".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_admin_cannot_self_register() {
        let mut form = valid_form();
        form.role = "ADMIN".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_mobile_number_is_normalized() {
        let mut form = valid_form();
        form.mobile = "+91 98765 43210".to_string();
        let (phone, _) = form.validate().unwrap();
        assert_eq!(phone.as_str(), "9876543210");
    }
}
