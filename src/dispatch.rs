//! Command Dispatch
//!
//! Every user gesture becomes a [`Command`]. The dispatcher performs the
//! network call for it and reduces the result to an [`Effects`] value:
//! what to do with the stored token, how the session changes, what notice
//! to show, and whether the activity list must be re-fetched. The
//! reduction is pure, so the session state machine is testable without a
//! DOM or a server; only [`run`] and [`Effects::apply`] touch the browser.

use leptos::{SignalGetUntracked, SignalSet};

use crate::api;
use crate::api::client::{ApiError, Identity, LoginResponse};
use crate::state::global::{ActivityView, GlobalState, Notice, Session};

/// A discrete user action
#[derive(Clone, Debug)]
pub enum Command {
    /// Re-derive the session from the persisted token on page load
    Restore,
    Login { email: String, password: String },
    Register { email: String, password: String },
    Logout,
    Signup { activity: String, email: String },
    Unregister { activity: String, email: String },
}

/// What to do with the persisted token
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenOp {
    Keep,
    Store(String),
    Clear,
}

/// State changes requested by a completed command
#[derive(Clone, Debug, PartialEq)]
pub struct Effects {
    pub token: TokenOp,
    /// New session, or `None` to leave it untouched
    pub session: Option<Session>,
    pub notice: Option<Notice>,
    /// The list is never patched locally; a mutation that succeeded asks
    /// for a full re-fetch instead.
    pub refresh_list: bool,
    /// Whether the originating form should reset its fields
    pub clear_form: bool,
}

impl Effects {
    fn unchanged() -> Self {
        Effects {
            token: TokenOp::Keep,
            session: None,
            notice: None,
            refresh_list: false,
            clear_form: false,
        }
    }

    fn notice_only(notice: Notice) -> Self {
        Effects {
            notice: Some(notice),
            ..Effects::unchanged()
        }
    }

    /// Apply to global state and browser storage. Dropping to `Anonymous`
    /// also resets the activity board to its login-required placeholder.
    pub fn apply(&self, state: &GlobalState) {
        match &self.token {
            TokenOp::Keep => {}
            TokenOp::Store(token) => api::set_token(token),
            TokenOp::Clear => api::clear_token(),
        }

        if let Some(session) = &self.session {
            let logged_out = !session.is_authenticated();
            state.session.set(session.clone());
            if logged_out {
                state.activities.set(ActivityView::LoginRequired);
            }
        }

        if let Some(notice) = &self.notice {
            state.show_notice(notice.clone());
        }
    }
}

/// Execute a command end to end: run it, apply its effects, and re-fetch
/// the activity list when asked to. Returns whether the originating form
/// should clear its fields.
pub async fn execute(command: Command, state: GlobalState) -> bool {
    let session = state.session.get_untracked();
    let effects = run(command, &session).await;
    let clear_form = effects.clear_form;
    effects.apply(&state);
    if effects.refresh_list {
        refresh(state).await;
    }
    clear_form
}

/// Perform the network call for a command and reduce the outcome
pub async fn run(command: Command, session: &Session) -> Effects {
    match command {
        Command::Restore => match api::get_token() {
            None => restore_effects(None),
            Some(token) => {
                let result = api::me(&token).await;
                if let Err(e) = &result {
                    log_transport("Error restoring session", e);
                }
                restore_effects(Some(result))
            }
        },

        Command::Login { email, password } => {
            let result = api::login(&email, &password).await;
            if let Err(e) = &result {
                log_transport("Error logging in", e);
            }
            login_effects(result)
        }

        Command::Register { email, password } => {
            let result = api::register(&email, &password).await;
            if let Err(e) = &result {
                log_transport("Error registering", e);
            }
            register_effects(result)
        }

        Command::Logout => {
            // Best effort: the server call never blocks the local logout.
            if let Some(token) = api::get_token() {
                if let Err(e) = api::logout(&token).await {
                    log_transport("Error logging out", &e);
                }
            }
            logout_effects()
        }

        Command::Signup { activity, email } => {
            if !session.can_manage() {
                return permission_denied(EnrollAction::Signup);
            }
            let token = api::get_token().unwrap_or_default();
            let result = api::signup(&token, &activity, &email).await;
            if let Err(e) = &result {
                log_transport("Error signing up", e);
            }
            mutation_effects(result, EnrollAction::Signup)
        }

        Command::Unregister { activity, email } => {
            if !session.can_manage() {
                return permission_denied(EnrollAction::Unregister);
            }
            let token = api::get_token().unwrap_or_default();
            let result = api::unregister(&token, &activity, &email).await;
            if let Err(e) = &result {
                log_transport("Error unregistering", e);
            }
            mutation_effects(result, EnrollAction::Unregister)
        }
    }
}

/// Fetch the activity list and update the board. A missing token renders
/// the login-required placeholder without a network call; a 401 is the
/// session-expiry path regardless of how the fetch was triggered.
pub async fn refresh(state: GlobalState) {
    let Some(token) = api::get_token() else {
        state.activities.set(ActivityView::LoginRequired);
        return;
    };

    state.loading.set(true);
    let result = api::fetch_activities(&token).await;
    state.loading.set(false);

    match result {
        Ok(list) => state.activities.set(ActivityView::Loaded(list)),
        Err(ApiError::Unauthorized) => session_expired_effects().apply(&state),
        Err(e) => {
            state.activities.set(ActivityView::Failed);
            log_transport("Error fetching activities", &e);
        }
    }
}

/// Console-log transport failures. Server rejections carry user-facing
/// detail text and are surfaced through the notice slot instead.
fn log_transport(context: &str, error: &ApiError) {
    if matches!(error, ApiError::Network(_) | ApiError::Malformed(_)) {
        web_sys::console::error_1(&format!("{}: {}", context, error).into());
    }
}

/// The two enrollment mutations share guard and failure wording
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnrollAction {
    Signup,
    Unregister,
}

impl EnrollAction {
    fn denied_text(&self) -> &'static str {
        match self {
            EnrollAction::Signup => "You do not have permission to register students.",
            EnrollAction::Unregister => "You do not have permission to unregister students.",
        }
    }

    fn failed_text(&self) -> &'static str {
        match self {
            EnrollAction::Signup => "Failed to sign up. Please try again.",
            EnrollAction::Unregister => "Failed to unregister. Please try again.",
        }
    }
}

// ============ Effect reducers ============
//
// Pure functions from call outcome to state changes. These encode the
// session state machine: the only paths into `Authenticated` are a
// successful login or restore, and the only paths back to `Anonymous`
// are logout, a failed restore, and a 401 on an authenticated request.

/// A 401 on any authenticated request: drop everything and tell the user
pub fn session_expired_effects() -> Effects {
    Effects {
        token: TokenOp::Clear,
        session: Some(Session::Anonymous),
        notice: Some(Notice::error("Session expired. Please log in again.")),
        refresh_list: false,
        clear_form: false,
    }
}

/// Client-side permission guard tripped; no request was sent
pub fn permission_denied(action: EnrollAction) -> Effects {
    Effects::notice_only(Notice::error(action.denied_text()))
}

/// `None` means no token was stored. Failures are silent here: the user
/// never asked for anything yet, so they just land on the login view.
pub fn restore_effects(result: Option<Result<Identity, ApiError>>) -> Effects {
    match result {
        None => Effects {
            session: Some(Session::Anonymous),
            ..Effects::unchanged()
        },
        Some(Ok(identity)) => Effects {
            session: Some(Session::Authenticated {
                email: identity.email,
                role: identity.role,
            }),
            refresh_list: true,
            ..Effects::unchanged()
        },
        Some(Err(_)) => Effects {
            token: TokenOp::Clear,
            session: Some(Session::Anonymous),
            ..Effects::unchanged()
        },
    }
}

pub fn login_effects(result: Result<LoginResponse, ApiError>) -> Effects {
    match result {
        Ok(res) => Effects {
            token: TokenOp::Store(res.token),
            session: Some(Session::Authenticated {
                email: res.email,
                role: res.role,
            }),
            notice: Some(Notice::success("Login successful")),
            refresh_list: true,
            clear_form: true,
        },
        Err(ApiError::Rejected(detail)) => Effects::notice_only(Notice::error(detail)),
        Err(_) => Effects::notice_only(Notice::error("Failed to log in. Please try again.")),
    }
}

/// Registration never authenticates; success just invites a login
pub fn register_effects(result: Result<(), ApiError>) -> Effects {
    match result {
        Ok(()) => Effects {
            notice: Some(Notice::success("Registration successful. You can now log in.")),
            clear_form: true,
            ..Effects::unchanged()
        },
        Err(ApiError::Rejected(detail)) => Effects::notice_only(Notice::error(detail)),
        Err(_) => Effects::notice_only(Notice::error("Failed to register. Please try again.")),
    }
}

/// Local logout happens unconditionally, whatever the server said
pub fn logout_effects() -> Effects {
    Effects {
        token: TokenOp::Clear,
        session: Some(Session::Anonymous),
        notice: Some(Notice::success("Logged out")),
        refresh_list: false,
        clear_form: false,
    }
}

pub fn mutation_effects(result: Result<String, ApiError>, action: EnrollAction) -> Effects {
    match result {
        Ok(message) => Effects {
            notice: Some(Notice::success(message)),
            refresh_list: true,
            clear_form: action == EnrollAction::Signup,
            ..Effects::unchanged()
        },
        Err(ApiError::Unauthorized) => session_expired_effects(),
        Err(ApiError::Rejected(detail)) => Effects::notice_only(Notice::error(detail)),
        Err(_) => Effects::notice_only(Notice::error(action.failed_text())),
    }
}

/// Whether a session may even attempt an enrollment mutation
pub fn may_enroll(session: &Session) -> bool {
    session.can_manage()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::global::{Role, Severity};

    fn admin_login() -> LoginResponse {
        LoginResponse {
            token: "t1".to_string(),
            email: "m@x.com".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_restore_without_token_is_anonymous_and_quiet() {
        let fx = restore_effects(None);
        assert_eq!(fx.session, Some(Session::Anonymous));
        assert_eq!(fx.token, TokenOp::Keep);
        assert!(fx.notice.is_none());
        assert!(!fx.refresh_list);
    }

    #[test]
    fn test_restore_success_authenticates_and_refreshes() {
        let fx = restore_effects(Some(Ok(Identity {
            email: "m@x.com".to_string(),
            role: Role::ActivityManager,
        })));
        assert_eq!(
            fx.session,
            Some(Session::Authenticated {
                email: "m@x.com".to_string(),
                role: Role::ActivityManager,
            })
        );
        assert!(fx.refresh_list);
        assert!(fx.notice.is_none());
    }

    #[test]
    fn test_restore_failure_clears_token_silently() {
        for err in [
            ApiError::Unauthorized,
            ApiError::Network("offline".to_string()),
            ApiError::Rejected("whatever".to_string()),
        ] {
            let fx = restore_effects(Some(Err(err)));
            assert_eq!(fx.token, TokenOp::Clear);
            assert_eq!(fx.session, Some(Session::Anonymous));
            assert!(fx.notice.is_none(), "restore failures stay silent");
        }
    }

    #[test]
    fn test_login_success_stores_token_and_session() {
        let fx = login_effects(Ok(admin_login()));
        assert_eq!(fx.token, TokenOp::Store("t1".to_string()));
        assert_eq!(
            fx.session,
            Some(Session::Authenticated {
                email: "m@x.com".to_string(),
                role: Role::Admin,
            })
        );
        assert!(fx.refresh_list);
        assert!(fx.clear_form);
        let notice = fx.notice.unwrap();
        assert_eq!(notice.severity, Severity::Success);
        assert_eq!(notice.text, "Login successful");
    }

    #[test]
    fn test_login_failure_leaves_state_untouched() {
        let fx = login_effects(Err(ApiError::Rejected("Invalid email or password".to_string())));
        assert_eq!(fx.token, TokenOp::Keep);
        assert!(fx.session.is_none());
        assert!(!fx.refresh_list);
        assert!(!fx.clear_form);
        assert_eq!(fx.notice.unwrap().text, "Invalid email or password");
    }

    #[test]
    fn test_login_network_failure_uses_fallback_text() {
        let fx = login_effects(Err(ApiError::Network("fetch failed".to_string())));
        assert_eq!(fx.notice.unwrap().text, "Failed to log in. Please try again.");
    }

    #[test]
    fn test_register_success_does_not_authenticate() {
        let fx = register_effects(Ok(()));
        assert!(fx.session.is_none());
        assert_eq!(fx.token, TokenOp::Keep);
        assert!(fx.clear_form);
        assert_eq!(
            fx.notice.unwrap().text,
            "Registration successful. You can now log in."
        );
    }

    #[test]
    fn test_register_failure_surfaces_detail() {
        let fx = register_effects(Err(ApiError::Rejected("User already exists".to_string())));
        assert_eq!(fx.notice.unwrap().text, "User already exists");
        assert!(!fx.clear_form);
    }

    #[test]
    fn test_logout_always_clears() {
        // run() ignores server failures before building this, so the
        // effects themselves are unconditional.
        let fx = logout_effects();
        assert_eq!(fx.token, TokenOp::Clear);
        assert_eq!(fx.session, Some(Session::Anonymous));
        assert_eq!(fx.notice.unwrap().severity, Severity::Success);
    }

    #[test]
    fn test_session_expiry_is_uniform() {
        // The same effects fire whichever operation saw the 401.
        let from_signup = mutation_effects(Err(ApiError::Unauthorized), EnrollAction::Signup);
        let from_unregister =
            mutation_effects(Err(ApiError::Unauthorized), EnrollAction::Unregister);
        assert_eq!(from_signup, session_expired_effects());
        assert_eq!(from_unregister, session_expired_effects());

        let fx = session_expired_effects();
        assert_eq!(fx.token, TokenOp::Clear);
        assert_eq!(fx.session, Some(Session::Anonymous));
        assert_eq!(fx.notice.unwrap().text, "Session expired. Please log in again.");
    }

    #[test]
    fn test_successful_mutation_requests_full_refresh() {
        let fx = mutation_effects(
            Ok("Unregistered a@x.com from Chess Club".to_string()),
            EnrollAction::Unregister,
        );
        assert!(fx.refresh_list, "mutations never patch the list locally");
        assert!(!fx.clear_form, "only the signup form has fields to reset");
        assert_eq!(fx.notice.unwrap().text, "Unregistered a@x.com from Chess Club");

        let fx = mutation_effects(Ok("Signed up".to_string()), EnrollAction::Signup);
        assert!(fx.refresh_list);
        assert!(fx.clear_form);
    }

    #[test]
    fn test_repeated_unregister_failure_is_harmless() {
        // Server rejects removing an absent participant; client state
        // must stay intact however many times it happens.
        for _ in 0..3 {
            let fx = mutation_effects(
                Err(ApiError::Rejected("Student is not signed up".to_string())),
                EnrollAction::Unregister,
            );
            assert_eq!(fx.token, TokenOp::Keep);
            assert!(fx.session.is_none());
            assert!(!fx.refresh_list);
            assert_eq!(fx.notice.unwrap().text, "Student is not signed up");
        }
    }

    #[test]
    fn test_permission_guard_blocks_students_and_anonymous() {
        let student = Session::Authenticated {
            email: "s@x.com".to_string(),
            role: Role::Student,
        };
        assert!(!may_enroll(&student));
        assert!(!may_enroll(&Session::Anonymous));

        let fx = permission_denied(EnrollAction::Signup);
        assert!(!fx.refresh_list, "guard short-circuits before any request");
        assert_eq!(fx.token, TokenOp::Keep);
        assert_eq!(
            fx.notice.unwrap().text,
            "You do not have permission to register students."
        );
    }
}
