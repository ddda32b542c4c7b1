//! Global Application State
//!
//! Reactive state management using Leptos signals.

use leptos::*;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Current authentication state
    pub session: RwSignal<Session>,
    /// Activity list view state
    pub activities: RwSignal<ActivityView>,
    /// Whether an activity fetch is in flight
    pub loading: RwSignal<bool>,
    /// Single-slot transient notice (toast)
    pub notice: RwSignal<Option<Notice>>,
    /// Monotonic counter so a stale dismiss timer never clears a newer notice
    notice_seq: RwSignal<u64>,
}

/// Authentication state. The only transitions are the ones performed by
/// the dispatcher: `Anonymous -> Authenticated` on successful login or
/// session restore, `Authenticated -> Anonymous` on logout, failed
/// restore, or a 401 from any authenticated request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    Authenticated { email: String, role: Role },
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    /// Whether the current user may register/unregister students.
    /// This is a UX gate only; the server enforces it independently.
    pub fn can_manage(&self) -> bool {
        matches!(
            self,
            Session::Authenticated {
                role: Role::Admin | Role::ActivityManager,
                ..
            }
        )
    }

    /// Status line for the header, e.g. "Logged in as m@x.com (admin)"
    pub fn status_line(&self) -> String {
        match self {
            Session::Anonymous => "Not logged in".to_string(),
            Session::Authenticated { email, role } => {
                format!("Logged in as {} ({})", email, role.as_str())
            }
        }
    }
}

/// Access tier reported by the auth service
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Student,
    ActivityManager,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::ActivityManager => "activity-manager",
            Role::Admin => "admin",
        }
    }
}

/// What the activity board is currently showing
#[derive(Clone, Debug, PartialEq)]
pub enum ActivityView {
    /// No token held; prompt the user to log in
    LoginRequired,
    /// Activities in server-returned order
    Loaded(Vec<Activity>),
    /// Fetch or parse failed
    Failed,
}

/// A named enrollable offering with a participant roster and capacity
#[derive(Clone, Debug, PartialEq)]
pub struct Activity {
    pub name: String,
    pub details: ActivityDetails,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct ActivityDetails {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl Activity {
    /// Remaining capacity, recomputed on every render. Signed: an
    /// over-subscribed roster renders negative rather than clamping.
    pub fn spots_left(&self) -> i64 {
        self.details.max_participants as i64 - self.details.participants.len() as i64
    }
}

/// Transient user-facing message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub severity: Severity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Notice { text: text.into(), severity: Severity::Success }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice { text: text.into(), severity: Severity::Error }
    }
}

/// How long a notice stays visible before auto-dismissing
const NOTICE_DISMISS_MS: u32 = 5_000;

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        session: create_rw_signal(Session::Anonymous),
        activities: create_rw_signal(ActivityView::LoginRequired),
        loading: create_rw_signal(false),
        notice: create_rw_signal(None),
        notice_seq: create_rw_signal(0),
    };

    provide_context(state);
}

impl GlobalState {
    /// Show a notice, replacing any currently visible one (last write
    /// wins), and schedule it to dismiss after the timeout.
    pub fn show_notice(&self, notice: Notice) {
        let seq = self.notice_seq.get_untracked() + 1;
        self.notice_seq.set(seq);
        self.notice.set(Some(notice));

        let notice_signal = self.notice;
        let seq_signal = self.notice_seq;
        gloo_timers::callback::Timeout::new(NOTICE_DISMISS_MS, move || {
            // A newer notice owns the slot now; leave it alone.
            if seq_signal.get_untracked() == seq {
                notice_signal.set(None);
            }
        })
        .forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_deserializes_kebab_case() {
        let role: Role = serde_json::from_str("\"activity-manager\"").unwrap();
        assert_eq!(role, Role::ActivityManager);
        let role: Role = serde_json::from_str("\"student\"").unwrap();
        assert_eq!(role, Role::Student);
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_can_manage_by_role() {
        let anon = Session::Anonymous;
        assert!(!anon.can_manage());

        for (role, expected) in [
            (Role::Student, false),
            (Role::ActivityManager, true),
            (Role::Admin, true),
        ] {
            let session = Session::Authenticated {
                email: "m@x.com".to_string(),
                role,
            };
            assert_eq!(session.can_manage(), expected, "role {:?}", role);
        }
    }

    #[test]
    fn test_status_line() {
        assert_eq!(Session::Anonymous.status_line(), "Not logged in");
        let session = Session::Authenticated {
            email: "m@x.com".to_string(),
            role: Role::Admin,
        };
        assert_eq!(session.status_line(), "Logged in as m@x.com (admin)");
    }

    #[test]
    fn test_spots_left() {
        let mut activity = Activity {
            name: "Chess Club".to_string(),
            details: ActivityDetails {
                description: "Learn strategies".to_string(),
                schedule: "Fridays".to_string(),
                max_participants: 12,
                participants: vec!["a@x.com".to_string(), "b@x.com".to_string()],
            },
        };
        assert_eq!(activity.spots_left(), 10);

        // Over-subscription renders negative rather than clamping
        activity.details.max_participants = 1;
        assert_eq!(activity.spots_left(), -1);
    }
}
