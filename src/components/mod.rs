//! UI Components
//!
//! Reusable Leptos components for the activities portal.

pub mod activity_board;
pub mod auth;
pub mod enroll;
pub mod header;
pub mod loading;
pub mod toast;

pub use activity_board::ActivityBoard;
pub use auth::{LoginForm, RegisterForm};
pub use enroll::EnrollForm;
pub use header::Header;
pub use loading::Loading;
pub use toast::Toast;
