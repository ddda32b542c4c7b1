//! Toast Notification Component
//!
//! Single-slot transient message area. The slot is owned by
//! `GlobalState::show_notice`: one message at a time, last write wins,
//! auto-dismissed after a few seconds.

use leptos::*;

use crate::state::global::{GlobalState, Notice, Severity};

/// Toast notification container
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <div class="fixed bottom-4 right-4 z-50">
            {move || {
                state.notice.get().map(|notice| view! {
                    <ToastMessage notice=notice />
                })
            }}
        </div>
    }
}

#[component]
fn ToastMessage(notice: Notice) -> impl IntoView {
    let (icon, bg_class) = match notice.severity {
        Severity::Info => ("ℹ", "bg-blue-600"),
        Severity::Success => ("✓", "bg-green-600"),
        Severity::Error => ("✕", "bg-red-600"),
    };

    view! {
        <div class=format!(
            "toast-{} flex items-center space-x-3 {} text-white px-4 py-3 rounded-lg shadow-lg \
             transform transition-all duration-300 ease-out animate-slide-in",
            notice.severity.css_class(),
            bg_class
        )>
            <span class="text-lg">{icon}</span>
            <span class="text-sm font-medium">{notice.text}</span>
        </div>
    }
}
