//! Loading Component

use leptos::*;

/// Centered loading spinner, shown while the activity list is in flight
#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-12">
            <div class="loading-spinner w-8 h-8" />
        </div>
    }
}
