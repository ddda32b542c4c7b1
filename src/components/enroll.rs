//! Enrollment Form
//!
//! Signup form for managers and admins to enroll a student in an
//! activity. Hidden for students and anonymous visitors; a permission
//! hint explains what the current account may do.

use leptos::*;

use crate::dispatch::{self, Command};
use crate::state::global::{ActivityView, GlobalState, Session};

/// Enrollment form section with permission hint
#[component]
pub fn EnrollForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-2">"Enroll a Student"</h2>
            <p class="text-gray-400 text-sm mb-4">
                {move || permission_hint(&state.session.get())}
            </p>

            {move || {
                if state.session.get().can_manage() {
                    view! { <SignupFields /> }.into_view()
                } else {
                    view! {}.into_view()
                }
            }}
        </section>
    }
}

/// Hint wording mirrors what the account can actually do
fn permission_hint(session: &Session) -> &'static str {
    match session {
        Session::Anonymous => {
            "Login as admin or activity-manager to register/unregister students."
        }
        _ if session.can_manage() => "You can manage enrollment for all activities.",
        _ => "Student accounts can only view activity lists and participants.",
    }
}

#[component]
fn SignupFields() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (activity, set_activity) = create_signal(String::new());
    let (email, set_email) = create_signal(String::new());
    let (submitting, set_submitting) = create_signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let command = Command::Signup {
            activity: activity.get(),
            email: email.get(),
        };

        set_submitting.set(true);
        spawn_local(async move {
            if dispatch::execute(command, state).await {
                set_activity.set(String::new());
                set_email.set(String::new());
            }
            set_submitting.set(false);
        });
    };

    view! {
        <form on:submit=on_submit class="space-y-4">
            <div>
                <label class="block text-sm text-gray-400 mb-2">"Student Email"</label>
                <input
                    type="email"
                    required
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                           border border-gray-600 focus:border-primary-500 focus:outline-none"
                />
            </div>

            <div>
                <label class="block text-sm text-gray-400 mb-2">"Activity"</label>
                <select
                    required
                    on:change=move |ev| set_activity.set(event_target_value(&ev))
                    prop:value=move || activity.get()
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                           border border-gray-600 focus:border-primary-500 focus:outline-none"
                >
                    {move || match state.activities.get() {
                        ActivityView::Loaded(activities) => view! {
                            <option value="">"-- Select an activity --"</option>
                            {activities.into_iter().map(|a| view! {
                                <option value=a.name.clone()>{a.name}</option>
                            }).collect_view()}
                        }.into_view(),
                        _ => view! {
                            <option value="">"-- Login required --"</option>
                        }.into_view(),
                    }}
                </select>
            </div>

            <button
                type="submit"
                disabled=move || submitting.get()
                class="w-full bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                       disabled:cursor-not-allowed rounded-lg py-3 font-semibold
                       transition-colors"
            >
                {move || if submitting.get() { "Signing up..." } else { "Sign Up" }}
            </button>
        </form>
    }
}
