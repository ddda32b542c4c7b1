//! Auth Forms
//!
//! Login and registration forms, shown only while logged out.

use leptos::*;

use crate::dispatch::{self, Command};
use crate::state::global::GlobalState;

/// Login form component
#[component]
pub fn LoginForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (submitting, set_submitting) = create_signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let command = Command::Login {
            email: email.get(),
            password: password.get(),
        };

        set_submitting.set(true);
        spawn_local(async move {
            if dispatch::execute(command, state).await {
                set_email.set(String::new());
                set_password.set(String::new());
            }
            set_submitting.set(false);
        });
    };

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4">"Login"</h2>

            <form on:submit=on_submit class="space-y-4">
                <div>
                    <label class="block text-sm text-gray-400 mb-2">"Email"</label>
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
                    <label class="block text-sm text-gray-400 mb-2">"Password"</label>
                    <input
                        type="password"
                        required
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                               border border-gray-600 focus:border-primary-500 focus:outline-none"
                    />
                </div>

                <button
                    type="submit"
                    disabled=move || submitting.get()
                    class="w-full bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                           disabled:cursor-not-allowed rounded-lg py-3 font-semibold
                           transition-colors"
                >
                    {move || if submitting.get() { "Logging in..." } else { "Login" }}
                </button>
            </form>
        </section>
    }
}

/// Registration form. New accounts are always students; a successful
/// registration does not log the user in.
#[component]
pub fn RegisterForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (submitting, set_submitting) = create_signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let command = Command::Register {
            email: email.get(),
            password: password.get(),
        };

        set_submitting.set(true);
        spawn_local(async move {
            if dispatch::execute(command, state).await {
                set_email.set(String::new());
                set_password.set(String::new());
            }
            set_submitting.set(false);
        });
    };

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4">"Register"</h2>
            <p class="text-gray-400 text-sm mb-4">"Create a student account to browse activities."</p>

            <form on:submit=on_submit class="space-y-4">
                <div>
                    <label class="block text-sm text-gray-400 mb-2">"Email"</label>
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
                    <label class="block text-sm text-gray-400 mb-2">"Password"</label>
                    <input
                        type="password"
                        required
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                               border border-gray-600 focus:border-primary-500 focus:outline-none"
                    />
                </div>

                <button
                    type="submit"
                    disabled=move || submitting.get()
                    class="w-full bg-gray-600 hover:bg-gray-500 disabled:bg-gray-700
                           disabled:cursor-not-allowed rounded-lg py-3 font-semibold
                           transition-colors"
                >
                    {move || if submitting.get() { "Registering..." } else { "Register" }}
                </button>
            </form>
        </section>
    }
}
