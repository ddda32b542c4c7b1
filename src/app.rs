//! App Root Component
//!
//! Layout and global providers. On mount the session is restored from the
//! persisted token; everything else happens in response to user gestures.

use leptos::*;

use crate::components::{ActivityBoard, EnrollForm, Header, LoginForm, RegisterForm, Toast};
use crate::dispatch::{self, Command};
use crate::state::global::{provide_global_state, GlobalState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide global state to all components
    provide_global_state();
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    // Attempt session restore once on mount. With no stored token this
    // settles into the logged-out view without any network call.
    create_effect(move |_| {
        spawn_local(async move {
            dispatch::execute(Command::Restore, state).await;
        });
    });

    view! {
        <div class="min-h-screen bg-gray-900 text-white flex flex-col">
            <Header />

            <main class="flex-1 container mx-auto px-4 py-8 grid lg:grid-cols-3 gap-8 items-start">
                // Activity cards
                <div class="lg:col-span-2">
                    <ActivityBoard />
                </div>

                // Enrollment + auth panel
                <div class="space-y-8">
                    <EnrollForm />

                    {move || {
                        if state.session.get().is_authenticated() {
                            view! {}.into_view()
                        } else {
                            view! {
                                <LoginForm />
                                <RegisterForm />
                            }.into_view()
                        }
                    }}
                </div>
            </main>

            // Toast notifications
            <Toast />
        </div>
    }
}
