//! Header Component
//!
//! School banner with the current auth status and logout control.

use leptos::*;

use crate::dispatch::{self, Command};
use crate::state::global::GlobalState;

/// Page header with auth status line
#[component]
pub fn Header() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let on_logout = move |_| {
        spawn_local(async move {
            dispatch::execute(Command::Logout, state).await;
        });
    };

    view! {
        <header class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <div class="flex items-center space-x-3">
                        <span class="text-2xl">"🏫"</span>
                        <span class="text-xl font-bold text-white">"Mergington High School Activities"</span>
                    </div>

                    <div class="flex items-center space-x-4">
                        <span class="text-sm text-gray-300">
                            {move || state.session.get().status_line()}
                        </span>

                        {move || {
                            if state.session.get().is_authenticated() {
                                view! {
                                    <button
                                        on:click=on_logout
                                        class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg
                                               text-sm font-medium transition-colors"
                                    >
                                        "Logout"
                                    </button>
                                }.into_view()
                            } else {
                                view! {}.into_view()
                            }
                        }}
                    </div>
                </div>
            </div>
        </header>
    }
}
