//! Activity Board
//!
//! Renders the activity list in server-returned order: one card per
//! activity with its schedule, remaining spots, and participant roster.
//! Unregister controls appear on participant rows only for managers and
//! admins.

use leptos::*;

use crate::components::Loading;
use crate::dispatch::{self, Command};
use crate::state::global::{Activity, ActivityView, GlobalState};

/// Activity list section
#[component]
pub fn ActivityBoard() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <section class="space-y-4">
            <h2 class="text-2xl font-bold">"Activities"</h2>

            {move || {
                if state.loading.get() {
                    return view! { <Loading /> }.into_view();
                }

                match state.activities.get() {
                    ActivityView::LoginRequired => view! {
                        <p class="text-gray-400">"Please log in to view activities."</p>
                    }.into_view(),

                    ActivityView::Failed => view! {
                        <p class="text-gray-400">"Failed to load activities. Please try again later."</p>
                    }.into_view(),

                    ActivityView::Loaded(activities) => view! {
                        <div class="grid md:grid-cols-2 gap-4">
                            {activities.into_iter().map(|activity| view! {
                                <ActivityCard activity=activity />
                            }).collect_view()}
                        </div>
                    }.into_view(),
                }
            }}
        </section>
    }
}

/// Single activity card
#[component]
fn ActivityCard(activity: Activity) -> impl IntoView {
    let spots_left = activity.spots_left();
    let name = activity.name.clone();
    let participants = activity.details.participants.clone();

    view! {
        <div class="bg-gray-800 rounded-xl p-4 border border-gray-700">
            <h4 class="font-semibold text-lg">{activity.name.clone()}</h4>
            <p class="text-gray-400 text-sm mt-1">{activity.details.description.clone()}</p>
            <p class="text-sm mt-2">
                <span class="font-medium">"Schedule: "</span>
                {activity.details.schedule.clone()}
            </p>
            <p class="text-sm">
                <span class="font-medium">"Availability: "</span>
                {spots_left}" spots left"
            </p>

            <div class="mt-3">
                {if participants.is_empty() {
                    view! {
                        <p class="text-gray-500 italic text-sm">"No participants yet"</p>
                    }.into_view()
                } else {
                    view! {
                        <div>
                            <h5 class="text-sm font-medium mb-1">"Participants:"</h5>
                            <ul class="space-y-1">
                                {participants.into_iter().map(|email| view! {
                                    <ParticipantRow activity=name.clone() email=email />
                                }).collect_view()}
                            </ul>
                        </div>
                    }.into_view()
                }}
            </div>
        </div>
    }
}

/// Participant row with a role-gated unregister control
#[component]
fn ParticipantRow(activity: String, email: String) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let command = Command::Unregister {
        activity: activity.clone(),
        email: email.clone(),
    };

    let on_unregister = move |_| {
        let command = command.clone();
        spawn_local(async move {
            dispatch::execute(command, state).await;
        });
    };

    view! {
        <li class="flex items-center justify-between text-sm bg-gray-700/50 rounded px-2 py-1">
            <span class="text-gray-300">{email}</span>
            {move || {
                if state.session.get().can_manage() {
                    view! {
                        <button
                            on:click=on_unregister.clone()
                            title="Unregister student"
                            class="text-red-400 hover:text-red-300 px-1"
                        >
                            "❌"
                        </button>
                    }.into_view()
                } else {
                    view! {}.into_view()
                }
            }}
        </li>
    }
}
