use leptos::*;

use crate::calendar;
use crate::deeplink::{self, DeepLink};
use crate::pages::{
    CreateWorkout, ExerciseSelect, LogSet, Login, Main, Register, ResetPassword, Settings,
    WorkoutSummary, WorkoutDetail, TIME_OPTIONS,
};
use crate::supabase;
use crate::types::AppView;
use crate::units::{self, Units, UnitsState};

/// Picks the view the app opens in: a deep link wins, a recovery token
/// forces the reset-password view, otherwise the stored session decides
/// between the main and auth stacks. Links into screens that need in-app
/// context (a picked exercise) land on Main.
fn initial_view(link: Option<DeepLink>, has_recovery: bool, has_session: bool) -> AppView {
    if has_recovery {
        return AppView::ResetPassword;
    }
    match link {
        Some(DeepLink::ResetPassword) => AppView::ResetPassword,
        Some(DeepLink::ExerciseSelect { date }) if has_session => AppView::CreateWorkout {
            date: date.unwrap_or_else(calendar::today),
        },
        Some(DeepLink::Main) | Some(DeepLink::LogSet { .. }) | None if has_session => AppView::Main,
        _ => AppView::Login,
    }
}

#[component]
pub fn App() -> impl IntoView {
    let (link, token) = match web_sys::window().map(|w| w.location()) {
        Some(location) => {
            let path = location.pathname().unwrap_or_default();
            let query = location.search().unwrap_or_default();
            let fragment = location.hash().unwrap_or_default();
            (
                deeplink::parse_link(&path, &query),
                deeplink::recovery_token(&fragment),
            )
        }
        None => (None, None),
    };

    let has_session = supabase::load_auth_session().is_some();
    let (view, set_view) = create_signal(initial_view(link, token.is_some(), has_session));
    let (recovery_token, _) = create_signal(token);
    let (auth, set_auth) = create_signal(supabase::load_auth_session());

    // The one unit preference, fetched once per signed-in session and
    // injected into every weight-bearing screen.
    let units_state = UnitsState::new();
    create_effect(move |_| {
        if auth.get().is_some() {
            units::load_units(units_state);
        } else {
            units_state.units.try_set(Units::Kg);
            units_state.loading.try_set(false);
        }
    });

    // App-level countdown timer, shown in the header on every main view.
    let (timer_visible, set_timer_visible) = create_signal(false);
    let (timer_value, set_timer_value) = create_signal(0i32);
    let (timer_running, set_timer_running) = create_signal(false);
    let (timer_paused, set_timer_paused) = create_signal(false);
    let (show_done, set_show_done) = create_signal(false);

    create_effect(move |_| {
        let handle = gloo_timers::callback::Interval::new(1000, move || {
            if !timer_running.get() || timer_paused.get() {
                return;
            }
            let rest = timer_value.get() - 1;
            if rest <= 0 {
                set_timer_value.set(0);
                set_timer_running.set(false);
                set_timer_paused.set(false);
                set_show_done.set(true);
                gloo_timers::callback::Timeout::new(2000, move || {
                    set_show_done.try_set(false);
                })
                .forget();
            } else {
                set_timer_value.set(rest);
            }
        });
        on_cleanup(move || drop(handle));
    });

    let stop_timer = move |_| {
        set_timer_running.set(false);
        set_timer_paused.set(false);
        set_timer_value.set(0);
        set_show_done.set(false);
    };

    let on_auth_view = move || {
        matches!(
            view.get(),
            AppView::Login | AppView::Register | AppView::ResetPassword
        )
    };

    view! {
        <div class="app">
            {move || (!on_auth_view()).then(|| view! {
                <header class="app-header">
                    <span class="app-title">"LYFTLOGG"</span>
                    <span class="header-right">
                        {move || if show_done.get() {
                            view! { <span class="timer-done">"Klart!"</span> }.into_view()
                        } else if timer_running.get() && timer_value.get() > 0 {
                            if timer_paused.get() {
                                view! {
                                    <button class="timer-ctrl" on:click=move |_| set_timer_paused.set(false)>
                                        "▶"
                                    </button>
                                    <button class="timer-ctrl" on:click=stop_timer>
                                        "✕"
                                    </button>
                                }.into_view()
                            } else {
                                view! {
                                    <button
                                        class="timer-countdown"
                                        on:click=move |_| set_timer_paused.set(true)
                                    >
                                        {move || format!("{}s", timer_value.get())}
                                    </button>
                                }.into_view()
                            }
                        } else {
                            view! { <span class="timer-idle"></span> }.into_view()
                        }}
                        <button class="timer-open" on:click=move |_| set_timer_visible.set(true)>
                            "⏱"
                        </button>
                        <button class="settings-gear" on:click=move |_| set_view.set(AppView::Settings)>
                            "⚙"
                        </button>
                    </span>
                </header>
            })}

            {move || {
                let current = view.get();
                let gated = match current {
                    AppView::Login | AppView::Register | AppView::ResetPassword => false,
                    _ => auth.get().is_none(),
                };
                if gated {
                    return view! { <Login set_view=set_view set_auth=set_auth /> }.into_view();
                }
                match current {
                    AppView::Login => view! {
                        <Login set_view=set_view set_auth=set_auth />
                    }.into_view(),
                    AppView::Register => view! {
                        <Register set_view=set_view set_auth=set_auth />
                    }.into_view(),
                    AppView::ResetPassword => view! {
                        <ResetPassword set_view=set_view recovery_token=recovery_token />
                    }.into_view(),
                    AppView::Main => view! {
                        <Main set_view=set_view auth=auth set_auth=set_auth units=units_state />
                    }.into_view(),
                    AppView::CreateWorkout { date } => view! {
                        <CreateWorkout date=date set_view=set_view />
                    }.into_view(),
                    AppView::ExerciseSelect(params) => view! {
                        <ExerciseSelect params=params set_view=set_view units=units_state />
                    }.into_view(),
                    AppView::WorkoutSummary(params) => view! {
                        <WorkoutSummary params=params set_view=set_view units=units_state />
                    }.into_view(),
                    AppView::WorkoutDetail { workout_id, date } => view! {
                        <WorkoutDetail workout_id=workout_id date=date set_view=set_view units=units_state />
                    }.into_view(),
                    AppView::LogSet(params) => view! {
                        <LogSet params=params set_view=set_view units=units_state />
                    }.into_view(),
                    AppView::Settings => view! {
                        <Settings set_view=set_view auth=auth set_auth=set_auth units=units_state />
                    }.into_view(),
                }
            }}

            {move || timer_visible.get().then(|| view! {
                <TimerModal
                    set_visible=set_timer_visible
                    set_timer_value=set_timer_value
                    set_timer_running=set_timer_running
                    set_timer_paused=set_timer_paused
                    set_show_done=set_show_done
                />
            })}
        </div>
    }
}

/// Duration picker for the header timer.
#[component]
fn TimerModal(
    set_visible: WriteSignal<bool>,
    set_timer_value: WriteSignal<i32>,
    set_timer_running: WriteSignal<bool>,
    set_timer_paused: WriteSignal<bool>,
    set_show_done: WriteSignal<bool>,
) -> impl IntoView {
    let (selected, set_selected) = create_signal(TIME_OPTIONS[0]);

    let on_start = move |_| {
        set_timer_value.set(selected.get());
        set_timer_running.set(true);
        set_timer_paused.set(false);
        set_show_done.set(false);
        set_visible.set(false);
    };

    view! {
        <div class="modal-overlay">
            <div class="timer-dialog">
                <h3>"Timer"</h3>
                <div class="timer-options">
                    {TIME_OPTIONS.into_iter().map(|secs| {
                        view! {
                            <button
                                class=move || if selected.get() == secs { "timer-option selected" } else { "timer-option" }
                                on:click=move |_| set_selected.set(secs)
                            >
                                {format!("{} sek", secs)}
                            </button>
                        }
                    }).collect_view()}
                </div>
                <div class="confirm-buttons">
                    <button class="confirm-cancel" on:click=move |_| set_visible.set(false)>
                        "Stäng"
                    </button>
                    <button class="confirm-ok" on:click=on_start>
                        "Starta"
                    </button>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn recovery_token_always_opens_reset_password() {
        assert_eq!(initial_view(None, true, true), AppView::ResetPassword);
        assert_eq!(
            initial_view(Some(DeepLink::Main), true, false),
            AppView::ResetPassword
        );
    }

    #[test]
    fn session_gate_picks_the_stack() {
        assert_eq!(initial_view(None, false, true), AppView::Main);
        assert_eq!(initial_view(None, false, false), AppView::Login);
    }

    #[test]
    fn workout_deep_links_require_a_session() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 4);
        assert_eq!(
            initial_view(Some(DeepLink::ExerciseSelect { date }), false, true),
            AppView::CreateWorkout {
                date: date.unwrap()
            }
        );
        assert_eq!(
            initial_view(Some(DeepLink::ExerciseSelect { date }), false, false),
            AppView::Login
        );
        assert_eq!(
            initial_view(Some(DeepLink::LogSet { date: None }), false, true),
            AppView::Main
        );
    }
}
