use chrono::NaiveDate;
use leptos::*;

use crate::calendar;
use crate::pages::RestTimer;
use crate::selection::TargetDraft;
use crate::supabase;
use crate::types::{
    AppView, AuthSession, ExerciseRef, ExerciseSelectParams, LogSetParams, TargetRow,
};
use crate::units::UnitsState;

#[component]
pub fn Main(
    set_view: WriteSignal<AppView>,
    auth: ReadSignal<Option<AuthSession>>,
    set_auth: WriteSignal<Option<AuthSession>>,
    units: UnitsState,
) -> impl IntoView {
    let today = calendar::today();

    view! {
        <div class="dashboard">
            <div class="dashboard-date">{calendar::format_date_long(today)}</div>

            <WeekCalendar set_view=set_view />
            <TodaysWorkout set_view=set_view units=units />
            <RestTimer />

            <div class="logged-in-info">
                "inloggad: "{move || auth.get().map(|a| a.user.email.clone()).unwrap_or_default()}<br/>
                <button class="logout-link" on:click=move |_| {
                    supabase::sign_out();
                    set_auth.set(None);
                    set_view.set(AppView::Login);
                }>"logga ut"</button>
            </div>
        </div>
    }
}

/// Seven-day Sunday-start week. Picking a day looks up the workout at that
/// exact date: found routes to the detail view, a clean miss routes to
/// creation. A failed lookup stays put with an error; treating it as a
/// miss could create a duplicate workout for the date.
#[component]
fn WeekCalendar(set_view: WriteSignal<AppView>) -> impl IntoView {
    let today = calendar::today();
    let week = calendar::week_dates(today);

    let (error, set_error) = create_signal(Option::<String>::None);
    let (looking_up, set_looking_up) = create_signal(false);

    let open_day = move |date: NaiveDate| {
        if looking_up.get() {
            return;
        }
        set_looking_up.set(true);
        set_error.set(None);

        spawn_local(async move {
            match supabase::find_workout(&calendar::midnight_utc(date)).await {
                Ok(Some(workout)) => {
                    set_view.try_set(AppView::WorkoutDetail {
                        workout_id: workout.id,
                        date,
                    });
                }
                Ok(None) => {
                    set_view.try_set(AppView::CreateWorkout { date });
                }
                Err(e) => {
                    web_sys::console::log_1(&format!("Workout lookup failed: {:?}", e).into());
                    set_error.try_set(Some("Kunde inte slå upp dagen, försök igen".into()));
                }
            }
            set_looking_up.try_set(false);
        });
    };

    view! {
        <div class="week-calendar">
            <div class="calendar-row">
                {week.iter().enumerate().map(|(i, date)| {
                    let date = *date;
                    let cell_class = if date == today {
                        "day-cell today"
                    } else {
                        "day-cell"
                    };
                    view! {
                        <button class=cell_class on:click=move |_| open_day(date)>
                            <span class="day-label">{calendar::DAY_LABELS[i]}</span>
                            <span class="day-number">{date.format("%-d").to_string()}</span>
                        </button>
                    }
                }).collect_view()}
            </div>
            {move || error.get().map(|e| view! { <div class="calendar-error">{e}</div> })}
        </div>
    }
}

#[component]
fn TodaysWorkout(set_view: WriteSignal<AppView>, units: UnitsState) -> impl IntoView {
    let today = calendar::today();

    let (workout_id, set_workout_id) = create_signal(Option::<String>::None);
    let (targets, set_targets) = create_signal(Vec::<TargetRow>::new());
    let (loading, set_loading) = create_signal(true);
    let (error, set_error) = create_signal(Option::<String>::None);
    let (show_delete, set_show_delete) = create_signal(false);
    let (deleting, set_deleting) = create_signal(false);

    let load = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            let found = match supabase::find_workout(&calendar::midnight_utc(today)).await {
                Ok(found) => found,
                Err(_) => {
                    set_error.try_set(Some("Kunde inte hämta dagens pass".into()));
                    set_loading.try_set(false);
                    return;
                }
            };

            match found {
                Some(workout) => {
                    match supabase::fetch_targets(&workout.id).await {
                        Ok(rows) => {
                            set_workout_id.try_set(Some(workout.id));
                            set_targets.try_set(rows);
                        }
                        Err(_) => {
                            set_error.try_set(Some("Kunde inte hämta planerade övningar".into()));
                        }
                    }
                }
                None => {
                    set_workout_id.try_set(None);
                    set_targets.try_set(Vec::new());
                }
            }
            set_loading.try_set(false);
        });
    };

    create_effect(move |_| {
        load();
    });

    let start_logging = move |_| {
        let Some(id) = workout_id.get() else { return };
        let Some(first) = targets.get().into_iter().next() else { return };
        set_view.set(AppView::LogSet(LogSetParams {
            date: today,
            workout_id: Some(id),
            exercise: ExerciseRef {
                id: first.exercise_id.clone(),
                name: first.exercise_name().to_string(),
            },
        }));
    };

    let edit_workout = move |_| {
        let Some(id) = workout_id.get() else { return };
        let rows = targets.get();
        let preselected: Vec<ExerciseRef> = rows
            .iter()
            .map(|r| ExerciseRef {
                id: r.exercise_id.clone(),
                name: r.exercise_name().to_string(),
            })
            .collect();
        let drafts = rows
            .iter()
            .map(|r| (r.exercise_id.clone(), TargetDraft::from_row(r, units.current())))
            .collect();
        set_view.set(AppView::ExerciseSelect(ExerciseSelectParams {
            date: today,
            workout_id: id,
            edit_mode: true,
            preselected,
            drafts,
        }));
    };

    let confirm_delete = move |_| {
        let Some(id) = workout_id.get() else { return };
        set_deleting.set(true);
        spawn_local(async move {
            match supabase::delete_workout(&id).await {
                Ok(()) => {
                    set_workout_id.try_set(None);
                    set_targets.try_set(Vec::new());
                }
                Err(e) => {
                    web_sys::console::log_1(&format!("Delete failed: {:?}", e).into());
                    set_error.try_set(Some("Kunde inte radera passet".into()));
                }
            }
            set_deleting.try_set(false);
            set_show_delete.try_set(false);
        });
    };

    view! {
        <div class="todays-workout">
            <div class="todays-header">
                <span class="todays-title">"Dagens pass"</span>
                {move || workout_id.get().map(|_| view! {
                    <span class="todays-actions">
                        <button class="edit-btn" on:click=edit_workout>"Redigera"</button>
                        <button class="delete-btn" on:click=move |_| set_show_delete.set(true)>
                            "Radera"
                        </button>
                    </span>
                })}
            </div>

            // Unit preference gates rendering too; load_units flips the
            // flag even on failure, so this cannot hang.
            {move || if loading.get() || units.loading.get() {
                view! { <p class="loading-text">"Laddar..."</p> }.into_view()
            } else if let Some(e) = error.get() {
                view! { <p class="card-error">{e}</p> }.into_view()
            } else if targets.get().is_empty() {
                view! { <p class="empty-text">"Inget pass planerat idag"</p> }.into_view()
            } else {
                let rows = targets.get();
                let count = rows.len();
                view! {
                    <button class="go-btn" on:click=start_logging>"Kör igång!"</button>
                    <div class="target-list">
                        {rows.into_iter().map(|row| {
                            let name = row.exercise_name().to_string();
                            let line = row.summary(units.current());
                            view! {
                                <div class="target-item">
                                    <span class="target-name">{name}</span>
                                    <span class="target-line">{format!("Mål: {}", line)}</span>
                                </div>
                            }
                        }).collect_view()}
                    </div>
                    <p class="target-count">
                        {format!("{} övning{} planerade", count, if count == 1 { "" } else { "ar" })}
                    </p>
                }.into_view()
            }}

            {move || show_delete.get().then(|| view! {
                <div class="modal-overlay">
                    <div class="confirm-dialog">
                        <div class="confirm-title">"Radera dagens pass?"</div>
                        <div class="confirm-text">
                            "Passet och alla loggade set för dagen försvinner. Detta kan inte ångras."
                        </div>
                        <div class="confirm-buttons">
                            <button
                                class="confirm-cancel"
                                on:click=move |_| set_show_delete.set(false)
                                disabled=deleting
                            >
                                "Avbryt"
                            </button>
                            <button class="confirm-ok" on:click=confirm_delete disabled=deleting>
                                {move || if deleting.get() { "Raderar..." } else { "Radera" }}
                            </button>
                        </div>
                    </div>
                </div>
            })}
        </div>
    }
}
