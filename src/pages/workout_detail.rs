use chrono::NaiveDate;
use leptos::*;

use crate::calendar;
use crate::selection::TargetDraft;
use crate::supabase;
use crate::types::{
    AppView, ExerciseRef, ExerciseSelectParams, LogSetParams, TargetRow,
};
use crate::units::UnitsState;

/// Persisted targets for one workout. "Redigera" re-enters the selection
/// pre-populated from the current rows; saving there replaces the rows
/// wholesale. Each exercise links into the set logger.
#[component]
pub fn WorkoutDetail(
    workout_id: String,
    date: NaiveDate,
    set_view: WriteSignal<AppView>,
    units: UnitsState,
) -> impl IntoView {
    let (targets, set_targets) = create_signal(Vec::<TargetRow>::new());
    let (loading, set_loading) = create_signal(true);
    let (error, set_error) = create_signal(Option::<String>::None);
    let (show_delete, set_show_delete) = create_signal(false);
    let (deleting, set_deleting) = create_signal(false);

    let workout_id_fetch = workout_id.clone();
    create_effect(move |_| {
        let id = workout_id_fetch.clone();
        spawn_local(async move {
            match supabase::fetch_targets(&id).await {
                Ok(rows) => {
                    set_targets.try_set(rows);
                }
                Err(e) => {
                    web_sys::console::log_1(&format!("Target fetch failed: {:?}", e).into());
                    set_error.try_set(Some("Kunde inte hämta passets övningar".into()));
                }
            }
            set_loading.try_set(false);
        });
    });

    let workout_id_edit = workout_id.clone();
    let on_edit = move |_| {
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
            date,
            workout_id: workout_id_edit.clone(),
            edit_mode: true,
            preselected,
            drafts,
        }));
    };

    let workout_id_delete = workout_id.clone();
    let confirm_delete = move |_| {
        let id = workout_id_delete.clone();
        set_deleting.set(true);
        spawn_local(async move {
            match supabase::delete_workout(&id).await {
                Ok(()) => {
                    set_view.try_set(AppView::Main);
                }
                Err(e) => {
                    web_sys::console::log_1(&format!("Delete failed: {:?}", e).into());
                    set_error.try_set(Some("Kunde inte radera passet".into()));
                    set_deleting.try_set(false);
                    set_show_delete.try_set(false);
                }
            }
        });
    };

    let workout_id_log = workout_id.clone();

    view! {
        <div class="workout-detail">
            <h1 class="page-title">"Passdetaljer"</h1>
            <div class="page-date">{calendar::format_date_long(date)}</div>

            <button class="primary-btn" on:click=on_edit>
                "Redigera pass"
            </button>

            {move || if loading.get() {
                view! { <p class="loading-text">"Laddar..."</p> }.into_view()
            } else if let Some(e) = error.get() {
                view! { <p class="page-error">{e}</p> }.into_view()
            } else if targets.get().is_empty() {
                view! { <p class="empty-text">"Inga övningar i passet"</p> }.into_view()
            } else {
                let workout_id_log = workout_id_log.clone();
                view! {
                    <div class="target-list">
                        {targets.get().into_iter().map(|row| {
                            let name = row.exercise_name().to_string();
                            let line = row.summary(units.current());
                            let log_params = LogSetParams {
                                date,
                                workout_id: Some(workout_id_log.clone()),
                                exercise: ExerciseRef {
                                    id: row.exercise_id.clone(),
                                    name: name.clone(),
                                },
                            };
                            view! {
                                <div class="target-item">
                                    <span class="target-name">{name}</span>
                                    <span class="target-line">{line}</span>
                                    <button
                                        class="log-btn"
                                        on:click=move |_| {
                                            set_view.set(AppView::LogSet(log_params.clone()));
                                        }
                                    >
                                        "Logga set"
                                    </button>
                                </div>
                            }
                        }).collect_view()}
                    </div>
                }.into_view()
            }}

            <button class="delete-btn" on:click=move |_| set_show_delete.set(true)>
                "Radera pass"
            </button>
            <button class="back-btn" on:click=move |_| set_view.set(AppView::Main)>
                "Tillbaka"
            </button>

            {move || show_delete.get().then(|| view! {
                <div class="modal-overlay">
                    <div class="confirm-dialog">
                        <div class="confirm-title">"Radera pass?"</div>
                        <div class="confirm-text">
                            "Passet, dess mål och alla loggade set försvinner. Detta kan inte ångras."
                        </div>
                        <div class="confirm-buttons">
                            <button
                                class="confirm-cancel"
                                on:click=move |_| set_show_delete.set(false)
                                disabled=deleting
                            >
                                "Avbryt"
                            </button>
                            <button class="confirm-ok" on:click=confirm_delete.clone() disabled=deleting>
                                {move || if deleting.get() { "Raderar..." } else { "Radera" }}
                            </button>
                        </div>
                    </div>
                </div>
            })}
        </div>
    }
}
