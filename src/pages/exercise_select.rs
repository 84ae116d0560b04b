use leptos::*;

use crate::calendar;
use crate::selection::{Selection, TargetDraft};
use crate::supabase;
use crate::types::{AppView, Exercise, ExerciseRef, ExerciseSelectParams, SummaryParams};
use crate::units::{Units, UnitsState};

/// Second step of the composer. Shows the catalog with muscle-group,
/// equipment and name filters; keeps the selected set and its target
/// drafts in sync through [`Selection`]. In create mode "Fortsätt" hands
/// the selection to the summary; in edit mode "Spara" replaces the
/// workout's targets wholesale.
#[component]
pub fn ExerciseSelect(
    params: ExerciseSelectParams,
    set_view: WriteSignal<AppView>,
    units: UnitsState,
) -> impl IntoView {
    let ExerciseSelectParams {
        date,
        workout_id,
        edit_mode,
        preselected,
        drafts,
    } = params;

    let selection = create_rw_signal(Selection::from_saved(preselected, drafts));

    let (exercises, set_exercises) = create_signal(Vec::<Exercise>::new());
    let (loading, set_loading) = create_signal(true);
    let (error, set_error) = create_signal(Option::<String>::None);
    let (validation, set_validation) = create_signal(Option::<String>::None);
    let (saving, set_saving) = create_signal(false);

    let (query, set_query) = create_signal(String::new());
    let (muscle_filter, set_muscle_filter) = create_signal(String::new());
    let (equipment_filter, set_equipment_filter) = create_signal(String::new());

    let (editing, set_editing) = create_signal(Option::<ExerciseRef>::None);

    create_effect(move |_| {
        spawn_local(async move {
            match supabase::fetch_exercises().await {
                Ok(list) => {
                    set_exercises.try_set(list);
                }
                Err(e) => {
                    web_sys::console::log_1(&format!("Catalog fetch failed: {:?}", e).into());
                    set_error.try_set(Some("Kunde inte ladda övningar".into()));
                }
            }
            set_loading.try_set(false);
        });
    });

    let muscle_groups = create_memo(move |_| {
        let mut groups: Vec<String> = exercises
            .get()
            .iter()
            .filter_map(|e| e.muscle_group.clone())
            .collect();
        groups.sort();
        groups.dedup();
        groups
    });

    let equipment_options = create_memo(move |_| {
        let mut options: Vec<String> = exercises
            .get()
            .iter()
            .filter_map(|e| e.primary_equipment.clone())
            .collect();
        options.sort();
        options.dedup();
        options
    });

    let filtered = create_memo(move |_| {
        let q = query.get().to_lowercase();
        let muscle = muscle_filter.get();
        let equipment = equipment_filter.get();
        exercises
            .get()
            .into_iter()
            .filter(|ex| {
                (q.is_empty() || ex.name.to_lowercase().contains(&q))
                    && (muscle.is_empty() || ex.muscle_group.as_deref() == Some(muscle.as_str()))
                    && (equipment.is_empty()
                        || ex.primary_equipment.as_deref() == Some(equipment.as_str()))
            })
            .collect::<Vec<_>>()
    });

    let workout_id_continue = workout_id.clone();
    let on_continue = move |_| {
        if let Err(msg) = selection.with(|s| s.validate_for_save(&workout_id_continue)) {
            set_validation.set(Some(msg));
            return;
        }
        let (selected, drafts) = selection.get().into_parts();
        set_view.set(AppView::WorkoutSummary(SummaryParams {
            date,
            workout_id: workout_id_continue.clone(),
            selected,
            drafts,
        }));
    };

    let workout_id_save = workout_id.clone();
    let on_save = move |_| {
        if let Err(msg) = selection.with(|s| s.validate_for_save(&workout_id_save)) {
            set_validation.set(Some(msg));
            return;
        }

        set_saving.set(true);
        set_validation.set(None);

        let id = workout_id_save.clone();
        let rows = selection.with(|s| s.to_rows(&id, units.current()));
        spawn_local(async move {
            match supabase::replace_targets(&id, &rows).await {
                Ok(()) => {
                    set_view.try_set(AppView::WorkoutDetail {
                        workout_id: id,
                        date,
                    });
                }
                Err(e) => {
                    web_sys::console::log_1(&format!("Replace targets failed: {:?}", e).into());
                    set_validation.try_set(Some("Kunde inte spara ändringarna".into()));
                    set_saving.try_set(false);
                }
            }
        });
    };

    let workout_id_back = workout_id.clone();
    let on_back = move |_| {
        if edit_mode {
            set_view.set(AppView::WorkoutDetail {
                workout_id: workout_id_back.clone(),
                date,
            });
        } else {
            set_view.set(AppView::Main);
        }
    };

    view! {
        <div class="exercise-select">
            <h1 class="page-title">
                {if edit_mode { "Redigera pass" } else { "Välj övningar" }}
            </h1>
            <div class="page-date">{calendar::format_date_long(date)}</div>

            <div class="filter-bar">
                <input
                    type="search"
                    class="filter-search"
                    placeholder="Sök övning..."
                    prop:value=query
                    on:input=move |ev| set_query.set(event_target_value(&ev))
                />
                <select
                    class="filter-select"
                    on:change=move |ev| set_muscle_filter.set(event_target_value(&ev))
                >
                    <option value="">"Alla muskelgrupper"</option>
                    {move || muscle_groups.get().into_iter().map(|group| {
                        let value = group.clone();
                        let label = group.clone();
                        view! {
                            <option value=value selected=move || muscle_filter.get() == group>
                                {label}
                            </option>
                        }
                    }).collect_view()}
                </select>
                <select
                    class="filter-select"
                    on:change=move |ev| set_equipment_filter.set(event_target_value(&ev))
                >
                    <option value="">"All utrustning"</option>
                    {move || equipment_options.get().into_iter().map(|equipment| {
                        let value = equipment.clone();
                        let label = equipment.clone();
                        view! {
                            <option value=value selected=move || equipment_filter.get() == equipment>
                                {label}
                            </option>
                        }
                    }).collect_view()}
                </select>
            </div>

            {move || if loading.get() {
                view! { <p class="loading-text">"Laddar övningar..."</p> }.into_view()
            } else if let Some(e) = error.get() {
                view! { <p class="page-error">{e}</p> }.into_view()
            } else {
                let sel = selection.get();
                let active_units = units.current();
                view! {
                    <div class="exercise-list">
                        {filtered.get().into_iter().map(|ex| {
                            let is_selected = sel.is_selected(&ex.id);
                            let draft_line = sel
                                .draft(&ex.id)
                                .map(|d| d.summary(active_units));
                            let meta = [ex.muscle_group.clone(), ex.primary_equipment.clone()]
                                .into_iter()
                                .flatten()
                                .collect::<Vec<_>>()
                                .join(" · ");
                            let toggle_ref = ex.to_ref();
                            let edit_ref = ex.to_ref();
                            let row_class = if is_selected {
                                "exercise-row selected"
                            } else {
                                "exercise-row"
                            };
                            view! {
                                <div class=row_class>
                                    <button
                                        class="exercise-toggle"
                                        on:click=move |_| {
                                            selection.update(|s| s.toggle(toggle_ref.clone()));
                                            set_validation.set(None);
                                        }
                                    >
                                        <span class="exercise-name">{ex.name.clone()}</span>
                                        {(!meta.is_empty()).then(|| view! {
                                            <span class="exercise-meta">{meta.clone()}</span>
                                        })}
                                        {draft_line.map(|line| view! {
                                            <span class="exercise-draft">{line}</span>
                                        })}
                                    </button>
                                    {is_selected.then(|| view! {
                                        <button
                                            class="targets-btn"
                                            on:click=move |_| set_editing.set(Some(edit_ref.clone()))
                                        >
                                            "Mål"
                                        </button>
                                    })}
                                </div>
                            }
                        }).collect_view()}
                    </div>
                }.into_view()
            }}

            {move || validation.get().map(|v| view! { <div class="page-error">{v}</div> })}

            <div class="select-footer">
                <span class="selected-count">
                    {move || format!("{} valda", selection.with(|s| s.len()))}
                </span>
                {if edit_mode {
                    view! {
                        <button class="primary-btn" on:click=on_save disabled=saving>
                            {move || if saving.get() { "Sparar..." } else { "Spara ändringar" }}
                        </button>
                    }.into_view()
                } else {
                    view! {
                        <button class="primary-btn" on:click=on_continue>
                            "Fortsätt"
                        </button>
                    }.into_view()
                }}
                <button class="back-btn" on:click=on_back>
                    {if edit_mode { "Avbryt" } else { "Tillbaka till kalendern" }}
                </button>
            </div>

            {move || editing.get().map(|ex| {
                let draft = selection
                    .with(|s| s.draft(&ex.id).cloned())
                    .unwrap_or_default();
                view! {
                    <EditTargets
                        exercise=ex
                        draft=draft
                        units=units.current()
                        selection=selection
                        set_editing=set_editing
                    />
                }
            })}
        </div>
    }
}

/// Edit-targets sub-screen for one exercise. Works on a copy of the draft
/// and writes it back into the selection on save; cancel discards.
#[component]
fn EditTargets(
    exercise: ExerciseRef,
    draft: TargetDraft,
    units: Units,
    selection: RwSignal<Selection>,
    set_editing: WriteSignal<Option<ExerciseRef>>,
) -> impl IntoView {
    let (reps_min, set_reps_min) = create_signal(draft.reps_min);
    let (reps_max, set_reps_max) = create_signal(draft.reps_max);
    let (weight, set_weight) = create_signal(draft.weight);
    let (rpe, set_rpe) = create_signal(draft.rpe);

    let exercise_id = exercise.id.clone();
    let on_save = move |_| {
        selection.update(|s| {
            s.set_draft(
                &exercise_id,
                TargetDraft {
                    reps_min: reps_min.get(),
                    reps_max: reps_max.get(),
                    weight: weight.get(),
                    rpe: rpe.get(),
                },
            );
        });
        set_editing.set(None);
    };

    view! {
        <div class="modal-overlay">
            <div class="edit-targets-dialog">
                <h3>"Sätt mål"</h3>
                <div class="edit-targets-exercise">{exercise.name.clone()}</div>

                <label class="field-label">"Reps min"</label>
                <input
                    type="number"
                    class="target-input"
                    prop:value=reps_min
                    on:input=move |ev| set_reps_min.set(event_target_value(&ev))
                />

                <label class="field-label">"Reps max"</label>
                <input
                    type="number"
                    class="target-input"
                    prop:value=reps_max
                    on:input=move |ev| set_reps_max.set(event_target_value(&ev))
                />

                <label class="field-label">{format!("Vikt ({})", units.suffix())}</label>
                <input
                    type="number"
                    step="0.5"
                    class="target-input"
                    prop:value=weight
                    on:input=move |ev| set_weight.set(event_target_value(&ev))
                />

                <label class="field-label">"Mål-RPE"</label>
                <input
                    type="number"
                    class="target-input"
                    prop:value=rpe
                    on:input=move |ev| set_rpe.set(event_target_value(&ev))
                />

                <div class="confirm-buttons">
                    <button class="confirm-cancel" on:click=move |_| set_editing.set(None)>
                        "Avbryt"
                    </button>
                    <button class="confirm-ok" on:click=on_save>
                        "Spara"
                    </button>
                </div>
            </div>
        </div>
    }
}
