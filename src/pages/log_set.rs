use chrono::{SecondsFormat, Utc};
use leptos::*;
use uuid::Uuid;

use crate::calendar;
use crate::supabase;
use crate::types::{format_rpe, AppView, LogSetParams, NewSet, SetPatch, SetRow};
use crate::units::{self, Units, UnitsState};

/// Parsed, validated set input with the weight already in kilograms.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedSet {
    pub reps: i32,
    pub partial_reps: Option<i32>,
    pub weight_kg: f64,
    pub rpe: Option<f64>,
}

/// Validates the raw form fields before anything touches the network.
/// Reps and weight are required; partial reps are optional; RPE, when
/// given, must be a whole number 1-10 ("7.5" is rejected here).
pub fn parse_set_form(
    reps: &str,
    partial_reps: &str,
    weight: &str,
    rpe: &str,
    units: Units,
) -> Result<ParsedSet, String> {
    let reps = reps.trim();
    if reps.is_empty() {
        return Err("Reps krävs".into());
    }
    let reps: i32 = reps
        .parse()
        .map_err(|_| "Reps måste vara ett heltal".to_string())?;

    let weight = weight.trim();
    if weight.is_empty() {
        return Err("Vikt krävs".into());
    }
    let weight: f64 = weight
        .parse()
        .map_err(|_| "Vikt måste vara ett tal".to_string())?;

    let partial_reps = match partial_reps.trim() {
        "" => None,
        value => Some(
            value
                .parse::<i32>()
                .map_err(|_| "Partials måste vara ett heltal".to_string())?,
        ),
    };

    let rpe = match rpe.trim() {
        "" => None,
        value => {
            let parsed: f64 = value
                .parse()
                .map_err(|_| "RPE måste vara ett heltal 1-10".to_string())?;
            if parsed.fract() != 0.0 || !(1.0..=10.0).contains(&parsed) {
                return Err("RPE måste vara ett heltal 1-10".into());
            }
            Some(parsed)
        }
    };

    Ok(ParsedSet {
        reps,
        partial_reps,
        weight_kg: units::to_kg(weight, units),
        rpe,
    })
}

#[derive(Clone, Debug, PartialEq)]
struct EditBuffer {
    id: String,
    reps: String,
    partial_reps: String,
    weight: String,
    rpe: String,
}

impl EditBuffer {
    /// Loads a row for editing with the weight shown in the active unit.
    fn from_row(row: &SetRow, units: Units) -> Self {
        Self {
            id: row.id.clone(),
            reps: row.reps.to_string(),
            partial_reps: row.partial_reps.map(|p| p.to_string()).unwrap_or_default(),
            weight: units::format_weight(row.weight_kg, units),
            rpe: row.rpe.map(format_rpe).unwrap_or_default(),
        }
    }
}

fn describe_set(row: &SetRow, units: Units) -> String {
    let mut line = format!(
        "{} reps × {} {}",
        row.reps,
        units::format_weight(row.weight_kg, units),
        units.suffix()
    );
    if let Some(partials) = row.partial_reps.filter(|p| *p > 0) {
        line.push_str(&format!(" +{} partials", partials));
    }
    if let Some(rpe) = row.rpe {
        line.push_str(&format!(" @ RPE {}", format_rpe(rpe)));
    }
    line
}

fn set_time(row: &SetRow) -> String {
    chrono::DateTime::parse_from_rfc3339(&row.created_at)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Set logger for one exercise on one date. Resolves (or creates) the
/// date's workout, then lists, adds, edits and deletes sets scoped to
/// (workout, exercise). Every mutation is followed by a re-fetch of the
/// ordered list; there is no optimistic append.
#[component]
pub fn LogSet(
    params: LogSetParams,
    set_view: WriteSignal<AppView>,
    units: UnitsState,
) -> impl IntoView {
    let LogSetParams {
        date,
        workout_id,
        exercise,
    } = params;

    let from_detail = workout_id.clone();

    let (resolved_workout, set_resolved_workout) = create_signal(workout_id);
    let (sets, set_sets) = create_signal(Vec::<SetRow>::new());
    let (loading, set_loading) = create_signal(true);
    let (error, set_error) = create_signal(Option::<String>::None);
    let (form_error, set_form_error) = create_signal(Option::<String>::None);
    let (saving, set_saving) = create_signal(false);
    let (refresh_tick, set_refresh_tick) = create_signal(0u32);

    let (reps, set_reps) = create_signal(String::new());
    let (partial_reps, set_partial_reps) = create_signal(String::new());
    let (weight, set_weight) = create_signal(String::new());
    let (rpe, set_rpe) = create_signal(String::new());

    let (editing, set_editing) = create_signal(Option::<EditBuffer>::None);
    let (pending_delete, set_pending_delete) = create_signal(Option::<String>::None);
    let (deleting, set_deleting) = create_signal(false);

    // Resolve the workout for the date up front; the detail screen hands
    // us one, the dashboard flow does not.
    if resolved_workout.get_untracked().is_none() {
        if supabase::get_current_user_id().is_none() {
            set_error.set(Some("Du är inte inloggad".into()));
            set_loading.set(false);
        } else {
            spawn_local(async move {
                let iso = calendar::midnight_utc(date);
                match supabase::find_workout(&iso).await {
                    Ok(Some(workout)) => {
                        set_resolved_workout.try_set(Some(workout.id));
                    }
                    Ok(None) => match supabase::create_workout(&iso).await {
                        Ok(workout) => {
                            set_resolved_workout.try_set(Some(workout.id));
                        }
                        Err(e) => {
                            web_sys::console::log_1(
                                &format!("Create workout failed: {:?}", e).into(),
                            );
                            set_error.try_set(Some("Kunde inte skapa passet".into()));
                            set_loading.try_set(false);
                        }
                    },
                    Err(e) => {
                        web_sys::console::log_1(&format!("Workout lookup failed: {:?}", e).into());
                        set_error.try_set(Some("Kunde inte hämta passet".into()));
                        set_loading.try_set(false);
                    }
                }
            });
        }
    }

    let exercise_id_fetch = exercise.id.clone();
    create_effect(move |_| {
        let _ = refresh_tick.get();
        let Some(wid) = resolved_workout.get() else {
            return;
        };
        let eid = exercise_id_fetch.clone();
        spawn_local(async move {
            match supabase::fetch_sets(&wid, &eid).await {
                Ok(rows) => {
                    set_sets.try_set(rows);
                    set_error.try_set(None);
                }
                Err(e) => {
                    web_sys::console::log_1(&format!("Set fetch failed: {:?}", e).into());
                    set_sets.try_set(Vec::new());
                    set_error.try_set(Some("Kunde inte hämta loggade set".into()));
                }
            }
            set_loading.try_set(false);
        });
    });

    let exercise_id_add = exercise.id.clone();
    let on_add = move |_| {
        let Some(wid) = resolved_workout.get() else {
            return;
        };
        let parsed = match parse_set_form(
            &reps.get(),
            &partial_reps.get(),
            &weight.get(),
            &rpe.get(),
            units.current(),
        ) {
            Ok(parsed) => parsed,
            Err(msg) => {
                set_form_error.set(Some(msg));
                return;
            }
        };

        set_form_error.set(None);
        set_saving.set(true);

        let row = NewSet {
            id: Uuid::new_v4().to_string(),
            workout_id: Some(wid),
            exercise_id: exercise_id_add.clone(),
            reps: parsed.reps,
            partial_reps: parsed.partial_reps,
            weight_kg: parsed.weight_kg,
            rpe: parsed.rpe,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        };
        spawn_local(async move {
            match supabase::insert_set(&row).await {
                Ok(()) => {
                    set_reps.try_set(String::new());
                    set_partial_reps.try_set(String::new());
                    set_weight.try_set(String::new());
                    set_rpe.try_set(String::new());
                    set_refresh_tick.try_update(|n| *n += 1);
                }
                Err(e) => {
                    web_sys::console::log_1(&format!("Insert set failed: {:?}", e).into());
                    set_form_error.try_set(Some("Kunde inte spara settet".into()));
                }
            }
            set_saving.try_set(false);
        });
    };

    let on_save_edit = move |_| {
        let Some(buffer) = editing.get() else {
            return;
        };
        let parsed = match parse_set_form(
            &buffer.reps,
            &buffer.partial_reps,
            &buffer.weight,
            &buffer.rpe,
            units.current(),
        ) {
            Ok(parsed) => parsed,
            Err(msg) => {
                set_form_error.set(Some(msg));
                return;
            }
        };

        set_form_error.set(None);
        set_saving.set(true);

        let patch = SetPatch {
            reps: parsed.reps,
            partial_reps: parsed.partial_reps,
            weight_kg: parsed.weight_kg,
            rpe: parsed.rpe,
        };
        spawn_local(async move {
            match supabase::update_set(&buffer.id, &patch).await {
                Ok(()) => {
                    set_editing.try_set(None);
                    set_refresh_tick.try_update(|n| *n += 1);
                }
                Err(e) => {
                    web_sys::console::log_1(&format!("Update set failed: {:?}", e).into());
                    set_form_error.try_set(Some("Kunde inte uppdatera settet".into()));
                }
            }
            set_saving.try_set(false);
        });
    };

    let confirm_delete = move |_| {
        let Some(id) = pending_delete.get() else {
            return;
        };
        set_deleting.set(true);
        spawn_local(async move {
            match supabase::delete_set(&id).await {
                Ok(()) => {
                    set_refresh_tick.try_update(|n| *n += 1);
                }
                Err(e) => {
                    web_sys::console::log_1(&format!("Delete set failed: {:?}", e).into());
                    set_error.try_set(Some("Kunde inte radera settet".into()));
                }
            }
            set_deleting.try_set(false);
            set_pending_delete.try_set(None);
        });
    };

    let on_back = move |_| match from_detail.clone() {
        Some(id) => set_view.set(AppView::WorkoutDetail {
            workout_id: id,
            date,
        }),
        None => set_view.set(AppView::Main),
    };

    view! {
        <div class="log-set">
            <h1 class="page-title">{exercise.name.clone()}</h1>
            <div class="page-date">{calendar::format_date_long(date)}</div>

            <div class="set-form">
                <h3>"Logga set"</h3>
                <input
                    type="number"
                    class="set-input"
                    placeholder="Reps"
                    prop:value=reps
                    on:input=move |ev| set_reps.set(event_target_value(&ev))
                />
                <input
                    type="number"
                    class="set-input"
                    placeholder="Partials (valfritt)"
                    prop:value=partial_reps
                    on:input=move |ev| set_partial_reps.set(event_target_value(&ev))
                />
                <input
                    type="number"
                    step="0.5"
                    class="set-input"
                    placeholder={move || format!("Vikt ({})", units.current().suffix())}
                    prop:value=weight
                    on:input=move |ev| set_weight.set(event_target_value(&ev))
                />
                <input
                    type="number"
                    class="set-input"
                    placeholder="RPE (valfritt)"
                    prop:value=rpe
                    on:input=move |ev| set_rpe.set(event_target_value(&ev))
                />

                {move || form_error.get().map(|e| view! { <div class="page-error">{e}</div> })}

                <button
                    class="primary-btn"
                    on:click=on_add
                    disabled=move || saving.get() || resolved_workout.get().is_none()
                >
                    {move || if saving.get() { "Sparar..." } else { "Lägg till set" }}
                </button>
            </div>

            <h3>"Loggade set"</h3>
            {move || if loading.get() {
                view! { <p class="loading-text">"Laddar..."</p> }.into_view()
            } else if let Some(e) = error.get() {
                view! { <p class="page-error">{e}</p> }.into_view()
            } else if sets.get().is_empty() {
                view! { <p class="empty-text">"Inga set loggade ännu"</p> }.into_view()
            } else {
                let active_units = units.current();
                let editing_now = editing.get();
                view! {
                    <div class="set-list">
                        {sets.get().into_iter().map(|row| {
                            let row_id = row.id.clone();
                            let is_editing = editing_now
                                .as_ref()
                                .map(|b| b.id == row.id)
                                .unwrap_or(false);
                            if is_editing {
                                view! {
                                    <div class="set-item editing">
                                        <input
                                            type="number"
                                            class="set-input"
                                            placeholder="Reps"
                                            prop:value=move || editing.get().map(|b| b.reps).unwrap_or_default()
                                            on:input=move |ev| {
                                                let value = event_target_value(&ev);
                                                set_editing.update(|b| if let Some(b) = b { b.reps = value; });
                                            }
                                        />
                                        <input
                                            type="number"
                                            class="set-input"
                                            placeholder="Partials"
                                            prop:value=move || editing.get().map(|b| b.partial_reps).unwrap_or_default()
                                            on:input=move |ev| {
                                                let value = event_target_value(&ev);
                                                set_editing.update(|b| if let Some(b) = b { b.partial_reps = value; });
                                            }
                                        />
                                        <input
                                            type="number"
                                            step="0.5"
                                            class="set-input"
                                            placeholder={format!("Vikt ({})", active_units.suffix())}
                                            prop:value=move || editing.get().map(|b| b.weight).unwrap_or_default()
                                            on:input=move |ev| {
                                                let value = event_target_value(&ev);
                                                set_editing.update(|b| if let Some(b) = b { b.weight = value; });
                                            }
                                        />
                                        <input
                                            type="number"
                                            class="set-input"
                                            placeholder="RPE"
                                            prop:value=move || editing.get().map(|b| b.rpe).unwrap_or_default()
                                            on:input=move |ev| {
                                                let value = event_target_value(&ev);
                                                set_editing.update(|b| if let Some(b) = b { b.rpe = value; });
                                            }
                                        />
                                        <div class="confirm-buttons">
                                            <button class="confirm-cancel" on:click=move |_| set_editing.set(None)>
                                                "Avbryt"
                                            </button>
                                            <button class="confirm-ok" on:click=on_save_edit.clone() disabled=saving>
                                                "Spara"
                                            </button>
                                        </div>
                                    </div>
                                }.into_view()
                            } else {
                                let buffer = EditBuffer::from_row(&row, active_units);
                                view! {
                                    <div class="set-item">
                                        <button
                                            class="set-line"
                                            on:click=move |_| set_editing.set(Some(buffer.clone()))
                                        >
                                            {describe_set(&row, active_units)}
                                        </button>
                                        <span class="set-time">{set_time(&row)}</span>
                                        <button
                                            class="delete-btn"
                                            on:click=move |_| set_pending_delete.set(Some(row_id.clone()))
                                        >
                                            "×"
                                        </button>
                                    </div>
                                }.into_view()
                            }
                        }).collect_view()}
                    </div>
                }.into_view()
            }}

            <button class="back-btn" on:click=on_back>
                "Tillbaka"
            </button>

            {move || pending_delete.get().map(|_| view! {
                <div class="modal-overlay">
                    <div class="confirm-dialog">
                        <div class="confirm-title">"Radera set?"</div>
                        <div class="confirm-text">"Settet tas bort permanent."</div>
                        <div class="confirm-buttons">
                            <button
                                class="confirm-cancel"
                                on:click=move |_| set_pending_delete.set(None)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reps_and_weight_are_required() {
        assert_eq!(
            parse_set_form("", "", "100", "", Units::Kg),
            Err("Reps krävs".into())
        );
        assert_eq!(
            parse_set_form("5", "", "", "", Units::Kg),
            Err("Vikt krävs".into())
        );
        assert_eq!(
            parse_set_form("fem", "", "100", "", Units::Kg),
            Err("Reps måste vara ett heltal".into())
        );
    }

    #[test]
    fn fractional_rpe_is_rejected_before_any_write() {
        assert_eq!(
            parse_set_form("5", "", "100", "7.5", Units::Kg),
            Err("RPE måste vara ett heltal 1-10".into())
        );
        assert_eq!(
            parse_set_form("5", "", "100", "11", Units::Kg),
            Err("RPE måste vara ett heltal 1-10".into())
        );
        let parsed = parse_set_form("5", "", "100", "7", Units::Kg).unwrap();
        assert_eq!(parsed.rpe, Some(7.0));
    }

    #[test]
    fn rpe_and_partials_are_optional() {
        let parsed = parse_set_form("5", "", "100", "", Units::Kg).unwrap();
        assert_eq!(parsed.rpe, None);
        assert_eq!(parsed.partial_reps, None);

        let parsed = parse_set_form("5", "2", "100", "8", Units::Kg).unwrap();
        assert_eq!(parsed.partial_reps, Some(2));
    }

    #[test]
    fn pound_entry_is_stored_as_kilograms() {
        let parsed = parse_set_form("5", "", "220", "", Units::Lb).unwrap();
        assert!((parsed.weight_kg - 99.7903214).abs() < 1e-6);
        // Redisplayed in pounds the set shows the entered number again.
        assert_eq!(units::format_weight(parsed.weight_kg, Units::Lb), "220.0");
    }

    #[test]
    fn edit_buffer_shows_weight_in_active_unit() {
        let row = SetRow {
            id: "s1".into(),
            workout_id: Some("w1".into()),
            exercise_id: "bench".into(),
            reps: 5,
            partial_reps: None,
            weight_kg: 99.7903214,
            rpe: Some(8.0),
            created_at: "2026-08-04T10:00:00Z".into(),
        };
        let buffer = EditBuffer::from_row(&row, Units::Lb);
        assert_eq!(buffer.weight, "220.0");
        assert_eq!(buffer.rpe, "8");

        let buffer = EditBuffer::from_row(&row, Units::Kg);
        assert_eq!(buffer.weight, "99.8");
    }

    #[test]
    fn set_description_converts_and_annotates() {
        let row = SetRow {
            id: "s1".into(),
            workout_id: None,
            exercise_id: "bench".into(),
            reps: 5,
            partial_reps: Some(2),
            weight_kg: 100.0,
            rpe: Some(8.0),
            created_at: "2026-08-04T10:00:00Z".into(),
        };
        assert_eq!(
            describe_set(&row, Units::Kg),
            "5 reps × 100.0 kg +2 partials @ RPE 8"
        );
    }
}
