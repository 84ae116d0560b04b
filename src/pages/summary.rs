use leptos::*;

use crate::calendar;
use crate::selection::Selection;
use crate::supabase;
use crate::types::{AppView, ExerciseSelectParams, SummaryParams};
use crate::units::UnitsState;

/// Read-only review of the selection before the create-flow commit.
/// Confirm converts the drafts (weights to kilograms) and inserts the
/// workout's target rows; nothing is written before this point.
#[component]
pub fn WorkoutSummary(
    params: SummaryParams,
    set_view: WriteSignal<AppView>,
    units: UnitsState,
) -> impl IntoView {
    let SummaryParams {
        date,
        workout_id,
        selected,
        drafts,
    } = params;

    let selection = Selection::from_saved(selected, drafts);

    let (saving, set_saving) = create_signal(false);
    let (error, set_error) = create_signal(Option::<String>::None);

    let workout_id_save = workout_id.clone();
    let selection_save = selection.clone();
    let on_confirm = move |_| {
        if let Err(msg) = selection_save.validate_for_save(&workout_id_save) {
            set_error.set(Some(msg));
            return;
        }

        set_saving.set(true);
        set_error.set(None);

        let rows = selection_save.to_rows(&workout_id_save, units.current());
        spawn_local(async move {
            match supabase::insert_targets(&rows).await {
                Ok(()) => {
                    set_view.try_set(AppView::Main);
                }
                Err(e) => {
                    web_sys::console::log_1(&format!("Insert targets failed: {:?}", e).into());
                    set_error.try_set(Some("Kunde inte spara passets övningar".into()));
                    set_saving.try_set(false);
                }
            }
        });
    };

    // Back re-enters the selection with everything intact.
    let workout_id_back = workout_id.clone();
    let selection_back = selection.clone();
    let on_back = move |_| {
        let (selected, drafts) = selection_back.clone().into_parts();
        set_view.set(AppView::ExerciseSelect(ExerciseSelectParams {
            date,
            workout_id: workout_id_back.clone(),
            edit_mode: false,
            preselected: selected,
            drafts,
        }));
    };

    let active_units = units.current();
    let rows: Vec<_> = selection
        .selected()
        .iter()
        .map(|exercise| {
            let line = selection
                .draft(&exercise.id)
                .map(|d| d.summary(active_units))
                .unwrap_or_else(|| "Inga mål".to_string());
            (exercise.name.clone(), line)
        })
        .collect();

    view! {
        <div class="workout-summary">
            <h1 class="page-title">"Sammanfattning"</h1>
            <div class="page-date">{calendar::format_date_long(date)}</div>

            <div class="summary-list">
                {rows.into_iter().map(|(name, line)| view! {
                    <div class="summary-item">
                        <span class="summary-name">{name}</span>
                        <span class="summary-targets">{line}</span>
                    </div>
                }).collect_view()}
            </div>

            {move || error.get().map(|e| view! { <div class="page-error">{e}</div> })}

            <button class="primary-btn" on:click=on_confirm disabled=saving>
                {move || if saving.get() { "Sparar..." } else { "Bekräfta och spara" }}
            </button>
            <button class="back-btn" on:click=on_back>
                "Tillbaka"
            </button>
        </div>
    }
}
