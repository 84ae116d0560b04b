use chrono::NaiveDate;
use leptos::*;

use crate::calendar;
use crate::supabase;
use crate::types::{AppView, ExerciseSelectParams};

/// First step of the composer: creates the workout row for the picked
/// date, then moves on to exercise selection with the new workout id.
#[component]
pub fn CreateWorkout(date: NaiveDate, set_view: WriteSignal<AppView>) -> impl IntoView {
    let (loading, set_loading) = create_signal(false);
    let (error, set_error) = create_signal(Option::<String>::None);

    let do_create = move |_| {
        // The insert is scoped to the signed-in user; without one there is
        // nothing to create and no call to make.
        if supabase::get_current_user_id().is_none() {
            set_error.set(Some("Du är inte inloggad".into()));
            return;
        }

        set_loading.set(true);
        set_error.set(None);

        spawn_local(async move {
            match supabase::create_workout(&calendar::midnight_utc(date)).await {
                Ok(workout) => {
                    set_view.try_set(AppView::ExerciseSelect(ExerciseSelectParams {
                        date,
                        workout_id: workout.id,
                        edit_mode: false,
                        preselected: Vec::new(),
                        drafts: Default::default(),
                    }));
                }
                Err(e) => {
                    web_sys::console::log_1(&format!("Create workout failed: {:?}", e).into());
                    set_error.try_set(Some("Kunde inte skapa passet".into()));
                    set_loading.try_set(false);
                }
            }
        });
    };

    view! {
        <div class="create-workout">
            <h1 class="page-title">"Nytt pass"</h1>
            <div class="page-date">{calendar::format_date_long(date)}</div>

            {move || error.get().map(|e| view! { <div class="page-error">{e}</div> })}

            <button class="primary-btn" on:click=do_create disabled=loading>
                {move || if loading.get() { "Skapar..." } else { "Skapa pass" }}
            </button>

            <button class="back-btn" on:click=move |_| set_view.set(AppView::Main)>
                "Avbryt"
            </button>
        </div>
    }
}
