use leptos::*;

use crate::csv_import;
use crate::supabase;
use crate::types::{AppView, AuthSession};
use crate::units::{Units, UnitsState};

/// Profile settings: username, default weight unit and CSV import of
/// historical sets. Saving the unit also updates the injected units state
/// so every open screen converts with the new preference at once.
#[component]
pub fn Settings(
    set_view: WriteSignal<AppView>,
    auth: ReadSignal<Option<AuthSession>>,
    set_auth: WriteSignal<Option<AuthSession>>,
    units: UnitsState,
) -> impl IntoView {
    let (username, set_username) = create_signal(String::new());
    let (units_choice, set_units_choice) = create_signal(units.current());
    let (loading, set_loading) = create_signal(true);
    let (saving, set_saving) = create_signal(false);
    let (error, set_error) = create_signal(Option::<String>::None);
    let (success, set_success) = create_signal(Option::<String>::None);

    let (importing, set_importing) = create_signal(false);
    let (import_result, set_import_result) = create_signal(Option::<String>::None);

    create_effect(move |_| {
        if supabase::load_auth_session().is_none() {
            set_error.set(Some("Du är inte inloggad".into()));
            set_loading.set(false);
            return;
        }
        spawn_local(async move {
            match supabase::fetch_profile().await {
                Ok(Some(profile)) => {
                    set_username.try_set(profile.username.unwrap_or_default());
                    set_units_choice.try_set(profile.default_units.unwrap_or_default());
                }
                Ok(None) => {}
                Err(e) => {
                    web_sys::console::log_1(&format!("Profile fetch failed: {:?}", e).into());
                    set_error.try_set(Some("Kunde inte ladda profilen".into()));
                }
            }
            set_loading.try_set(false);
        });
    });

    let on_save = move |_| {
        if supabase::load_auth_session().is_none() {
            set_error.set(Some("Du är inte inloggad".into()));
            return;
        }
        set_saving.set(true);
        set_error.set(None);
        set_success.set(None);

        let name = username.get();
        let choice = units_choice.get();
        spawn_local(async move {
            match supabase::update_profile(&name, choice).await {
                Ok(()) => {
                    units.units.try_set(choice);
                    set_success.try_set(Some("Profilen sparad".into()));
                }
                Err(e) => {
                    web_sys::console::log_1(&format!("Profile update failed: {:?}", e).into());
                    set_error.try_set(Some("Kunde inte spara profilen".into()));
                }
            }
            set_saving.try_set(false);
        });
    };

    let on_file = move |ev: web_sys::Event| {
        let input: web_sys::HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };

        set_importing.set(true);
        set_import_result.set(None);

        spawn_local(async move {
            let text = match wasm_bindgen_futures::JsFuture::from(file.text()).await {
                Ok(value) => value.as_string().unwrap_or_default(),
                Err(_) => {
                    set_import_result.try_set(Some("Kunde inte läsa filen".into()));
                    set_importing.try_set(false);
                    return;
                }
            };

            // Every row is its own insert; one bad row never stops the rest.
            let (rows, mut failed) = csv_import::parse_sets(&text);
            let mut imported = 0usize;
            for row in &rows {
                match supabase::insert_set(row).await {
                    Ok(()) => imported += 1,
                    Err(_) => failed += 1,
                }
            }

            set_import_result.try_set(Some(format!(
                "{} importerade, {} misslyckades",
                imported, failed
            )));
            set_importing.try_set(false);
        });
    };

    let user_email = move || auth.get().map(|a| a.user.email.clone()).unwrap_or_default();

    view! {
        <div class="settings-container">
            <header class="settings-header">
                <button class="back-btn" on:click=move |_| set_view.set(AppView::Main)>
                    "← Tillbaka"
                </button>
                <h1>"Inställningar"</h1>
            </header>

            {move || if loading.get() {
                view! { <p class="loading-text">"Laddar..."</p> }.into_view()
            } else {
                view! {
                    <section class="settings-section">
                        <h2>"Profil"</h2>
                        <label class="field-label">"Användarnamn"</label>
                        <input
                            type="text"
                            class="name-input"
                            maxlength="30"
                            placeholder="Ditt namn"
                            prop:value=username
                            on:input=move |ev| set_username.set(event_target_value(&ev))
                        />

                        <label class="field-label">"Viktenhet"</label>
                        <div class="unit-toggle">
                            <button
                                class=move || if units_choice.get() == Units::Kg { "unit-btn selected" } else { "unit-btn" }
                                on:click=move |_| set_units_choice.set(Units::Kg)
                            >
                                "kg"
                            </button>
                            <button
                                class=move || if units_choice.get() == Units::Lb { "unit-btn selected" } else { "unit-btn" }
                                on:click=move |_| set_units_choice.set(Units::Lb)
                            >
                                "lb"
                            </button>
                        </div>

                        {move || error.get().map(|e| view! { <div class="page-error">{e}</div> })}
                        {move || success.get().map(|s| view! { <div class="page-success">{s}</div> })}

                        <button class="primary-btn" on:click=on_save disabled=saving>
                            {move || if saving.get() { "Sparar..." } else { "Spara" }}
                        </button>
                    </section>

                    <section class="settings-section">
                        <h2>"Importera set från CSV"</h2>
                        <p class="settings-hint">
                            "Kolumner: date, exercise_id, reps, weight_kg, rpe, partial_reps"
                        </p>
                        <input
                            type="file"
                            accept=".csv,text/csv"
                            class="csv-input"
                            disabled=importing
                            on:change=on_file
                        />
                        {move || importing.get().then(|| view! {
                            <p class="loading-text">"Importerar..."</p>
                        })}
                        {move || import_result.get().map(|r| view! {
                            <div class="import-result">{r}</div>
                        })}
                    </section>

                    <section class="settings-section">
                        <h2>"Konto"</h2>
                        <div class="account-info">
                            <span class="account-email">{user_email}</span>
                            <button class="logout-btn" on:click=move |_| {
                                supabase::sign_out();
                                set_auth.set(None);
                                set_view.set(AppView::Login);
                            }>"Logga ut"</button>
                        </div>
                    </section>
                }.into_view()
            }}
        </div>
    }
}
