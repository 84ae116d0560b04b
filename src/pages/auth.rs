use leptos::*;

use crate::supabase;
use crate::types::{AppView, AuthSession};

#[component]
pub fn Login(
    set_view: WriteSignal<AppView>,
    set_auth: WriteSignal<Option<AuthSession>>,
) -> impl IntoView {
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (error, set_error) = create_signal(Option::<String>::None);
    let (loading, set_loading) = create_signal(false);

    // Forgot-password sub-state lives on the login card
    let (show_reset, set_show_reset) = create_signal(false);
    let (reset_email, set_reset_email) = create_signal(String::new());
    let (reset_sent, set_reset_sent) = create_signal(false);

    let do_login = move |_| {
        let email = email.get();
        let password = password.get();
        set_loading.set(true);
        set_error.set(None);

        spawn_local(async move {
            match supabase::sign_in(&email, &password).await {
                Ok(session) => {
                    set_auth.try_set(Some(session));
                    set_view.try_set(AppView::Main);
                }
                Err(e) => {
                    set_error.try_set(Some(e));
                    set_loading.try_set(false);
                }
            }
        });
    };

    let do_request_reset = move |_| {
        let email = reset_email.get();
        if email.is_empty() {
            return;
        }
        set_loading.set(true);
        set_error.set(None);

        spawn_local(async move {
            match supabase::request_password_reset(&email).await {
                Ok(()) => {
                    set_reset_sent.try_set(true);
                }
                Err(e) => {
                    set_error.try_set(Some(e));
                }
            }
            set_loading.try_set(false);
        });
    };

    view! {
        <div class="auth-container">
            <div class="auth-logo">"LYFTLOGG"</div>
            <div class="auth-card">
                {move || if show_reset.get() {
                    view! {
                        <h2 class="auth-title">"Återställ lösenord"</h2>

                        {move || error.get().map(|e| view! { <div class="auth-error">{e}</div> })}

                        {move || reset_sent.get().then(|| view! {
                            <div class="auth-info">
                                "Om ett konto finns för adressen har ett återställningsmail skickats."
                            </div>
                        })}

                        <input
                            type="email"
                            class="auth-input"
                            placeholder="Email"
                            on:input=move |ev| set_reset_email.set(event_target_value(&ev))
                            prop:value=reset_email
                        />

                        <button
                            class="auth-button"
                            on:click=do_request_reset
                            disabled=move || loading.get() || reset_email.get().is_empty()
                        >
                            {move || if loading.get() { "Skickar..." } else { "Skicka återställningsmail" }}
                        </button>

                        <div class="auth-switch">
                            <button class="auth-link" on:click=move |_| {
                                set_show_reset.set(false);
                                set_reset_sent.set(false);
                                set_error.set(None);
                            }>
                                "Tillbaka till inloggning"
                            </button>
                        </div>
                    }.into_view()
                } else {
                    view! {
                        <h2 class="auth-title">"Logga in"</h2>

                        {move || error.get().map(|e| view! { <div class="auth-error">{e}</div> })}

                        <input
                            type="email"
                            class="auth-input"
                            placeholder="Email"
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            prop:value=email
                        />

                        <input
                            type="password"
                            class="auth-input"
                            placeholder="Lösenord"
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            prop:value=password
                        />

                        <button
                            class="auth-button"
                            on:click=do_login
                            disabled=move || loading.get()
                        >
                            {move || if loading.get() { "Loggar in..." } else { "Logga in" }}
                        </button>

                        <div class="auth-switch">
                            "Inget konto? "
                            <button class="auth-link" on:click=move |_| set_view.set(AppView::Register)>
                                "Registrera dig"
                            </button>
                        </div>
                        <div class="auth-switch">
                            <button class="auth-link" on:click=move |_| {
                                set_show_reset.set(true);
                                set_error.set(None);
                            }>
                                "Glömt lösenordet?"
                            </button>
                        </div>
                    }.into_view()
                }}
            </div>
        </div>
    }
}

#[component]
pub fn Register(
    set_view: WriteSignal<AppView>,
    set_auth: WriteSignal<Option<AuthSession>>,
) -> impl IntoView {
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (password2, set_password2) = create_signal(String::new());
    let (error, set_error) = create_signal(Option::<String>::None);
    let (loading, set_loading) = create_signal(false);

    let do_register = move |_| {
        let email = email.get();
        let password = password.get();
        let password2 = password2.get();

        if password != password2 {
            set_error.set(Some("Lösenorden matchar inte".into()));
            return;
        }

        if password.len() < 6 {
            set_error.set(Some("Lösenordet måste vara minst 6 tecken".into()));
            return;
        }

        set_loading.set(true);
        set_error.set(None);

        spawn_local(async move {
            match supabase::sign_up(&email, &password).await {
                Ok(session) => {
                    set_auth.try_set(Some(session));
                    set_view.try_set(AppView::Main);
                }
                Err(e) => {
                    set_error.try_set(Some(e));
                    set_loading.try_set(false);
                }
            }
        });
    };

    view! {
        <div class="auth-container">
            <div class="auth-logo">"LYFTLOGG"</div>
            <div class="auth-card">
                <h2 class="auth-title">"Skapa konto"</h2>

                {move || error.get().map(|e| view! { <div class="auth-error">{e}</div> })}

                <input
                    type="email"
                    class="auth-input"
                    placeholder="Email"
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                    prop:value=email
                />

                <input
                    type="password"
                    class="auth-input"
                    placeholder="Lösenord"
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                    prop:value=password
                />

                <input
                    type="password"
                    class="auth-input"
                    placeholder="Bekräfta lösenord"
                    on:input=move |ev| set_password2.set(event_target_value(&ev))
                    prop:value=password2
                />

                <button
                    class="auth-button"
                    on:click=do_register
                    disabled=move || loading.get()
                >
                    {move || if loading.get() { "Skapar konto..." } else { "Skapa konto" }}
                </button>

                <div class="auth-switch">
                    "Har du redan konto? "
                    <button class="auth-link" on:click=move |_| set_view.set(AppView::Login)>
                        "Logga in"
                    </button>
                </div>
            </div>
        </div>
    }
}

/// Sets a new password for a recovery session that arrived via the
/// reset-password deep link. Falls back to the signed-in session's token
/// so the flow also works from inside the app.
#[component]
pub fn ResetPassword(
    set_view: WriteSignal<AppView>,
    recovery_token: ReadSignal<Option<String>>,
) -> impl IntoView {
    let (password, set_password) = create_signal(String::new());
    let (password2, set_password2) = create_signal(String::new());
    let (error, set_error) = create_signal(Option::<String>::None);
    let (loading, set_loading) = create_signal(false);
    let (done, set_done) = create_signal(false);

    let do_reset = move |_| {
        let password = password.get();
        let password2 = password2.get();

        if password != password2 {
            set_error.set(Some("Lösenorden matchar inte".into()));
            return;
        }

        if password.len() < 6 {
            set_error.set(Some("Lösenordet måste vara minst 6 tecken".into()));
            return;
        }

        let token = recovery_token
            .get()
            .or_else(|| supabase::load_auth_session().map(|s| s.access_token));
        let Some(token) = token else {
            set_error.set(Some("Ingen återställningssession hittades".into()));
            return;
        };

        set_loading.set(true);
        set_error.set(None);

        spawn_local(async move {
            match supabase::update_password(&token, &password).await {
                Ok(()) => {
                    set_done.try_set(true);
                }
                Err(e) => {
                    set_error.try_set(Some(e));
                }
            }
            set_loading.try_set(false);
        });
    };

    view! {
        <div class="auth-container">
            <div class="auth-logo">"LYFTLOGG"</div>
            <div class="auth-card">
                <h2 class="auth-title">"Nytt lösenord"</h2>

                {move || if done.get() {
                    view! {
                        <div class="auth-info">
                            "Ditt lösenord är uppdaterat. Logga in med det nya lösenordet."
                        </div>
                        <button class="auth-button" on:click=move |_| set_view.set(AppView::Login)>
                            "Till inloggning"
                        </button>
                    }.into_view()
                } else {
                    view! {
                        {move || error.get().map(|e| view! { <div class="auth-error">{e}</div> })}

                        <input
                            type="password"
                            class="auth-input"
                            placeholder="Nytt lösenord"
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            prop:value=password
                        />

                        <input
                            type="password"
                            class="auth-input"
                            placeholder="Bekräfta lösenord"
                            on:input=move |ev| set_password2.set(event_target_value(&ev))
                            prop:value=password2
                        />

                        <button
                            class="auth-button"
                            on:click=do_reset
                            disabled=move || loading.get()
                        >
                            {move || if loading.get() { "Sparar..." } else { "Byt lösenord" }}
                        </button>
                    }.into_view()
                }}
            </div>
        </div>
    }
}
