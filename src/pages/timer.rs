use leptos::*;

pub const TIME_OPTIONS: [i32; 5] = [30, 45, 60, 90, 120];

/// Standalone rest timer card. Strictly local state: pick a duration,
/// count down one tick per second, flash "Klart!" for two seconds at
/// zero. Pausing just stops the countdown from advancing.
#[component]
pub fn RestTimer() -> impl IntoView {
    let (selected, set_selected) = create_signal(TIME_OPTIONS[0]);
    let (remaining, set_remaining) = create_signal(TIME_OPTIONS[0]);
    let (running, set_running) = create_signal(false);
    let (show_done, set_show_done) = create_signal(false);

    create_effect(move |_| {
        let handle = gloo_timers::callback::Interval::new(1000, move || {
            if !running.get() {
                return;
            }
            let rest = remaining.get() - 1;
            if rest <= 0 {
                set_remaining.set(0);
                set_running.set(false);
                set_show_done.set(true);
                gloo_timers::callback::Timeout::new(2000, move || {
                    set_show_done.try_set(false);
                })
                .forget();
            } else {
                set_remaining.set(rest);
            }
        });
        on_cleanup(move || drop(handle));
    });

    let select_time = move |secs: i32| {
        set_selected.set(secs);
        set_remaining.set(secs);
        set_running.set(false);
        set_show_done.set(false);
    };

    view! {
        <div class="rest-timer">
            <div class="timer-title">"Vilotimer"</div>

            <div class="timer-options">
                {TIME_OPTIONS.into_iter().map(|secs| {
                    view! {
                        <button
                            class=move || if selected.get() == secs { "timer-option selected" } else { "timer-option" }
                            on:click=move |_| select_time(secs)
                            disabled=running
                        >
                            {format!("{} sek", secs)}
                        </button>
                    }
                }).collect_view()}
            </div>

            <div class="timer-display">{move || format!("{}s", remaining.get())}</div>
            {move || show_done.get().then(|| view! {
                <div class="timer-done">"Klart!"</div>
            })}

            <div class="timer-buttons">
                <button
                    class="timer-start"
                    on:click=move |_| set_running.set(true)
                    disabled=move || running.get() || remaining.get() == 0
                >
                    "Starta"
                </button>
                <button
                    class="timer-pause"
                    on:click=move |_| set_running.set(false)
                    disabled=move || !running.get()
                >
                    "Pausa"
                </button>
            </div>
        </div>
    }
}
