use leptos::ev;
use leptos::prelude::*;

use crate::components::design_system::{Button, ButtonVariant};
use crate::services::consent::{ConsentChoice, ConsentStatus};
use crate::services::consent_state::use_consent_state;

/// A reopened manager over a saved choice can be closed or reset; a
/// first-visit banner needs an explicit choice.
fn has_saved_choice_open(manager_open: bool, status: ConsentStatus) -> bool {
    manager_open && status == ConsentStatus::Saved
}

/// Cookie consent banner.
///
/// Visible until a choice is saved, and again whenever the manager is
/// reopened. Checkbox state starts from the saved record.
#[component]
pub fn ConsentBanner() -> impl IntoView {
    let state = use_consent_state();
    let ads = RwSignal::new(false);
    let analytics = RwSignal::new(false);

    // Reload the checkboxes whenever the saved record changes
    Effect::new(move |_| {
        let choice = state.consent.with(|c| c.as_ref().map(|r| r.choice()));
        let choice = choice.unwrap_or(ConsentChoice::REJECT_ALL);
        ads.set(choice.ads);
        analytics.set(choice.analytics);
    });

    let save_selection = move |_: ev::MouseEvent| {
        state.update_consent(ConsentChoice {
            ads: ads.get_untracked(),
            analytics: analytics.get_untracked(),
        });
    };
    let accept_all = move |_: ev::MouseEvent| state.update_consent(ConsentChoice::ACCEPT_ALL);
    let reject_all = move |_: ev::MouseEvent| state.update_consent(ConsentChoice::REJECT_ALL);
    let close = move |_: ev::MouseEvent| state.close_manager();
    let forget = move |_: ev::MouseEvent| state.reset_consent();
    let reopened = move || has_saved_choice_open(state.manager_open.get(), state.status.get());

    view! {
        <Show when=move || state.should_show()>
            <div
                class="fixed inset-x-0 bottom-0 z-50 p-4"
                role="dialog"
                aria-live="polite"
                aria-labelledby="consent-title"
            >
                <div class="card bg-base-100 shadow-xl border border-base-300 max-w-3xl mx-auto">
                    <div class="card-body gap-4">
                        <div class="flex items-start justify-between gap-4">
                            <div>
                                <p class="text-xs uppercase tracking-wide text-base-content/60">
                                    "Samtykke til cookies og annoncer"
                                </p>
                                <h2 id="consent-title" class="card-title">"Vi respekterer dit privatliv"</h2>
                            </div>
                            <Show when=reopened>
                                <button
                                    type="button"
                                    class="btn btn-ghost btn-sm btn-circle"
                                    aria-label="Luk samtykkemeddelelse"
                                    on:click=close
                                >
                                    "✕"
                                </button>
                            </Show>
                        </div>
                        <p class="text-sm">
                            "Vi bruger cookies til at vise annoncer og måle, hvordan siden bliver brugt. "
                            "Du bestemmer selv, hvad du vil tillade."
                        </p>
                        <div class="flex flex-col gap-2">
                            <label class="label cursor-pointer justify-start gap-3">
                                <input
                                    type="checkbox"
                                    class="checkbox checkbox-primary"
                                    prop:checked=move || ads.get()
                                    on:change=move |ev| ads.set(event_target_checked(&ev))
                                />
                                <span class="label-text">"Annonce- og måle-cookies"</span>
                            </label>
                            <label class="label cursor-pointer justify-start gap-3">
                                <input
                                    type="checkbox"
                                    class="checkbox checkbox-primary"
                                    prop:checked=move || analytics.get()
                                    on:change=move |ev| analytics.set(event_target_checked(&ev))
                                />
                                <span class="label-text">"Ydeevne og statistik"</span>
                            </label>
                        </div>
                        <p class="text-xs text-base-content/60">
                            "Nødvendige cookies er altid slået til, fordi siden ikke virker uden dem. Læs mere i vores "
                            <a href="/privatlivspolitik" class="link">"privatlivspolitik"</a>
                            " og "
                            <a href="/cookie-information" class="link">"cookie-information"</a>
                            "."
                        </p>
                        <div class="card-actions justify-end flex-wrap gap-2">
                            <Show when=reopened>
                                <Button variant=ButtonVariant::Ghost on_click=forget>
                                    "Glem mit valg"
                                </Button>
                            </Show>
                            <Button variant=ButtonVariant::Ghost on_click=reject_all>
                                "Afvis ikke-nødvendige"
                            </Button>
                            <Button variant=ButtonVariant::Outline on_click=save_selection>
                                "Gem valg"
                            </Button>
                            <Button variant=ButtonVariant::Primary on_click=accept_all>
                                "Accepter alle"
                            </Button>
                        </div>
                    </div>
                </div>
            </div>
        </Show>
    }
}

/// Footer link that reopens the consent banner
#[component]
pub fn ConsentSettingsLink() -> impl IntoView {
    let state = use_consent_state();
    view! {
        <button type="button" class="link link-hover" on:click=move |_| state.open_manager()>
            "Cookieindstillinger"
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_and_reset_only_over_saved_choice() {
        assert!(has_saved_choice_open(true, ConsentStatus::Saved));
        assert!(!has_saved_choice_open(false, ConsentStatus::Saved));
        // After a reset the manager stays open but needs a new choice
        assert!(!has_saved_choice_open(true, ConsentStatus::Unknown));
        assert!(!has_saved_choice_open(false, ConsentStatus::Unknown));
    }
}
