//! Chip input components.
//!
//! [`ChipInput`] renders a [`ChipInputMachine`] and executes its effects:
//! timers live in single-owner slots (replacing a `Timeout` cancels the old
//! one) and fetch results are dropped once the component is gone.

use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::bindings::ApiLocationLookup;
use crate::config::use_app_config;
use crate::services::categories::{category_chip, CategoryOption};
use crate::services::chip_input::{
    ChipInputConfig, ChipInputEvent, ChipInputMachine, Effect as MachineEffect, Key,
};
use crate::services::chips::Chip;
use crate::services::suggestions::{highlight, LocationLookup, RemoteSuggestions};

type SharedLookup = Rc<dyn LocationLookup>;

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Effect executor for one chip input
#[derive(Clone, Copy)]
struct ChipInputRuntime {
    machine: RwSignal<ChipInputMachine>,
    chips: RwSignal<Vec<Chip>>,
    input_ref: NodeRef<html::Input>,
    query_timer: StoredValue<Option<Timeout>, LocalStorage>,
    close_timer: StoredValue<Option<Timeout>, LocalStorage>,
    lookup: StoredValue<Option<SharedLookup>, LocalStorage>,
    on_input: Option<Callback<String>>,
}

impl ChipInputRuntime {
    /// Feed `event` to the machine and run what it asks for.
    ///
    /// Returns whether the triggering DOM event's default should be
    /// prevented. Events after disposal are ignored.
    fn dispatch(self, event: ChipInputEvent) -> bool {
        match self.machine.try_update(|m| m.handle(event, now_ms())) {
            Some(effects) => self.run(effects),
            None => false,
        }
    }

    fn run(self, effects: Vec<MachineEffect>) -> bool {
        let mut prevent = false;
        for effect in effects {
            match effect {
                MachineEffect::FetchSuggestions { seq, query } => self.fetch(seq, query),
                MachineEffect::ScheduleQuery { seq, delay_ms } => {
                    let timer = Timeout::new(delay_ms, move || {
                        self.dispatch(ChipInputEvent::DebounceElapsed(seq));
                    });
                    self.query_timer.set_value(Some(timer));
                }
                MachineEffect::CancelQuery => self.query_timer.set_value(None),
                MachineEffect::ScheduleClose { delay_ms } => {
                    let timer = Timeout::new(delay_ms, move || {
                        self.dispatch(ChipInputEvent::BlurElapsed);
                    });
                    self.close_timer.set_value(Some(timer));
                }
                MachineEffect::FocusInput => {
                    if let Some(input) = self.input_ref.get_untracked() {
                        let _ = input.focus();
                    }
                }
                MachineEffect::ChipsChanged(chips) => self.chips.set(chips),
                MachineEffect::InputChanged(text) => {
                    if let Some(on_input) = self.on_input {
                        on_input.run(text);
                    }
                }
                MachineEffect::PreventDefault => prevent = true,
            }
        }
        prevent
    }

    fn fetch(self, seq: u64, query: String) {
        let Some(lookup) = self.lookup.try_get_value().flatten() else {
            return;
        };
        let max = self.machine.with_untracked(|m| m.config().max_suggestions);
        let source = RemoteSuggestions::new(lookup).with_max(max);
        spawn_local(async move {
            let items = source.suggest(&query).await;
            self.dispatch(ChipInputEvent::SuggestionsLoaded { seq, items });
        });
    }

    fn cancel_timers(self) {
        self.query_timer.try_set_value(None);
        self.close_timer.try_set_value(None);
    }
}

fn suggestion_row_class(is_active: bool) -> &'static str {
    if is_active {
        "w-full text-left px-3 py-2 text-sm bg-primary text-primary-content"
    } else {
        "w-full text-left px-3 py-2 text-sm hover:bg-base-200"
    }
}

fn highlighted(label: &str, query: &str) -> AnyView {
    match highlight(label, query) {
        Some((before, hit, after)) => view! {
            {before.to_string()}
            <mark class="bg-primary/30 px-0 py-0 rounded-none">{hit.to_string()}</mark>
            {after.to_string()}
        }
        .into_any(),
        None => label.to_string().into_any(),
    }
}

/// Multi-value input that turns selections into removable chips
#[component]
pub fn ChipInput(
    /// Behaviour variant
    config: ChipInputConfig,
    /// Confirmed chips, owned by the host
    chips: RwSignal<Vec<Chip>>,
    /// Candidate list for local suggestions
    #[prop(into, optional)]
    candidates: Signal<Vec<Chip>>,
    /// Remote lookup for suggestions
    #[prop(optional)]
    lookup: Option<SharedLookup>,
    /// Called with the raw text whenever it changes
    #[prop(into, optional)]
    on_input: Option<Callback<String>>,
    #[prop(into, optional)]
    placeholder: String,
    #[prop(into, optional)]
    input_id: String,
    #[prop(into, optional)]
    aria_label: String,
    /// Label used on suggestion buttons, e.g. "Vælg kategori"
    #[prop(into, default = "Vælg".to_string())]
    choose_label: String,
    /// Additional CSS classes
    #[prop(into, optional)]
    class: String,
) -> impl IntoView {
    let mut initial = ChipInputMachine::new(config);
    initial.handle(ChipInputEvent::SetChips(chips.get_untracked()), 0);

    let runtime = ChipInputRuntime {
        machine: RwSignal::new(initial),
        chips,
        input_ref: NodeRef::new(),
        query_timer: StoredValue::new_local(None),
        close_timer: StoredValue::new_local(None),
        lookup: StoredValue::new_local(lookup),
        on_input,
    };
    let machine = runtime.machine;

    // Host-side replacements (reset, preselection)
    Effect::new(move |_| {
        let host = chips.get();
        let differs = machine.with_untracked(|m| m.chips().as_slice() != host.as_slice());
        if differs {
            runtime.dispatch(ChipInputEvent::SetChips(host));
        }
    });

    Effect::new(move |_| {
        let items = candidates.get();
        runtime.dispatch(ChipInputEvent::CandidatesChanged(items));
    });

    on_cleanup(move || runtime.cancel_timers());

    let focus_input = move |_: ev::MouseEvent| {
        if let Some(input) = runtime.input_ref.get_untracked() {
            let _ = input.focus();
        }
    };

    let handle_input = move |ev: ev::Event| {
        runtime.dispatch(ChipInputEvent::InputChanged(event_target_value(&ev)));
    };

    let handle_keydown = move |ev: ev::KeyboardEvent| {
        if runtime.dispatch(ChipInputEvent::Key(Key::from_key_name(&ev.key()))) {
            ev.prevent_default();
        }
    };

    let chip_list = move || machine.with(|m| m.chips().to_vec());
    let input_placeholder = move || {
        if machine.with(|m| m.chips().is_empty()) {
            placeholder.clone()
        } else {
            String::new()
        }
    };

    view! {
        <div class=format!("relative {class}")>
            <div
                class="flex flex-wrap items-center gap-1.5 min-h-10 px-3 py-2 border border-base-300 rounded-btn bg-base-100 cursor-text transition-colors hover:border-base-content/40 focus-within:border-base-content focus-within:outline-2 focus-within:outline-offset-2"
                on:click=focus_input
            >
                <For
                    each=chip_list
                    key=|chip| chip.id.clone()
                    children=move |chip: Chip| {
                        let id = chip.id.clone();
                        let remove_label = format!("Fjern {}", chip.label);
                        view! {
                            <span class="inline-flex items-center gap-1 px-2 py-0.5 text-sm bg-primary/15 text-primary-content border border-primary/30 rounded-full">
                                <span class="text-base-content">{chip.label.clone()}</span>
                                <button
                                    type="button"
                                    class="hover:bg-primary/20 rounded-full p-0.5 transition-colors"
                                    aria-label=remove_label
                                    on:click=move |ev: ev::MouseEvent| {
                                        ev.stop_propagation();
                                        runtime.dispatch(ChipInputEvent::RemoveChip(id.clone()));
                                    }
                                >
                                    "✕"
                                </button>
                            </span>
                        }
                    }
                />
                <input
                    node_ref=runtime.input_ref
                    id=input_id
                    type="text"
                    class="flex-1 min-w-30 bg-transparent border-none outline-none text-sm placeholder:text-base-content/50"
                    placeholder=input_placeholder
                    prop:value=move || machine.with(|m| m.input().to_string())
                    on:input=handle_input
                    on:keydown=handle_keydown
                    on:focus=move |_| { runtime.dispatch(ChipInputEvent::Focused); }
                    on:blur=move |_| { runtime.dispatch(ChipInputEvent::Blurred); }
                    aria-label=aria_label
                    autocomplete="off"
                />
            </div>

            <Show when=move || machine.with(|m| m.panel_visible())>
                <ul class="absolute left-0 top-full z-20 bg-base-100 border border-base-300 w-full max-h-48 overflow-y-auto shadow-lg rounded-box mt-1 p-0">
                    {
                        let choose_label = choose_label.clone();
                        move || {
                            let (items, active, query) =
                                machine.with(|m| (m.filtered(), m.active(), m.input().trim().to_string()));
                            items
                                .into_iter()
                                .enumerate()
                                .map(|(idx, item)| {
                                    view! {
                                        <li>
                                            <button
                                                type="button"
                                                class=suggestion_row_class(active == Some(idx))
                                                aria-label=format!("{} {}", choose_label, item.label)
                                                on:mousedown=move |ev: ev::MouseEvent| {
                                                    if runtime.dispatch(ChipInputEvent::SuggestionPressed(idx)) {
                                                        ev.prevent_default();
                                                    }
                                                }
                                            >
                                                {highlighted(&item.label, &query)}
                                            </button>
                                        </li>
                                    }
                                })
                                .collect_view()
                        }
                    }
                </ul>
            </Show>
        </div>
    }
}

/// Free-text search terms
#[component]
pub fn SearchTermInput(
    chips: RwSignal<Vec<Chip>>,
    /// Receives the un-committed text
    #[prop(into)]
    on_input: Callback<String>,
) -> impl IntoView {
    let config = ChipInputConfig::search_terms().tuned(&use_app_config().search);
    view! {
        <ChipInput
            config=config
            chips=chips
            on_input=on_input
            placeholder="Skriv søgeord..."
            input_id="searchTerm"
            aria_label="Søgeord"
            class="shadow"
        />
    }
}

/// Categories picked from the loaded category list
#[component]
pub fn CategoryChipInput(
    chips: RwSignal<Vec<Chip>>,
    #[prop(into)] options: Signal<Vec<CategoryOption>>,
) -> impl IntoView {
    let config = ChipInputConfig::categories().tuned(&use_app_config().search);
    let candidates = Signal::derive(move || options.with(|opts| opts.iter().map(category_chip).collect::<Vec<_>>()));
    view! {
        <ChipInput
            config=config
            chips=chips
            candidates=candidates
            placeholder="Vælg kategori..."
            input_id="categoryInput"
            aria_label="Kategori"
            choose_label="Vælg kategori"
            class="shadow"
        />
    }
}

/// Locations from the city lookup, or typed freely
#[component]
pub fn LocationChipInput(
    chips: RwSignal<Vec<Chip>>,
    #[prop(into)]
    on_input: Callback<String>,
) -> impl IntoView {
    let app_config = use_app_config();
    let config = ChipInputConfig::locations().tuned(&app_config.search);
    let lookup: SharedLookup = Rc::new(ApiLocationLookup::new(app_config.api.base_url));
    view! {
        <ChipInput
            config=config
            chips=chips
            lookup=lookup
            on_input=on_input
            placeholder="Skriv lokation..."
            input_id="locationInput"
            aria_label="Lokation"
            class="shadow"
        />
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_row_class() {
        assert!(suggestion_row_class(true).contains("bg-primary"));
        assert!(!suggestion_row_class(false).contains("bg-primary"));
    }
}
