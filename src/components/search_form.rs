use leptos::ev;
use leptos::prelude::*;

use crate::components::chip_input::{CategoryChipInput, LocationChipInput, SearchTermInput};
use crate::components::design_system::{Button, ButtonVariant};
use crate::services::categories::{category_chip, preselect_category, CategoryOption};
use crate::services::chips::Chip;
use crate::services::dates::is_valid_danish_date;
use crate::services::search_params::{SearchFormState, SearchParams};

/// Input class for a date field; marked successful only after a submit
fn date_input_class(raw: &str, submitted: bool) -> &'static str {
    if submitted && !raw.trim().is_empty() && is_valid_danish_date(raw) {
        "input input-bordered shadow input-success"
    } else {
        "input input-bordered shadow"
    }
}

#[component]
fn DateField(
    id: &'static str,
    label: &'static str,
    aria_label: &'static str,
    value: RwSignal<String>,
    submitted: RwSignal<bool>,
) -> impl IntoView {
    let invalid = move || value.with(|v| !v.trim().is_empty() && !is_valid_danish_date(v));
    view! {
        <div class="form-control gap-2">
            <label class="label p-0" for=id>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type="text"
                inputmode="numeric"
                class=move || value.with(|v| date_input_class(v, submitted.get()))
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
                placeholder="dd/mm/yyyy"
                aria-label=aria_label
                aria-invalid=move || invalid().to_string()
            />
        </div>
    }
}

/// Job search filters
#[component]
pub fn SearchForm(
    /// Known categories, for suggestions and id resolution
    #[prop(into)]
    categories: Signal<Vec<CategoryOption>>,
    /// Raw category (id or name) from the URL to preselect
    #[prop(into, optional)]
    query_category: Signal<Option<String>>,
    /// Receives the parameters on submit and reset
    #[prop(into)]
    on_search: Callback<SearchParams>,
) -> impl IntoView {
    let search_terms = RwSignal::new(Vec::<Chip>::new());
    let pending_term = RwSignal::new(String::new());
    let locations = RwSignal::new(Vec::<Chip>::new());
    let pending_location = RwSignal::new(String::new());
    let category_chips = RwSignal::new(Vec::<Chip>::new());
    let posted_after = RwSignal::new(String::new());
    let posted_before = RwSignal::new(String::new());
    let submitted = RwSignal::new(false);
    // Bumped on reset to remount the chip inputs with empty text
    let generation = RwSignal::new(0_u32);

    // Preselect the category named in the URL once categories are known
    Effect::new(move |_| {
        let Some(raw) = query_category.get() else {
            return;
        };
        if !category_chips.with_untracked(Vec::is_empty) {
            return;
        }
        let chip = categories.with(|options| preselect_category(&raw, options).map(category_chip));
        if let Some(chip) = chip {
            category_chips.set(vec![chip]);
        }
    });

    let form_state = move || SearchFormState {
        search_terms: search_terms.get_untracked(),
        pending_term: pending_term.get_untracked(),
        locations: locations.get_untracked(),
        pending_location: pending_location.get_untracked(),
        categories: category_chips.get_untracked(),
        posted_after: posted_after.get_untracked(),
        posted_before: posted_before.get_untracked(),
    };

    let handle_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        submitted.set(true);
        let params = categories.with_untracked(|options| form_state().to_params(options));
        on_search.run(params);
    };

    let handle_reset = move |_: ev::MouseEvent| {
        let mut state = form_state();
        state.reset();
        search_terms.set(state.search_terms);
        pending_term.set(state.pending_term);
        locations.set(state.locations);
        pending_location.set(state.pending_location);
        category_chips.set(state.categories);
        posted_after.set(state.posted_after);
        posted_before.set(state.posted_before);
        submitted.set(false);
        generation.update(|g| *g += 1);
        on_search.run(SearchParams::default());
    };

    view! {
        <form class="flex flex-col" on:submit=handle_submit>
            <fieldset class="fieldset gap-3">
                {move || {
                    generation.track();
                    view! {
                        <div class="relative w-full lg:w-64">
                            <div class="form-control gap-2">
                                <label class="label p-0" for="searchTerm">
                                    <span class="label-text">"Søgeord"</span>
                                </label>
                                <SearchTermInput
                                    chips=search_terms
                                    on_input=move |text: String| pending_term.set(text)
                                />
                            </div>
                        </div>
                        <div class="relative w-full lg:w-64">
                            <div class="form-control gap-2">
                                <label class="label p-0" for="locationInput">
                                    <span class="label-text">"Lokation"</span>
                                </label>
                                <LocationChipInput
                                    chips=locations
                                    on_input=move |text: String| pending_location.set(text)
                                />
                            </div>
                        </div>
                        <div class="relative w-full lg:w-64">
                            <div class="form-control gap-2">
                                <label class="label p-0" for="categoryInput">
                                    <span class="label-text">"Kategori"</span>
                                </label>
                                <CategoryChipInput chips=category_chips options=categories />
                            </div>
                        </div>
                    }
                }}
                <div class="flex flex-col gap-2 w-full lg:w-64">
                    <DateField
                        id="postedAfter"
                        label="Opslag efter"
                        aria_label="Opslag efter dato"
                        value=posted_after
                        submitted=submitted
                    />
                    <DateField
                        id="postedBefore"
                        label="Opslag før"
                        aria_label="Opslag før dato"
                        value=posted_before
                        submitted=submitted
                    />
                </div>
                <div class="flex gap-2 w-full lg:w-64">
                    <Button variant=ButtonVariant::Ghost button_type="button" on_click=handle_reset class="shadow">
                        "Nulstil"
                    </Button>
                    <Button variant=ButtonVariant::Primary button_type="submit" class="shadow flex-1">
                        "Søg"
                    </Button>
                </div>
            </fieldset>
        </form>
    }
}
