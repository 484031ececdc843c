use leptos::prelude::*;
use web_sys::{ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::services::paging::{next_page, page_items, PageItem, PAGE_WINDOW};

const BUTTON_CLASS: &str =
    "join-item btn btn-lg bg-base-100 border border-base-300 hover:bg-base-200 text-base-content";
const ACTIVE_CLASS: &str = "join-item btn btn-lg btn-primary";
const ELLIPSIS_CLASS: &str =
    "join-item btn btn-lg btn-disabled bg-base-100 border border-base-300 text-base-content";

fn scroll_to(target_id: &str) {
    let Some(target) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(target_id))
    else {
        return;
    };
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

/// Page selector; hidden when there is a single page
#[component]
pub fn Paging(
    #[prop(into)] current_page: Signal<u32>,
    #[prop(into)] total_pages: Signal<u32>,
    #[prop(into)] on_page_change: Callback<u32>,
    /// Element to bring into view after a page change
    #[prop(optional)]
    scroll_target_id: Option<&'static str>,
) -> impl IntoView {
    let go_to = move |requested: u32| {
        if let Some(page) = next_page(requested, current_page.get_untracked(), total_pages.get_untracked()) {
            on_page_change.run(page);
            if let Some(target) = scroll_target_id {
                scroll_to(target);
            }
        }
    };

    view! {
        <Show when=move || { total_pages.get() > 1 }>
            <div class="flex justify-center mt-6">
                <div class="join shadow">
                    <button
                        class=BUTTON_CLASS
                        disabled=move || current_page.get() == 1
                        on:click=move |_| go_to(current_page.get_untracked().saturating_sub(1))
                        aria-label="Forrige side"
                    >
                        "«"
                    </button>
                    {move || {
                        let current = current_page.get();
                        page_items(current, total_pages.get(), PAGE_WINDOW)
                            .into_iter()
                            .map(|item| match item {
                                PageItem::Page(page) => view! {
                                    <button
                                        class=if page == current { ACTIVE_CLASS } else { BUTTON_CLASS }
                                        aria-current=(page == current).then_some("page")
                                        on:click=move |_| go_to(page)
                                    >
                                        {page}
                                    </button>
                                }
                                .into_any(),
                                PageItem::Ellipsis => view! {
                                    <button class=ELLIPSIS_CLASS disabled=true>"..."</button>
                                }
                                .into_any(),
                            })
                            .collect_view()
                    }}
                    <button
                        class=BUTTON_CLASS
                        disabled=move || current_page.get() >= total_pages.get()
                        on:click=move |_| go_to(current_page.get_untracked() + 1)
                        aria-label="Næste side"
                    >
                        "»"
                    </button>
                </div>
            </div>
        </Show>
    }
}
