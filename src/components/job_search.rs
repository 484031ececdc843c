use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use wasm_bindgen_futures::spawn_local;

use crate::bindings::{fetch_job_categories, list_job_posts, search_job_posts, JobPost};
use crate::components::job_list::JobList;
use crate::components::search_form::SearchForm;
use crate::config::use_app_config;
use crate::services::categories::{preselect_category, CategoryOption};
use crate::services::search_params::SearchParams;

/// Parameters implied by a `?category=` value.
///
/// Numeric values are used as ids directly; names wait for the category
/// list (`None` until it is loaded) and fall back to listing everything.
fn params_from_query(raw: Option<&str>, options: &[CategoryOption], loaded: bool) -> Option<SearchParams> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Some(SearchParams::default());
    };
    if let Ok(id) = raw.parse::<i64>() {
        return Some(SearchParams::for_category(id));
    }
    match preselect_category(raw, options).and_then(|o| o.id) {
        Some(id) => Some(SearchParams::for_category(id)),
        None if loaded => Some(SearchParams::default()),
        None => None,
    }
}

/// Job search page: filters, results and paging
#[component]
pub fn JobSearch() -> impl IntoView {
    let config = use_app_config();
    let base_url = StoredValue::new(config.api.base_url);
    let page_size = config.search.page_size;

    let query = use_query_map();
    let query_category = Signal::derive(move || {
        query.with(|q| q.get("category").or_else(|| q.get("categoryId")))
    });

    let categories = RwSignal::new(Vec::<CategoryOption>::new());
    let categories_loaded = RwSignal::new(false);
    let jobs = RwSignal::new(Vec::<JobPost>::new());
    let total_count = RwSignal::new(0_u64);
    let current_page = RwSignal::new(1_u32);
    let loading = RwSignal::new(true);
    let last_params = RwSignal::new(SearchParams::default());
    // Only the newest request may write results
    let request_seq = RwSignal::new(0_u64);

    spawn_local(async move {
        let options = match fetch_job_categories(&base_url.get_value()).await {
            Ok(options) => options,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load job categories");
                Vec::new()
            }
        };
        let _ = categories.try_set(options);
        let _ = categories_loaded.try_set(true);
    });

    let load = move |params: SearchParams, page: u32| {
        let Some(seq) = request_seq.try_update(|s| {
            *s += 1;
            *s
        }) else {
            return;
        };
        loading.set(true);
        spawn_local(async move {
            let Some(base) = base_url.try_get_value() else {
                return;
            };
            let result = if params.is_empty() {
                list_job_posts(&base, page, page_size).await
            } else {
                search_job_posts(&base, &params, page, page_size).await
            };
            if request_seq.try_get_untracked() != Some(seq) {
                tracing::debug!(seq, "dropping superseded job results");
                return;
            }
            match result {
                Ok(found) => {
                    jobs.set(found.items);
                    total_count.set(found.total_count);
                }
                Err(e) => {
                    tracing::warn!(page, error = %e, "job search failed");
                    jobs.set(Vec::new());
                    total_count.set(0);
                }
            }
            loading.set(false);
        });
    };

    let search = move |params: SearchParams| {
        current_page.set(1);
        last_params.set(params.clone());
        load(params, 1);
    };

    // Initial search, and again whenever the URL's category changes
    Effect::new(move |prev: Option<Option<SearchParams>>| {
        let prev = prev.flatten();
        let raw = query_category.get();
        let next = categories.with(|options| params_from_query(raw.as_deref(), options, categories_loaded.get()));
        match next {
            Some(params) if prev.as_ref() != Some(&params) => {
                search(params.clone());
                Some(params)
            }
            _ => prev,
        }
    });

    let on_page_change = move |page: u32| {
        current_page.set(page);
        load(last_params.get_untracked(), page);
    };

    view! {
        <div class="container mx-auto px-4 py-8 flex flex-col gap-6">
            <h1 class="text-3xl font-bold">"Jobsøgning"</h1>
            <div class="flex flex-col lg:flex-row gap-8">
                <aside class="lg:w-72 shrink-0">
                    <SearchForm categories=categories query_category=query_category on_search=search />
                </aside>
                <div class="flex-1 min-w-0">
                    <JobList
                        jobs=jobs
                        loading=loading
                        current_page=current_page
                        page_size=Signal::stored(page_size)
                        total_count=total_count
                        on_page_change=on_page_change
                    />
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<CategoryOption> {
        vec![CategoryOption::new(7, "Engineering", 3), CategoryOption::new(9, "Marketing", 2)]
    }

    #[test]
    fn test_params_without_category_list_everything() {
        assert_eq!(params_from_query(None, &[], false), Some(SearchParams::default()));
        assert_eq!(params_from_query(Some("  "), &[], false), Some(SearchParams::default()));
    }

    #[test]
    fn test_numeric_category_needs_no_list() {
        assert_eq!(params_from_query(Some("42"), &[], false), Some(SearchParams::for_category(42)));
    }

    #[test]
    fn test_named_category_waits_for_list() {
        assert_eq!(params_from_query(Some("Marketing"), &[], false), None);
        assert_eq!(
            params_from_query(Some("Marketing"), &options(), true),
            Some(SearchParams::for_category(9))
        );
        assert_eq!(params_from_query(Some("Sales"), &options(), true), Some(SearchParams::default()));
    }
}
