use chrono::NaiveDate;
use leptos::prelude::*;

use crate::bindings::JobPost;
use crate::components::design_system::{Card, CardBody};
use crate::components::paging::Paging;
use crate::services::dates::format_danish_date;
use crate::services::paging::total_pages;

/// Anchor the pager scrolls back to
pub const RESULTS_ANCHOR: &str = "job-results";

/// `dd/mm/yyyy` for an API timestamp such as `2024-03-05T08:00:00`
fn published_label(published: &str) -> Option<String> {
    let date_part = published.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .map(format_danish_date)
}

#[component]
fn JobCard(job: JobPost) -> impl IntoView {
    let title = job.job_title.clone().unwrap_or_else(|| "Uden titel".to_string());
    let meta = [job.company_name.clone(), job.job_location.clone()]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" · ");
    let published = job.published.as_deref().and_then(published_label);

    view! {
        <Card class="transition-all hover:shadow-lg">
            <CardBody class="gap-2">
                <h2 class="card-title text-lg">
                    {match job.job_url.clone() {
                        Some(url) => view! {
                            <a href=url class="link link-hover" target="_blank" rel="noopener noreferrer">{title}</a>
                        }
                        .into_any(),
                        None => title.into_any(),
                    }}
                </h2>
                <p class="text-sm text-base-content/70">{meta}</p>
                {published.map(|date| view! {
                    <p class="text-xs text-base-content/60">"Opslået " {date}</p>
                })}
            </CardBody>
        </Card>
    }
}

/// Result list with pager
#[component]
pub fn JobList(
    #[prop(into)] jobs: Signal<Vec<JobPost>>,
    #[prop(into)] loading: Signal<bool>,
    #[prop(into)] current_page: Signal<u32>,
    #[prop(into)] page_size: Signal<u32>,
    #[prop(into)] total_count: Signal<u64>,
    #[prop(into)] on_page_change: Callback<u32>,
) -> impl IntoView {
    let pages = Signal::derive(move || total_pages(total_count.get(), page_size.get()));

    view! {
        <section id=RESULTS_ANCHOR class="flex flex-col gap-4">
            <p class="text-sm text-base-content/70">
                {move || format!("{} job fundet", total_count.get())}
            </p>
            {move || {
                if loading.get() {
                    view! {
                        <div class="flex justify-center py-12">
                            <span class="loading loading-spinner loading-lg"></span>
                        </div>
                    }
                    .into_any()
                } else if jobs.with(Vec::is_empty) {
                    view! {
                        <div class="alert">"Ingen job matchede din søgning."</div>
                    }
                    .into_any()
                } else {
                    jobs.get()
                        .into_iter()
                        .map(|job| view! { <JobCard job=job /> })
                        .collect_view()
                        .into_any()
                }
            }}
            <Paging
                current_page=current_page
                total_pages=pages
                on_page_change=on_page_change
                scroll_target_id=RESULTS_ANCHOR
            />
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_label() {
        assert_eq!(published_label("2024-03-05T08:00:00").as_deref(), Some("05/03/2024"));
        assert_eq!(published_label("2024-03-05").as_deref(), Some("05/03/2024"));
        assert_eq!(published_label("yesterday"), None);
        assert_eq!(published_label(""), None);
    }
}
