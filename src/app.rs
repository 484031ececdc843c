use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;

use crate::components::consent_banner::{ConsentBanner, ConsentSettingsLink};
use crate::components::job_search::JobSearch;
use crate::components::not_found::NotFound;
use crate::config::{provide_app_config, AppConfig};
use crate::services::consent_state::provide_consent_state;

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    // Provide global services
    provide_app_config(config);
    provide_consent_state();

    view! {
        <Router>
            <div class="min-h-screen flex flex-col bg-base-200">
                <header class="navbar bg-base-100 shadow-sm px-4">
                    <A href="/" attr:class="btn btn-ghost text-xl">"FindJob.nu"</A>
                    <nav class="ml-auto">
                        <A href="/jobsearch" attr:class="btn btn-ghost">"Jobsøgning"</A>
                    </nav>
                </header>

                <main class="flex-1">
                    <Routes fallback=|| view! { <NotFound /> }>
                        <Route path=path!("/") view=JobSearch />
                        <Route path=path!("/jobsearch") view=JobSearch />
                    </Routes>
                </main>

                <footer class="footer footer-center p-6 bg-base-100 text-base-content/70 text-sm">
                    <div class="flex gap-4">
                        <a href="/privatlivspolitik" class="link link-hover">"Privatlivspolitik"</a>
                        <a href="/cookie-information" class="link link-hover">"Cookie-information"</a>
                        <ConsentSettingsLink />
                    </div>
                </footer>
            </div>
            <ConsentBanner />
        </Router>
    }
}
