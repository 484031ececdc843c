use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn NotFound() -> impl IntoView {
    view! {
        <div class="hero min-h-[60vh]">
            <div class="hero-content text-center">
                <div class="max-w-md flex flex-col gap-4">
                    <h1 class="text-5xl font-bold">"404"</h1>
                    <h2 class="text-2xl font-semibold">"Siden blev ikke fundet"</h2>
                    <p class="text-base-content/70">
                        "Vi kunne ikke finde siden, du ledte efter. Den kan være flyttet eller slettet."
                    </p>
                    <div class="flex justify-center gap-2">
                        <A href="/" attr:class="btn btn-primary">"Gå til forsiden"</A>
                        <A href="/jobsearch" attr:class="btn btn-outline">"Jobsøgning"</A>
                    </div>
                </div>
            </div>
        </div>
    }
}
