use leptos::prelude::*;

/// A styled card container
#[component]
pub fn Card(
    /// Additional CSS classes
    #[prop(into, optional)]
    class: String,
    children: Children,
) -> impl IntoView {
    let full_class = format!("card bg-base-100 shadow border border-base-300 {class}");

    view! {
        <div class=full_class>
            {children()}
        </div>
    }
}

/// Card body section with padding
#[component]
pub fn CardBody(
    #[prop(into, optional)]
    class: String,
    children: Children,
) -> impl IntoView {
    let full_class = format!("card-body {class}");

    view! {
        <div class=full_class>
            {children()}
        </div>
    }
}
