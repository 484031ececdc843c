use leptos::ev;
use leptos::prelude::*;

/// Button variant styles
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
    Ghost,
}

impl ButtonVariant {
    pub(crate) fn class(&self) -> &'static str {
        match self {
            ButtonVariant::Primary => "btn-primary",
            ButtonVariant::Secondary => "btn-secondary",
            ButtonVariant::Outline => "btn-outline",
            ButtonVariant::Ghost => "btn-ghost",
        }
    }
}

/// A styled button
#[component]
pub fn Button(
    /// The visual variant of the button
    #[prop(default = ButtonVariant::Primary)]
    variant: ButtonVariant,
    /// Click handler
    #[prop(into, optional)]
    on_click: Option<Callback<ev::MouseEvent>>,
    /// `button`, `submit` or `reset`
    #[prop(default = "button")]
    button_type: &'static str,
    /// Whether the button is disabled
    #[prop(into, default = false.into())]
    disabled: Signal<bool>,
    /// Additional CSS classes
    #[prop(into, optional)]
    class: String,
    /// Accessible label, for icon-only buttons
    #[prop(into, optional)]
    aria_label: Option<String>,
    /// Button content
    children: Children,
) -> impl IntoView {
    let full_class = format!("btn {} {class}", variant.class());

    let handle_click = move |evt: ev::MouseEvent| {
        if !disabled.get_untracked() {
            if let Some(callback) = on_click {
                callback.run(evt);
            }
        }
    };

    view! {
        <button
            type=button_type
            class=full_class
            on:click=handle_click
            disabled=move || disabled.get()
            aria-label=aria_label
        >
            {children()}
        </button>
    }
}
