use leptos::prelude::*;

/// Button component with variants (primary, outline)
#[component]
pub fn Button(
    /// Button variant: "primary" (default) or "outline"
    #[prop(optional, into)]
    variant: Option<String>,
    /// Button type attribute
    #[prop(optional, into)]
    button_type: Option<String>,
    /// Disabled state (reactive)
    #[prop(into, default = Signal::stored(false))]
    disabled: Signal<bool>,
    /// Click event handler
    #[prop(optional)]
    on_click: Option<Callback<leptos::ev::MouseEvent>>,
    children: Children,
) -> impl IntoView {
    let variant_class = match variant.as_deref().unwrap_or("primary") {
        "outline" => "button--outline",
        _ => "button--primary",
    };
    let btn_type = button_type.unwrap_or_else(|| "button".to_string());

    view! {
        <button
            type=btn_type
            class=format!("button {}", variant_class)
            disabled=move || disabled.get()
            on:click=move |ev| {
                if let Some(handler) = on_click {
                    handler.run(ev);
                }
            }
        >
            {children()}
        </button>
    }
}
