use leptos::prelude::*;

/// Labelled native input.
///
/// The input is uncontrolled: its value lives in the DOM so the form-capture
/// script can serialize it by `name`.
#[component]
pub fn Input(
    /// Label text
    #[prop(into)]
    label: String,
    /// `name` and `id` of the input element
    #[prop(into)]
    name: String,
    /// Input type: "text" (default), "email", etc.
    #[prop(optional, into)]
    input_type: Option<String>,
    /// Placeholder text
    #[prop(optional, into)]
    placeholder: Option<String>,
    /// Required attribute, also renders the asterisk marker
    #[prop(optional)]
    required: bool,
    /// Autocomplete attribute
    #[prop(optional, into)]
    autocomplete: Option<String>,
) -> impl IntoView {
    let input_t = input_type.unwrap_or_else(|| "text".to_string());

    view! {
        <div class="form__group">
            <label class="form__label" for=name.clone()>
                {label}
                {required.then(|| view! { <span class="form__required">" *"</span> })}
            </label>
            <input
                id=name.clone()
                name=name
                class="form__input"
                type=input_t
                placeholder=placeholder.unwrap_or_default()
                required=required
                autocomplete=autocomplete.unwrap_or_default()
            />
        </div>
    }
}
