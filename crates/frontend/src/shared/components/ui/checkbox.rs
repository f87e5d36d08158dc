use leptos::prelude::*;

/// Native checkbox with a clickable label.
///
/// Uncontrolled like [`super::Input`]; read it from the form on submit.
#[component]
pub fn Checkbox(
    /// `name` and `id` of the checkbox element
    #[prop(into)]
    name: String,
    /// Label content
    children: Children,
) -> impl IntoView {
    view! {
        <div class="form__checkbox-wrapper">
            <input
                id=name.clone()
                name=name.clone()
                type="checkbox"
                class="form__checkbox"
            />
            <label class="form__checkbox-label" for=name>
                {children()}
            </label>
        </div>
    }
}
