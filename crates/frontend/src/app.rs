use crate::domain::a001_newsletter_signup::ui::NewsletterForm;
use crate::shared::config::CaptureSettings;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // Settings come from the host page (or defaults) once per page view.
    provide_context(CaptureSettings::load());

    view! {
        <main class="newsletter-page">
            <div class="newsletter-page__content">
                <NewsletterForm />
            </div>
        </main>
    }
}
