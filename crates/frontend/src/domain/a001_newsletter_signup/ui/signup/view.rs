use super::view_model::{read_form, SignupViewModel};
use crate::shared::components::ui::{Button, Checkbox, Input};
use crate::shared::config::CaptureSettings;
use crate::shared::icons::icon;
use leptos::html;
use leptos::prelude::*;
use thaw::{Card, Spinner};

#[component]
pub fn NewsletterForm() -> impl IntoView {
    let settings = use_context::<CaptureSettings>().unwrap_or_default();
    let vm = SignupViewModel::new(settings);
    let form_ref = NodeRef::<html::Form>::new();

    // Script tag is tied to this component; the element wait is not cancelled
    let lease = StoredValue::new_local(vm.start_integration());
    on_cleanup(move || {
        lease.update_value(|lease| {
            if let Some(lease) = lease.take() {
                lease.release();
            }
        });
    });

    // Runs after the capturing vendor listener on the same submit event
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if let Some(form) = form_ref.get() {
            vm.submit_command(read_form(&form));
        }
    };

    let on_reset = Callback::new(move |_| {
        if let Some(form) = form_ref.get() {
            form.reset();
        }
        vm.reset_command();
    });

    let is_loading = Signal::derive(move || vm.state.get().is_loading());
    let is_submitted = move || vm.state.get().is_submitted();

    // The form stays mounted while the thank-you card is shown so the
    // vendor listener bound to it keeps working for the next signup
    view! {
        <Card attr:class="newsletter-card">
            <div class=move || {
                if is_submitted() {
                    "newsletter-card__body newsletter-card__body--hidden"
                } else {
                    "newsletter-card__body"
                }
            }>
                <div class="newsletter-card__header">
                    <h2 class="newsletter-card__title">"Newsletter Signup"</h2>
                    <p class="newsletter-card__subtitle">
                        "Stay updated with our latest news and updates"
                    </p>
                </div>

                <form id=vm.form_id() class="newsletter-form" node_ref=form_ref on:submit=on_submit>
                    <Input
                        label="First Name"
                        name="firstName"
                        placeholder="Enter your first name"
                        autocomplete="given-name"
                        required=true
                    />
                    <Input
                        label="Last Name"
                        name="lastName"
                        placeholder="Enter your last name"
                        autocomplete="family-name"
                        required=true
                    />
                    <Input
                        label="Email Address"
                        name="email"
                        input_type="email"
                        placeholder="Enter your email address"
                        autocomplete="email"
                        required=true
                    />

                    <Checkbox name="newsletter">
                        "I would like to subscribe to the newsletter and receive updates about new content, promotions, and company news."
                    </Checkbox>

                    <Button button_type="submit" disabled=is_loading>
                        {move || if is_loading.get() {
                            view! { <Spinner /> "Subscribing..." }.into_any()
                        } else {
                            view! { "Subscribe Now" }.into_any()
                        }}
                    </Button>
                </form>

                <Show when=move || !vm.state.get().integration_ready>
                    <p class="newsletter-card__hint">"Loading form integration..."</p>
                </Show>
            </div>

            <Show when=is_submitted>
                <div class="newsletter-card__thanks">
                    <div class="newsletter-card__check">{icon("check")}</div>
                    <h2 class="newsletter-card__title">"Thank You!"</h2>
                    <p class="newsletter-card__subtitle">
                        "Your subscription has been successfully submitted. You'll start receiving our newsletter soon!"
                    </p>
                    <Button variant="outline" on_click=on_reset>
                        "Subscribe Another Email"
                    </Button>
                </div>
            </Show>
        </Card>
    }
}
