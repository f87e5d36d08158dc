use super::state::SignupState;
use crate::domain::a001_newsletter_signup::capture::{CaptureError, D365FormCapture, FormCaptureAdapter};
use crate::shared::config::CaptureSettings;
use crate::shared::external_script::{page_loader, ScriptLease, ScriptResource, ScriptStatus};
use contracts::domain::a001_newsletter_signup::SignupForm;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;
use wasm_bindgen::JsCast;
use web_sys::{HtmlFormElement, HtmlInputElement};

/// ViewModel for the newsletter signup card
#[derive(Clone, Copy)]
pub struct SignupViewModel {
    pub state: RwSignal<SignupState>,
    settings: StoredValue<CaptureSettings>,
}

impl SignupViewModel {
    pub fn new(settings: CaptureSettings) -> Self {
        Self {
            state: RwSignal::new(SignupState::default()),
            settings: StoredValue::new(settings),
        }
    }

    pub fn form_id(&self) -> String {
        self.settings.with_value(|s| s.form_id().to_string())
    }

    /// Load the vendor script and bind the form once it is available.
    ///
    /// The returned lease keeps the script tag in the page; drop it on unmount.
    pub fn start_integration(&self) -> Option<ScriptLease> {
        let settings = self.settings.get_value();
        let resource = ScriptResource::new(&settings.script_element_id, &settings.script_url);
        let state = self.state;

        let on_settled = move |status: ScriptStatus| match status {
            ScriptStatus::Loaded => {
                state.update(|s| s.integration_ready = true);
                match D365FormCapture::from_window()
                    .and_then(|capture| FormCaptureAdapter::new(capture, &settings))
                {
                    Ok(adapter) => spawn_local(adapter.run()),
                    Err(e) => log::error!("Error initializing form capture: {}", e),
                }
            }
            _ => log::error!(
                "Error initializing form capture: {}",
                CaptureError::script(format!("{} failed to load", settings.script_url))
            ),
        };

        match page_loader().acquire(&resource, on_settled) {
            Ok(lease) => Some(lease),
            Err(e) => {
                log::error!("Error initializing form capture: {}", CaptureError::script(e));
                None
            }
        }
    }

    /// Local submit: show the spinner, wait, then show the thank-you card
    pub fn submit_command(&self, form: SignupForm) {
        let delay_ms = self.settings.with_value(|s| s.submit_delay_ms);
        let missing = form.missing_required();
        match local_submit(self.state, form, delay_ms, TimeoutFuture::new) {
            Some(rest) => spawn_local(rest),
            None => log::debug!("submit ignored, missing: {:?}", missing),
        }
    }

    pub fn reset_command(&self) {
        self.state.update(|s| {
            s.reset();
        });
    }
}

/// Where `local_submit` keeps the signup state
pub trait SignupStore {
    fn modify<R>(&self, f: impl FnOnce(&mut SignupState) -> R) -> Option<R>;
}

impl SignupStore for RwSignal<SignupState> {
    fn modify<R>(&self, f: impl FnOnce(&mut SignupState) -> R) -> Option<R> {
        self.try_update(f)
    }
}

/// Moves `store` to submitting and returns the remainder of the submit:
/// await `delay(delay_ms)`, then complete. `None` if the submit was refused.
pub fn local_submit<S, D, F>(
    store: S,
    form: SignupForm,
    delay_ms: u32,
    delay: D,
) -> Option<impl Future<Output = ()>>
where
    S: SignupStore,
    D: FnOnce(u32) -> F,
    F: Future<Output = ()>,
{
    if !store.modify(|s| s.begin_submit(&form)).unwrap_or(false) {
        return None;
    }
    let wait = delay(delay_ms);
    Some(async move {
        wait.await;
        store.modify(|s| {
            s.complete();
        });
    })
}

/// Current values of the signup inputs
pub fn read_form(form: &HtmlFormElement) -> SignupForm {
    let input = |name: &str| {
        form.query_selector(&format!("[name=\"{}\"]", name))
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    };
    let text = |name: &str| input(name).map(|el| el.value()).unwrap_or_default();

    SignupForm {
        first_name: text("firstName"),
        last_name: text("lastName"),
        email: text("email"),
        newsletter: input("newsletter").map(|el| el.checked()).unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::state::SignupPhase;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    impl SignupStore for Rc<RefCell<SignupState>> {
        fn modify<R>(&self, f: impl FnOnce(&mut SignupState) -> R) -> Option<R> {
            Some(f(&mut self.borrow_mut()))
        }
    }

    fn filled() -> SignupForm {
        SignupForm {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: "grace@example.com".into(),
            newsletter: false,
        }
    }

    #[test]
    fn test_submit_waits_for_configured_delay() {
        let settings = CaptureSettings {
            submit_delay_ms: 250,
            ..CaptureSettings::default()
        };
        let store = Rc::new(RefCell::new(SignupState::default()));
        let requested = Rc::new(Cell::new(None));

        let seen = requested.clone();
        let during = store.clone();
        let rest = local_submit(store.clone(), filled(), settings.submit_delay_ms, move |ms| {
            seen.set(Some(ms));
            async move {
                assert_eq!(during.borrow().phase, SignupPhase::Submitting);
            }
        })
        .expect("submit should start");

        assert_eq!(requested.get(), Some(250));
        assert!(store.borrow().is_loading());

        block_on(rest);
        assert!(store.borrow().is_submitted());
        assert!(!store.borrow().is_loading());
    }

    #[test]
    fn test_submit_refused_while_running() {
        let store = Rc::new(RefCell::new(SignupState::default()));
        let _first = local_submit(store.clone(), filled(), 0, |_| async {}).expect("first submit");

        let called = Rc::new(Cell::new(false));
        let flag = called.clone();
        let second = local_submit(store.clone(), filled(), 0, move |_| {
            flag.set(true);
            async {}
        });
        assert!(second.is_none());
        assert!(!called.get());
        assert_eq!(store.borrow().phase, SignupPhase::Submitting);
    }
}
