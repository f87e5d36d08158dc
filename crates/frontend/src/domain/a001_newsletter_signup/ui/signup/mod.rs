//! Newsletter signup card
//!
//! MVVM split:
//! - state.rs: phase transitions (pure, unit-tested)
//! - view_model.rs: signals, script lifecycle and submit commands
//! - view.rs: Leptos component (pure UI)

mod state;
mod view;
mod view_model;

pub use state::{SignupPhase, SignupState};
pub use view::NewsletterForm;
pub use view_model::SignupViewModel;
