use contracts::domain::a001_newsletter_signup::SignupForm;

/// Where the visitor is in the signup flow.
///
/// Loading and submitted are phases of one enum, so they can never be set
/// at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignupPhase {
    #[default]
    Editing,
    Submitting,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignupState {
    pub phase: SignupPhase,
    /// Vendor script loaded; only drives the "Loading form integration" hint
    pub integration_ready: bool,
}

impl SignupState {
    pub fn is_loading(&self) -> bool {
        self.phase == SignupPhase::Submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == SignupPhase::Submitted
    }

    /// Start the local submit. Returns false when nothing should happen:
    /// a required field is empty or a submit is already running.
    pub fn begin_submit(&mut self, form: &SignupForm) -> bool {
        if self.phase != SignupPhase::Editing || !form.is_submittable() {
            return false;
        }
        self.phase = SignupPhase::Submitting;
        true
    }

    /// Local delay elapsed. The remote outcome is not consulted.
    pub fn complete(&mut self) -> bool {
        if self.phase != SignupPhase::Submitting {
            return false;
        }
        self.phase = SignupPhase::Submitted;
        true
    }

    /// "Subscribe another email"
    pub fn reset(&mut self) -> bool {
        if self.phase != SignupPhase::Submitted {
            return false;
        }
        self.phase = SignupPhase::Editing;
        true
    }
}
