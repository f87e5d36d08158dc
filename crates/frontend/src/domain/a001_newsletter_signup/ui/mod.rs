pub mod signup;

pub use signup::NewsletterForm;
