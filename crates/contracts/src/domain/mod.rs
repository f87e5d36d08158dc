pub mod a001_newsletter_signup;
