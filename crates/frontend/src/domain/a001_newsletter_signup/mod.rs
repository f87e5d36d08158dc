pub mod capture;
pub mod ui;
