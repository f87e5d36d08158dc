pub mod components;
pub mod config;
pub mod external_script;
pub mod icons;
