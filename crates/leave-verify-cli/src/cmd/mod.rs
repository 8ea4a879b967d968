pub mod config;
pub mod pending;
pub mod run;
