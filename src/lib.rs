pub mod compose;
pub mod config;
pub mod data;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod handlers;
pub mod notify;
pub mod templates_structs;
