pub mod api;
pub mod auth;
pub mod compat;
pub mod doc_store;
pub mod domain;
pub mod utils;
