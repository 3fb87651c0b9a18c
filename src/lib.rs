pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod extract;
pub mod i18n;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod response;
pub mod retry;
pub mod routes;
pub mod sanitize;
pub mod validation;
