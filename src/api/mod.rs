// Local JSON API over the catalog
pub mod handlers;
pub mod models;
pub mod routes;
