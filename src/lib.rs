pub mod accounts;
pub mod admin;
pub mod fetcher;
pub mod ingest;
pub mod store;
