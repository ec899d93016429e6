pub mod config;
pub mod errors;
pub mod ingest;
pub mod matching;
pub mod models;
pub mod review;
pub mod routes;
pub mod scoring;
pub mod state;
