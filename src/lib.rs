//! Lead Finder API Library
//!
//! This library provides the core functionality for the Lead Finder API:
//! tiered people search over Apollo, AI-backed record enrichment, a
//! persisted curation store, and an offline spreadsheet filter engine.
//!
//! # Modules
//!
//! - `apollo`: Apollo people-search client.
//! - `catalog`: Closed industry and employee-bucket vocabularies.
//! - `config`: Configuration management.
//! - `enrichment`: Batch employee-count enrichment.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `integrity`: Checksummed snapshot envelope.
//! - `models`: Core data models.
//! - `normalizer`: Raw person payloads to normalized leads.
//! - `offline`: Offline spreadsheet-row filter engine.
//! - `openai`: AI enrichment client.
//! - `search`: Tiered search orchestration.
//! - `store`: Saved-lead curation store.
//! - `synonyms`: Bilingual job-title synonym table.
//! - `variations`: Job-title variation generation.

pub mod apollo;
pub mod catalog;
pub mod config;
pub mod enrichment;
pub mod errors;
pub mod handlers;
pub mod integrity;
pub mod models;
pub mod normalizer;
pub mod offline;
pub mod openai;
pub mod search;
pub mod store;
pub mod synonyms;
pub mod variations;
