// sqlrun-core/src/lib.rs

// 1. Documentation is not enforced yet
#![allow(missing_docs)]

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Database contracts: Connector + ResultCursor.
pub mod ports;

// 2. Domain
// Scripts, result sets, outcomes, verdict, settings.
// Depends on nothing else (neither infra nor app).
pub mod domain;

// 3. Infrastructure (Adapters)
// Postgres, DuckDB, script sources, SQL validator, config files.
pub mod infrastructure;

// 4. Application (Use Cases)
// Executor, Materializer, Batch orchestration, run report.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::SqlRunError;
