//! # Strata Search
//!
//! Request orchestration on top of the compiler, the search index and the
//! facet assembler, plus the layered configuration and logging setup the
//! binary uses.
//!
//! A request is compiled once with no statistics. When a numeric or date
//! range still lacks bounds, a rows-0 statistics prequery runs first and
//! the request is recompiled with what it returned. Any index failure
//! fails the whole request.

pub mod config;
mod error;
pub mod logging;
mod service;

pub use config::LoggingConfig;
pub use config::StrataConfig;
pub use error::ConfigError;
pub use error::Result;
pub use error::SearchError;
pub use logging::init_tracing;
pub use service::Plan;
pub use service::SearchService;
