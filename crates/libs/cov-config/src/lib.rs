//! Configuration management for covfetch.
//!
//! Provides types and utilities for describing defect service instances,
//! the fetch configuration and the stream whose defects are fetched.
//!
//! # Usage
//!
//! ```rust
//! use cov_config::CovUserConfig;
//!
//! let config = CovUserConfig::from_toml(
//!     r#"
//!     [global]
//!     version = "1.0.0"
//!
//!     [[instances]]
//!     name = "main"
//!     url = "https://coverity.example.com:8443"
//!     user = "committer"
//!
//!     [stream]
//!     instance = "main"
//!     project = "demo"
//!     stream = "demo-main"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.instance("main").unwrap().user, "committer");
//! ```

pub mod cov_config;
pub mod cov_instance;
pub mod cov_stream;
pub mod defect_filters;
pub mod error;
pub mod prelude;

pub use cov_config::{CovGlobalConfig, CovUserConfig, FetchConfiguration};
pub use cov_instance::CovInstance;
pub use cov_stream::StreamTarget;
pub use defect_filters::DefectFilters;
