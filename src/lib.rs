//! kolada_rs
//!
//! A lightweight Rust library for retrieving Swedish municipality KPI data from
//! the Kolada API, comparing it across years, and writing CSV reports. Pairs
//! with the `kolada` CLI.
//!
//! ### Features
//! - Fetch all KPI values for a municipality and year, following pagination
//! - Reduce gender-segmented values to one value per KPI (total preferred)
//! - Percent and numeric change between years
//! - Trend, delta-listing and cross-municipality summary reports as CSV
//!
//! ### Example
//! ```no_run
//! use kolada_rs::{Client, MetadataResolver, pipeline, storage};
//!
//! let client = Client::new()?;
//! let mut meta = MetadataResolver::new(&client);
//! let table = pipeline::municipality_trend(&client, &mut meta, "1860", &[2009, 2010, 2011])?;
//! storage::save_table(&table, "1860_Laxå.csv")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod change;
pub mod config;
pub mod extract;
pub mod metadata;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod storage;

pub use api::{Client, HttpResponse, Transport};
pub use change::{ChangeRecord, numeric_change, percent_change};
pub use extract::{KpiValueMap, extract};
pub use metadata::{MetadataCache, MetadataResolver, MetadataSource};
pub use models::{KpiMetadata, KpiValue, Municipality, RawKpiRecord};
pub use report::Table;
