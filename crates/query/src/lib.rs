//! EdPulse Query - Druid query execution for consumption metrics
//!
//! Builds parameterized analytics queries from named templates and executes
//! them against a Druid broker over its HTTP interface.
//!
//! # Usage
//!
//! ```ignore
//! use edpulse_query::{DruidClient, QueryTemplate, TemplateParams};
//!
//! let client = DruidClient::new("http://druid:8082/", 30)?;
//! let params = TemplateParams::new("prod.ed.app", "prod.ed.portal", &dates);
//! let body = QueryTemplate::ContentDownloads.render(&params);
//! let events = client.group_by(&body).await?;
//! ```

mod client;
mod error;
mod result;
mod template;

pub use client::{DruidClient, PAGINATION_ROW_LIMIT};
pub use error::QueryError;
pub use result::{float_field, int_field, str_field, EventTable};
pub use template::{QueryTemplate, TemplateParams};
