//! cloudapi: typed client libraries for the EC2 query API (with the AWS
//! extensions) and the GleSYS JSON API.
//!
//! EC2 requests are signed with AWS Signature Version 2 ([`auth`]) and
//! their XML responses are mapped to domain values by streaming handlers
//! ([`handlers`] on top of [`xml`]). Operations hang off [`Ec2Client`],
//! grouped by API area in [`features`]. [`glesys`] covers the GleSYS
//! server, IP and domain APIs.

pub mod auth;
pub mod client;
pub mod config;
pub mod domain;
pub mod errors;
pub mod features;
pub mod glesys;
pub mod handlers;
pub mod metrics;
pub mod options;
pub mod xml;

pub use client::{Ec2Client, FormRequest};
pub use errors::Ec2Error;
pub use glesys::{GlesysClient, GlesysError};
