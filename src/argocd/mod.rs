//! # Argo CD
//!
//! Client for the Argo CD REST API.
//!
//! - `client`: session authentication and the bearer-authenticated calls
//! - `types`: tolerant request/response structures

mod client;
pub mod types;

pub use client::{ArgoClient, Session};
pub use types::{Application, ApplicationList, ResourceNode, ResourceTree};
