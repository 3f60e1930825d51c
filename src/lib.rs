//! Scan a movie library, look each title up in an OMDb-style catalog and
//! collect the results into a JSON sidecar.

pub mod catalog;
pub mod config;
pub mod library;
pub mod models;
pub mod thumbnail;
pub mod title;
