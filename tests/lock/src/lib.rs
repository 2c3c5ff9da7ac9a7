//! Shared fixtures for the cross-crate lock tests.

#![forbid(unsafe_code)]

pub mod scenarios;
