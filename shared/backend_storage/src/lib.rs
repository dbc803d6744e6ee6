//! Backend storage services for the Mini App backend
//!
//! This crate provides the Dynamo DB backed user account store, plus an
//! in-memory store behind the `test-utils` feature.

pub mod user_account;
