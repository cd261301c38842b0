// Library root module for ultra-router
// This file defines the public API and module structure for the ultra-router library
// It exports the main functionality that can be used by other crates
//
// Numan Thabit 2025 Nov

pub mod amount;
pub mod catalog;
pub mod config;
pub mod control;
pub mod errors;
pub mod metrics;
pub mod router;
pub mod venues;
