//! Vanilla Connector Core - Shared types library.
//!
//! This crate provides common types used across all Vanilla Connector components:
//! - `storefront` - Storefront API client, cart session and product listing page
//! - `cli` - Command-line front end for listing products and adding to cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps it
//! lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for Shopify global IDs and money amounts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
