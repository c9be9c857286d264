//! # dukaan-core: Pure Business Logic for Dukaan
//!
//! This crate is the **heart** of Dukaan, a multi-tenant inventory and
//! sales-tracking service. It contains all business logic as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Dukaan Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                 Web Frontend (TypeScript)                       │    │
//! │  │    Products UI ──► Suppliers UI ──► Sales UI ──► Dashboard      │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │ REST (JSON + bearer token)             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                    apps/api (axum handlers)                     │    │
//! │  │    register, login, product CRUD, create_transaction, ...       │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │               ★ dukaan-core (THIS CRATE) ★                      │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌────────────┐   │    │
//! │  │   │   types   │  │   money   │  │   stock   │  │ validation │   │    │
//! │  │   │  Product  │  │   Money   │  │ available │  │   rules    │   │    │
//! │  │   │   User    │  │  (cents)  │  │   check   │  │   checks   │   │    │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └────────────┘   │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                    dukaan-db (Database Layer)                   │    │
//! │  │              SQLite queries, migrations, repositories           │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Supplier, Product, Transaction)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`product_code`] - SKU → product-code slug derivation
//! - [`stock`] - Available-stock arithmetic and the sale stock check
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod product_code;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use dukaan_core::Money` instead of
// `use dukaan_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use product_code::derive_product_code;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 8;
