//! # dukaan-db: Database Layer for Dukaan
//!
//! This crate provides database access for the Dukaan inventory and sales
//! service. It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Dukaan Data Flow                                │
//! │                                                                         │
//! │  Axum Handler (create_transaction)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     dukaan-db (THIS CRATE)                      │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │    │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │    │    │
//! │  │   │   (pool.rs)   │    │ (user.rs ...) │    │  (embedded)  │    │    │
//! │  │   │               │    │               │    │              │    │    │
//! │  │   │ SqlitePool    │◄───│ UserRepo      │    │ 001_init.sql │    │    │
//! │  │   │ Connection    │    │ SupplierRepo  │    │              │    │    │
//! │  │   │ Management    │    │ ProductRepo   │    │              │    │    │
//! │  │   │               │    │ TransactionR. │    │              │    │    │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘    │    │
//! │  │                                                                 │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │                       SQLite Database (dukaan.db)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dukaan_db::{Database, DbConfig};
//!
//! let config = DbConfig::new("path/to/dukaan.db");
//! let db = Database::new(config).await?;
//!
//! let suppliers = db.suppliers().list_with_products().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::product::{NewProduct, ProductRepository};
pub use repository::supplier::{SupplierChanges, SupplierRepository};
pub use repository::transaction::{
    HydratedTransaction, SaleParticipant, SalesSummary, TopProduct, TransactionRepository,
};
pub use repository::user::{NewUser, UserRepository};
