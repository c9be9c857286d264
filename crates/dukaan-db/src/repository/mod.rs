//! # Repository Module
//!
//! Database repository implementations for Dukaan.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.   │
//! │                                                                         │
//! │  Axum Handler                                                           │
//! │       │                                                                 │
//! │       │  db.products().list_by_code("basmati-rice-5kg")                 │
//! │       ▼                                                                 │
//! │  ProductRepository                                                      │
//! │  ├── list(&self)                                                        │
//! │  ├── get(&self, id)                                                     │
//! │  ├── insert(&self, new)                                                 │
//! │  └── update(&self, id, changes)                                         │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                         │
//! │  • SQL is isolated in one place                                         │
//! │  • Handlers stay thin                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`user::UserRepository`] - Account lookup and registration
//! - [`supplier::SupplierRepository`] - Supplier CRUD with product includes
//! - [`product::ProductRepository`] - Batch CRUD, by-code lookup, stock set
//! - [`transaction::TransactionRepository`] - Sales, stock sums, summaries

pub mod product;
pub mod supplier;
pub mod transaction;
pub mod user;
