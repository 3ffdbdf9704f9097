//! Task API Library
//!
//! A small HTTP service for creating, listing, reading, replacing and
//! deleting tasks stored in `PostgreSQL`.
//!
//! - `domain`: task values and due date parsing
//! - `infrastructure`: repository trait, backends and configuration
//! - `api`: handlers, DTOs, error responses and routing

pub mod api;
pub mod domain;
pub mod infrastructure;
