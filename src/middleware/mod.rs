//! Middleware module
//!
//! Contains Tower middleware wrapping the router.

pub mod fault_boundary;
