//! Decision logic for the homework status notifier.
//!
//! Each cycle's payload flows validator → differ → formatter; the catalog
//! backs the formatter. Nothing in this crate performs I/O.

pub mod catalog;
pub mod differ;
pub mod formatter;
pub mod validator;
