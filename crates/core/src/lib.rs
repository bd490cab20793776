//! Domain types for the donation intake wizard.
//!
//! Holds the garment type schema, the garment entry sub-form, the donor
//! form, and the [`backend::IntakeBackend`] port the wizard writes through.
//! Nothing in this crate touches the network.

pub mod backend;
pub mod donor;
pub mod error;
pub mod form;
pub mod garment_entry;
pub mod garment_schema;
pub mod types;
