//! Donation intake wizard.
//!
//! A three-step state machine over a [`session::WizardSession`]: an intro
//! step, donor details (search, selection, then person and donor writes),
//! and garment entry with a final batch submission. [`controller::WizardController`] performs the
//! guarded transitions through an
//! [`IntakeBackend`](intake_core::backend::IntakeBackend).

pub mod controller;
pub mod notify;
pub mod registration;
pub mod selection;
pub mod session;
pub mod step;
pub mod validation;
