//! HR engine: payroll, attendance and leave accounting.
//!
//! This crate provides the business-rule core of an HR administration
//! system: clock-in/clock-out accounting with daily overtime, the leave
//! request workflow and leave balances, and payroll generation with a full
//! audit trace. Calculators in [`calculation`] are pure; [`service`] runs them
//! over the gateways in [`repository`].

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;
