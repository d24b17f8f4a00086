//! Retail portfolio (carteira PF) decision engine.
//!
//! Raw product rows are folded into one record per client, classified into a
//! farol status (Verde / Vermelho / Cinza) with the reasons behind it, and
//! annotated with a credit eligibility flag and a 0-100 outreach priority.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
