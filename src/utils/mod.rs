//! Utility modules for the taskdeck core.
//!
//! This module contains common helpers used throughout the crate,
//! currently date/time parsing and formatting.

pub mod datetime;
