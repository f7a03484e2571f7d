//! Sv39 kernel address-space layout.
//!
//! Fixed virtual and physical layout shared by the page-table builder, trap
//! entry and exit, the frame allocator and the process allocator, plus the
//! `mstatus` field masks used across privilege-mode switches.

#![cfg_attr(not(test), no_std)]

pub mod consts;
pub mod error;
pub mod logging;
pub mod memory;

pub use error::{LayoutError, LayoutResult};
