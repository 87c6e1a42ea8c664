//! # Equipment Interface
//!
//! This module defines the interface structures which are exchanged with the hardware
//! collaborators.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod drive;
