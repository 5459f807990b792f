//! Reusable HTML components for help pages
//!
//! Maud component functions shared by the static site builder and the
//! standalone render output.

pub mod layout;
pub mod nav;
