//! Auth-domain identifiers and caller-supplied token material.

pub mod id;
pub mod token;

pub use id::*;
pub use token::*;
