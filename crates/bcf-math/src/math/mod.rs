//! Core math modules.

pub mod beta;
pub mod conjugate;
pub mod stable;
