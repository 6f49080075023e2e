//! Terminal plotting for the text front-end.

pub mod ascii;

pub use ascii::*;
