//! CLI Commands
//!
//! Every `execute` returns whether the run passed; `main` turns `false`
//! into exit code 1.

pub mod check;
pub mod render;
pub mod scan;
pub mod show;
