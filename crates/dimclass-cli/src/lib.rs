//! Library side of the `dimclass` command-line tool.

pub mod logging;
pub mod run;
