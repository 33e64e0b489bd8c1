//! Run-time configuration of the command-line shell.
pub mod cmdline;
