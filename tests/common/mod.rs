//! Test harness for end-to-end CLI tests.

pub mod harness;
