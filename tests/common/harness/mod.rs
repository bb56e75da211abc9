//! Shared harness: isolated environments and a fluent command wrapper.

mod env;

pub use command::QbankCommand;
pub use env::TestEnv;
