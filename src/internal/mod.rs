//! Internal implementation details.

pub(crate) mod teardown;

pub(crate) use teardown::{BoxFutureUnit, TeardownBag};
