//! Unit test modules.

mod balance_test;
mod format_test;
mod route_test;
mod target_test;
