//! Crash scenarios, one module per persist phase

mod persist;
