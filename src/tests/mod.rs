//! Plugin system test suite
//!
//! Shared mock plugins plus per-area tests, kept alongside the modules they
//! exercise.


mod discovery_tests;
