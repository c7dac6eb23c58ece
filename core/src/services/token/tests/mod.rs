//! Token service test suite

mod service_tests;
