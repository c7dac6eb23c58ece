//! Database adapter test suite

mod connection_tests;
