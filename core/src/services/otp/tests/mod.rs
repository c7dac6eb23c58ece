//! Unit tests for the OTP challenge module

mod mocks;
mod service_tests;
