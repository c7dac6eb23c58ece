//! Cache adapter test suite

mod redis_client_tests;
