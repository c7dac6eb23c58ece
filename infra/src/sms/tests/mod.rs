//! SMS dispatcher test suite

mod mock_tests;
