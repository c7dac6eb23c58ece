//! Unit tests for the device binding service
