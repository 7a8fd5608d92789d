//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Token, username, and API base resolution tests
//! - `validation`: Event limit and ignore list validation tests

mod helpers;
