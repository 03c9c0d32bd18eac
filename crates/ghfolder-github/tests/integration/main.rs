//! Integration tests for ghfolder-github
//!
//! Uses wiremock to simulate the GitHub REST API and verifies end-to-end
//! behavior of the client and the port implementations.

mod common;

mod test_download;
mod test_listing;
