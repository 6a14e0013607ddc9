//! Test helpers shared by the intake crates.

pub mod stub_server;

pub use stub_server::{RecordedRequest, StubResponse, StubServer};
