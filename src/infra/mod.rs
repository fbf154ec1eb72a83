//! Infrastructure adapters and runtime bootstrap.

pub mod appwrite;
pub mod error;
pub mod http;
pub mod telemetry;
