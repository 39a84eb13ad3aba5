//! Library facade for the `container-suseconnect` binary so integration tests
//! can reuse the CLI, logging and product-fetch helpers.

pub mod cli;
pub mod error;
pub mod logging;
pub mod products;
