//! Service layer for the match function
//!
//! The boundary a transport calls with raw JSON rule payloads. Each call
//! parses its rules once and owns everything it allocates.

pub mod function;

pub use function::MatchFunctionService;
