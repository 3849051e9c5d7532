//! History extraction: git subprocess invocation, log parsing, and
//! assembly of the correlation snapshot.

pub mod extract;
pub mod log;
