//! Error types and result aliases for Halo.
//!
//! Every fallible operation in the workspace returns [`HaloResult`]. Errors are
//! local to the partition that produced them; the first failure of any
//! partition fails the enclosing transformation.

mod error;

pub use error::{HaloError, HaloResult};
