//! Identity token verification

mod token;

pub use token::{IdentityClaims, IdentityError, IdentityVerifier};
