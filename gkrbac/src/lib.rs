//! Role-based access control enforcement.
//!
//! The entry point is the [`Builder`], which compiles a model and
//! loads a policy store into an [`Enforcer`].  The enforcer answers
//! `enforce(sub, obj, act)` queries against its currently active
//! (model, store) pair, which may be atomically swapped wholesale for
//! a reload without blocking readers.

pub mod error;

mod builder;
mod enforcer;
mod eval;

pub use builder::{Builder, DEFAULT_MODEL};
pub use enforcer::Enforcer;
