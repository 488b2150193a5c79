// A wrapper around the `oxc_resolver` crate that resolves the way a browser-targeting package consumer does and
// keeps every resolution inside the project's `node_modules`.

mod resolver;

pub use crate::resolver::{ResolveReturn, Resolver};

pub use oxc_resolver::ResolveError;
