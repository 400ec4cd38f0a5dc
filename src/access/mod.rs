//! Role-based access control.
//!
//! Every read and write path over task data goes through the single access
//! predicate in [`domain::AccessPolicy`]. Role capabilities live in a lookup
//! table keyed by [`domain::Role`].

pub mod domain;

#[cfg(test)]
mod tests;
