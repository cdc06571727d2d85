//! Command handlers

pub(crate) mod build_ext;
pub(crate) mod metadata;
