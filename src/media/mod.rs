//! Media module for kind classification.

pub mod kind;

pub use kind::MediaKind;
