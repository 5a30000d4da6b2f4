//! Declarative byte-layout schemas and their bound instances.
//!
//! A schema is a static tree: [`field::Field`] leaves of fixed length and
//! [`group::FieldGroup`] nodes whose offsets derive from their children's
//! lengths. A [`structure::Structure`] binds a schema to bytes read from a
//! [`source::ByteSource`] and supports description, indexed access,
//! [`path::Path`] navigation, and dereferencing of link fields.
//!
//! Start with [`structure::Structure::from_offset`].

pub mod field;
pub mod format;
pub mod group;
pub mod interpret;
pub mod path;
pub mod source;
pub mod structure;
