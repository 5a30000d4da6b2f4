//! Leaf schema nodes.
//!
//! A [`Field`] is a fixed number of bytes with a label and a display
//! [`Formatter`]. A field may also carry a [`Link`]: its raw bytes then double
//! as a pointer to another structure elsewhere in the image, decoded with the
//! link's target schema at the offset its [`Interpreter`] computes.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::layout::format::{Filler, Formatter, Hex, UInt};
use crate::layout::group::FieldGroup;
use crate::layout::interpret::Interpreter;

/// Pointer descriptor: the schema to decode and where to find it.
///
/// Both halves are always present; a field without a link simply has no
/// `Link`.
#[derive(Clone)]
pub struct Link {
    target: Arc<FieldGroup>,
    interpreter: Arc<dyn Interpreter>,
}

impl Link {
    pub fn new(target: Arc<FieldGroup>, interpreter: impl Interpreter + 'static) -> Self {
        Link {
            target,
            interpreter: Arc::new(interpreter),
        }
    }

    /// Schema of the structure this link points at.
    pub fn target(&self) -> &FieldGroup {
        &self.target
    }

    /// Absolute offset encoded in `raw`, if representable.
    pub fn resolve(&self, raw: &[u8]) -> Option<u64> {
        self.interpreter.offset(raw)
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("target", &self.target.description())
            .finish_non_exhaustive()
    }
}

/// Fixed-length leaf of a schema tree.
#[derive(Clone)]
pub struct Field {
    description: Cow<'static, str>,
    length: usize,
    formatter: Arc<dyn Formatter>,
    link: Option<Link>,
}

impl Field {
    /// Create a field of `length` bytes rendered with `formatter`.
    ///
    /// # Panics
    ///
    /// Panics if `length` is zero. Field lengths are part of static schema
    /// definitions, so a zero length is a programming error.
    pub fn new(
        description: impl Into<Cow<'static, str>>,
        length: usize,
        formatter: impl Formatter + 'static,
    ) -> Self {
        assert!(length > 0, "field length must be non-zero");
        Field {
            description: description.into(),
            length,
            formatter: Arc::new(formatter),
            link: None,
        }
    }

    /// Little-endian unsigned integer field.
    pub fn le(description: impl Into<Cow<'static, str>>, length: usize) -> Self {
        Field::new(description, length, UInt::LITTLE)
    }

    /// Big-endian unsigned integer field.
    pub fn be(description: impl Into<Cow<'static, str>>, length: usize) -> Self {
        Field::new(description, length, UInt::BIG)
    }

    /// Hex field, elided when long.
    pub fn hex(description: impl Into<Cow<'static, str>>, length: usize) -> Self {
        Field::new(description, length, Hex::ELIDED)
    }

    /// Reserved or padding bytes.
    pub fn filler(description: impl Into<Cow<'static, str>>, length: usize) -> Self {
        Field::new(description, length, Filler)
    }

    /// Attach a link, making this field dereferenceable.
    pub fn with_link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn link(&self) -> Option<&Link> {
        self.link.as_ref()
    }

    pub fn is_link(&self) -> bool {
        self.link.is_some()
    }

    /// Render raw bytes for display. Never fails.
    pub fn format(&self, raw: &[u8]) -> String {
        self.formatter.format(raw)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("description", &self.description)
            .field("length", &self.length)
            .field("link", &self.link)
            .finish_non_exhaustive()
    }
}
