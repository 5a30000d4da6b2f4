//! Schemas bound to bytes.
//!
//! A [`Structure`] pairs a schema node with the exact byte range it describes
//! in a [`ByteSource`]. Root structures are read from an explicit offset;
//! every other structure is derived from an existing one:
//!
//! - [`index`](Structure::index) narrows to one child, slicing the bytes the
//!   parent already holds (no new read);
//! - [`sub_struct`](Structure::sub_struct) folds `index` over a [`Path`];
//! - [`dereference`](Structure::dereference) interprets a link field's bytes
//!   as an offset and decodes the link's target schema there, anywhere in the
//!   source.
//!
//! Structures borrow both their schema and their bytes, so the source (for
//! example a memory map) provably outlives all of them. They are never
//! mutated and carry no state beyond the binding itself.

use std::fmt;

use crate::layout::field::Field;
use crate::layout::group::{Body, Description, FieldGroup, Node};
use crate::layout::path::Path;
use crate::layout::source::ByteSource;
use crate::FsvisError;

/// The schema node a structure is bound to.
///
/// Roots and nested groups bind a [`FieldGroup`]; indexing into a terminal
/// child yields a single-field binding.
#[derive(Debug, Clone, Copy)]
pub enum Schema<'a> {
    Group(&'a FieldGroup),
    Field(&'a Field),
}

impl<'a> Schema<'a> {
    pub fn description(&self) -> &'a str {
        match *self {
            Schema::Group(group) => group.description(),
            Schema::Field(field) => field.description(),
        }
    }

    pub fn length(&self) -> usize {
        match self {
            Schema::Group(group) => group.length(),
            Schema::Field(field) => field.length(),
        }
    }

    fn same_node(&self, other: &Schema<'_>) -> bool {
        match (self, other) {
            (Schema::Group(a), Schema::Group(b)) => std::ptr::eq(*a, *b),
            (Schema::Field(a), Schema::Field(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }
}

impl<'a> From<&'a Node> for Schema<'a> {
    fn from(node: &'a Node) -> Self {
        match node {
            Node::Field(field) => Schema::Field(field),
            Node::Group(group) => Schema::Group(group),
        }
    }
}

/// A schema node bound to a concrete byte range of a source.
#[derive(Clone)]
pub struct Structure<'a> {
    schema: Schema<'a>,
    source: &'a dyn ByteSource,
    offset: u64,
    content: &'a [u8],
    path: Path,
}

impl<'a> Structure<'a> {
    /// Read `schema.length()` bytes at `offset` and bind them to `schema`.
    ///
    /// Fails with [`FsvisError::OutOfRange`] if the range runs past the end
    /// of the source.
    pub fn from_offset(
        schema: &'a FieldGroup,
        source: &'a dyn ByteSource,
        offset: u64,
    ) -> Result<Self, FsvisError> {
        let content = source.read(offset, schema.length())?;
        log::debug!(
            "bound {:?} to {} bytes at offset {}",
            schema.description(),
            content.len(),
            offset
        );
        Ok(Structure {
            schema: Schema::Group(schema),
            source,
            offset,
            content,
            path: Path::root(),
        })
    }

    /// Bind an already-materialized byte range to an explicit schema.
    ///
    /// `content` is the range starting at `offset` in `source`; only its first
    /// `schema.length()` bytes are kept. The schema may be ad hoc, built just
    /// for this call. Fails with [`FsvisError::OutOfRange`] if `content` is
    /// shorter than the schema.
    ///
    /// `content` must equal the source's bytes at `offset`, otherwise the
    /// reported offsets and later dereferences disagree with the bytes shown.
    /// Debug builds assert this.
    pub fn from_bytes(
        schema: &'a FieldGroup,
        source: &'a dyn ByteSource,
        content: &'a [u8],
        offset: u64,
    ) -> Result<Self, FsvisError> {
        if content.len() < schema.length() {
            return Err(FsvisError::OutOfRange {
                offset,
                length: schema.length() as u64,
                size: content.len() as u64,
            });
        }
        let content = &content[..schema.length()];
        debug_assert!(
            source.read(offset, content.len()) == Ok(content),
            "content does not match the source at offset {}",
            offset
        );
        Ok(Structure {
            schema: Schema::Group(schema),
            source,
            offset,
            content,
            path: Path::root(),
        })
    }

    pub fn schema(&self) -> Schema<'a> {
        self.schema
    }

    pub fn description(&self) -> &'a str {
        self.schema.description()
    }

    /// Absolute offset of this structure's bytes in the source.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn content(&self) -> &'a [u8] {
        self.content
    }

    /// Path from the root this structure was derived from.
    ///
    /// Roots, including dereferenced structures, have the empty path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if this is a single field carrying a link.
    pub fn is_link(&self) -> bool {
        matches!(self.schema, Schema::Field(field) if field.is_link())
    }

    /// Formatted value of a single-field structure; `None` for groups.
    pub fn value(&self) -> Option<String> {
        match self.schema {
            Schema::Field(field) => Some(field.format(self.content)),
            Schema::Group(_) => None,
        }
    }

    /// Render the bound bytes as a description tree.
    ///
    /// Link fields carry their path relative to this structure, so passing
    /// it to [`follow`](Self::follow) on `self` reaches the link target. A
    /// single link field reports the empty path. Links are not followed here.
    pub fn describe(&self) -> Description {
        match self.schema {
            Schema::Group(group) => Description {
                description: group.description().to_string(),
                body: Body::Subfields(group.render(self.content, &Path::root())),
                link: None,
            },
            Schema::Field(field) => Description {
                description: field.description().to_string(),
                body: Body::Contents(field.format(self.content)),
                link: field.is_link().then(Path::root),
            },
        }
    }

    /// Narrow to child `index`, reusing the bytes already held.
    ///
    /// Fails with [`FsvisError::NotIndexable`] on a single-field structure and
    /// with [`FsvisError::Index`] if `index` is out of range.
    pub fn index(&self, index: usize) -> Result<Structure<'a>, FsvisError> {
        let group = match self.schema {
            Schema::Group(group) => group,
            Schema::Field(field) => {
                return Err(FsvisError::NotIndexable(field.description().to_string()))
            }
        };
        let child = group.child(index)?;
        let start = group.offset_of(index)?;
        let end = start + child.length();
        log::trace!(
            "index {} of {:?}: bytes {}..{}",
            index,
            group.description(),
            start,
            end
        );
        Ok(Structure {
            schema: Schema::from(child),
            source: self.source,
            offset: self.offset + start as u64,
            content: &self.content[start..end],
            path: self.path.child(index),
        })
    }

    /// Walk a path string such as `"1.4"`.
    ///
    /// The whole path is parsed before any indexing, so a malformed segment
    /// fails with [`FsvisError::InvalidPath`] regardless of position. An empty
    /// path returns an identical structure.
    pub fn sub_struct(&self, path: &str) -> Result<Structure<'a>, FsvisError> {
        let path: Path = path.parse()?;
        self.navigate(&path)
    }

    /// Fold [`index`](Self::index) over the indices of `path`, left to right.
    pub fn navigate(&self, path: &Path) -> Result<Structure<'a>, FsvisError> {
        log::debug!("navigate {:?} from {:?}", path.to_string(), self.description());
        path.indices()
            .iter()
            .try_fold(self.clone(), |current, &index| current.index(index))
    }

    /// Decode the structure this link field points at.
    ///
    /// The target offset comes from the link's interpreter applied to this
    /// field's bytes; the target schema is read from the same source,
    /// bounds-checked against its full extent. Fails with
    /// [`FsvisError::NotALink`] unless this is a single link-bearing field.
    pub fn dereference(&self) -> Result<Structure<'a>, FsvisError> {
        let (field, link) = match self.schema {
            Schema::Field(field) => match field.link() {
                Some(link) => (field, link),
                None => return Err(FsvisError::NotALink(field.description().to_string())),
            },
            Schema::Group(group) => {
                return Err(FsvisError::NotALink(group.description().to_string()))
            }
        };
        let target = link.target();
        let offset = link
            .resolve(self.content)
            .ok_or(FsvisError::OutOfRange {
                offset: u64::MAX,
                length: target.length() as u64,
                size: self.source.len(),
            })?;
        log::debug!(
            "dereference {:?} at {} -> {:?} at offset {}",
            field.description(),
            self.offset,
            target.description(),
            offset
        );
        Structure::from_offset(target, self.source, offset)
    }

    /// Navigate to `path`, then dereference the result if it is a link.
    ///
    /// This is one step of interactive browsing: a followed link lands on
    /// the target structure, any other path lands on the addressed node.
    pub fn follow(&self, path: &str) -> Result<Structure<'a>, FsvisError> {
        let node = self.sub_struct(path)?;
        if node.is_link() {
            node.dereference()
        } else {
            Ok(node)
        }
    }
}

impl PartialEq for Structure<'_> {
    /// Equal when the same schema node is bound to the same bytes at the same
    /// offset.
    fn eq(&self, other: &Self) -> bool {
        self.schema.same_node(&other.schema)
            && self.offset == other.offset
            && self.content == other.content
    }
}

impl fmt::Debug for Structure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Structure")
            .field("description", &self.description())
            .field("offset", &self.offset)
            .field("length", &self.content.len())
            .field("path", &self.path.to_string())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::layout::field::Link;
    use crate::layout::format::Endian;
    use crate::layout::interpret::BlockAddress;

    fn target() -> Arc<FieldGroup> {
        Arc::new(FieldGroup::new(
            "target",
            vec![Field::le("magic", 2).into(), Field::hex("body", 6).into()],
        ))
    }

    fn root() -> FieldGroup {
        let entry = FieldGroup::new(
            "entry",
            vec![
                Field::le("kind", 1).into(),
                Field::le("ptr", 2)
                    .with_link(Link::new(target(), BlockAddress::absolute(Endian::Little)))
                    .into(),
                Field::filler("pad", 1).into(),
            ],
        );
        FieldGroup::new(
            "root",
            vec![Field::hex("head", 4).into(), entry.into(), Field::le("tail", 2).into()],
        )
    }

    fn image() -> Vec<u8> {
        let mut data = vec![0u8; 64];
        data[4] = 7; // kind
        data[5..7].copy_from_slice(&32u16.to_le_bytes()); // ptr -> 32
        data[32..34].copy_from_slice(&0xef53u16.to_le_bytes());
        data
    }

    #[test]
    fn test_from_offset_reads_exact_length() {
        let schema = root();
        let data = image();
        let s = Structure::from_offset(&schema, &data, 0).unwrap();
        assert_eq!(s.len(), 10);
        assert_eq!(s.offset(), 0);
        assert!(s.path().is_empty());

        let tail = Structure::from_offset(&schema, &data, 54).unwrap();
        assert_eq!(tail.len(), 10);
    }

    #[test]
    fn test_from_offset_out_of_range() {
        let schema = root();
        let data = image();
        assert_eq!(
            Structure::from_offset(&schema, &data, 55).unwrap_err(),
            FsvisError::OutOfRange {
                offset: 55,
                length: 10,
                size: 64
            }
        );
    }

    #[test]
    fn test_from_bytes_anonymous_schema() {
        let data = image();
        let ad_hoc = FieldGroup::new("pair", vec![Field::le("a", 1).into(), Field::le("b", 1).into()]);
        let s = Structure::from_bytes(&ad_hoc, &data, &data[4..16], 4).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.index(0).unwrap().value().unwrap(), "7");
        assert_eq!(s.index(1).unwrap().offset(), 5);

        assert!(matches!(
            Structure::from_bytes(&ad_hoc, &data, &data[..1], 0),
            Err(FsvisError::OutOfRange { .. })
        ));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "does not match the source")]
    fn test_from_bytes_rejects_misplaced_content() {
        let data = image();
        let ad_hoc = FieldGroup::new("pair", vec![Field::le("a", 1).into(), Field::le("b", 1).into()]);
        // bytes 4.. claimed to live at offset 0
        let _ = Structure::from_bytes(&ad_hoc, &data, &data[4..16], 0);
    }

    #[test]
    fn test_index_slices_parent_content() {
        let schema = root();
        let data = image();
        let s = Structure::from_offset(&schema, &data, 0).unwrap();
        let entry = s.index(1).unwrap();
        assert_eq!(entry.offset(), 4);
        assert_eq!(entry.content(), &data[4..8]);
        assert_eq!(entry.path().to_string(), "1");

        let kind = entry.index(0).unwrap();
        assert_eq!(kind.value().unwrap(), "7");
        assert_eq!(kind.path().to_string(), "1.0");
    }

    #[test]
    fn test_index_errors() {
        let schema = root();
        let data = image();
        let s = Structure::from_offset(&schema, &data, 0).unwrap();
        assert_eq!(s.index(3).unwrap_err(), FsvisError::Index { index: 3, count: 3 });
        let head = s.index(0).unwrap();
        assert_eq!(
            head.index(0).unwrap_err(),
            FsvisError::NotIndexable("head".to_string())
        );
    }

    #[test]
    fn test_sub_struct() {
        let schema = root();
        let data = image();
        let s = Structure::from_offset(&schema, &data, 0).unwrap();

        let ptr = s.sub_struct("1.1").unwrap();
        assert_eq!(ptr.offset(), 5);
        assert_eq!(ptr.len(), 2);
        assert!(ptr.is_link());

        assert_eq!(s.sub_struct("").unwrap(), s);
        assert_eq!(
            s.sub_struct("1.x").unwrap_err(),
            FsvisError::InvalidPath("1.x".to_string())
        );
        assert_eq!(
            s.sub_struct("1.9").unwrap_err(),
            FsvisError::Index { index: 9, count: 3 }
        );
        assert!(matches!(s.sub_struct("0.0"), Err(FsvisError::NotIndexable(_))));
    }

    #[test]
    fn test_invalid_path_reported_before_indexing() {
        let schema = root();
        let data = image();
        let s = Structure::from_offset(&schema, &data, 0).unwrap();
        // 9 is out of range, but the malformed tail wins
        assert!(matches!(s.sub_struct("9.-1"), Err(FsvisError::InvalidPath(_))));
    }

    #[test]
    fn test_dereference() {
        let schema = root();
        let data = image();
        let s = Structure::from_offset(&schema, &data, 0).unwrap();
        let target = s.sub_struct("1.1").unwrap().dereference().unwrap();
        assert_eq!(target.offset(), 32);
        assert_eq!(target.len(), 8);
        assert_eq!(target.content(), &data[32..40]);
        assert!(target.path().is_empty());
        assert_eq!(target.index(0).unwrap().value().unwrap(), "61267");
    }

    #[test]
    fn test_dereference_errors() {
        let schema = root();
        let mut data = image();
        {
            let s = Structure::from_offset(&schema, &data, 0).unwrap();
            assert_eq!(
                s.dereference().unwrap_err(),
                FsvisError::NotALink("root".to_string())
            );
            assert_eq!(
                s.sub_struct("1.0").unwrap().dereference().unwrap_err(),
                FsvisError::NotALink("kind".to_string())
            );
        }

        // Point the link past the end of the image
        data[5..7].copy_from_slice(&60u16.to_le_bytes());
        let s = Structure::from_offset(&schema, &data, 0).unwrap();
        assert_eq!(
            s.sub_struct("1.1").unwrap().dereference().unwrap_err(),
            FsvisError::OutOfRange {
                offset: 60,
                length: 8,
                size: 64
            }
        );
    }

    #[test]
    fn test_follow() {
        let schema = root();
        let data = image();
        let s = Structure::from_offset(&schema, &data, 0).unwrap();
        assert_eq!(s.follow("1.1").unwrap().description(), "target");
        assert_eq!(s.follow("1.0").unwrap().description(), "kind");
    }

    #[test]
    fn test_describe_marks_links_with_relative_paths() {
        let schema = root();
        let data = image();
        let s = Structure::from_offset(&schema, &data, 0).unwrap();
        let desc = s.describe();
        assert_eq!(desc.description, "root");
        let Body::Subfields(children) = &desc.body else {
            panic!("root should have subfields");
        };
        let Body::Subfields(entry) = &children[1].body else {
            panic!("entry should have subfields");
        };
        assert_eq!(entry[1].link.as_ref().unwrap().to_string(), "1.1");
        assert_eq!(entry[1].body, Body::Contents("32".to_string()));
        assert!(entry[0].link.is_none());

        // Described from the nested entry, the link is relative to the entry
        let nested = s.index(1).unwrap();
        let Body::Subfields(entry) = &nested.describe().body else {
            panic!("entry should have subfields");
        };
        let link = entry[1].link.as_ref().unwrap().to_string();
        assert_eq!(link, "1");
        assert_eq!(nested.follow(&link).unwrap().description(), "target");

        let leaf = s.sub_struct("1.1").unwrap();
        let link = leaf.describe().link.unwrap();
        assert!(link.is_empty());
        assert_eq!(leaf.follow(&link.to_string()).unwrap().offset(), 32);
    }
}
