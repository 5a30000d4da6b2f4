//! Composite schema nodes and the layout algebra.
//!
//! A [`FieldGroup`] is an ordered list of child [`Node`]s. Offsets are never
//! stored by the schema author: the group's length is the sum of its
//! children's lengths, and child `i` starts at the sum of the lengths of
//! children `0..i`. Reserved and padding regions are explicit filler fields,
//! so the children always tile the group exactly, with no gaps and no
//! overlap.
//!
//! Children are addressed by position only. [`FieldGroup::describe`] renders
//! a byte range as a [`Description`] tree, and [`FieldGroup::entries`] lists
//! the derived offset and length of every node in the tree.

use std::borrow::Cow;
use std::sync::Arc;

use serde::Serialize;

use crate::layout::field::Field;
use crate::layout::path::Path;
use crate::FsvisError;

/// A schema tree node: a leaf field or a nested group.
#[derive(Debug, Clone)]
pub enum Node {
    Field(Field),
    Group(Arc<FieldGroup>),
}

impl Node {
    pub fn description(&self) -> &str {
        match self {
            Node::Field(field) => field.description(),
            Node::Group(group) => group.description(),
        }
    }

    pub fn length(&self) -> usize {
        match self {
            Node::Field(field) => field.length(),
            Node::Group(group) => group.length(),
        }
    }

    /// Render `content` (this node's bytes) as a description tree.
    ///
    /// `path` is this node's own path; link fields report it as their
    /// followable address.
    pub fn describe(&self, content: &[u8], path: &Path) -> Result<Description, FsvisError> {
        check_content(self.length(), content)?;
        Ok(self.render(content, path))
    }

    /// [`describe`](Self::describe) without the length check.
    pub(crate) fn render(&self, content: &[u8], path: &Path) -> Description {
        match self {
            Node::Field(field) => Description {
                description: field.description().to_string(),
                body: Body::Contents(field.format(&content[..field.length()])),
                link: field.is_link().then(|| path.clone()),
            },
            Node::Group(group) => Description {
                description: group.description().to_string(),
                body: Body::Subfields(group.render(content, path)),
                link: None,
            },
        }
    }
}

impl From<Field> for Node {
    fn from(field: Field) -> Self {
        Node::Field(field)
    }
}

impl From<FieldGroup> for Node {
    fn from(group: FieldGroup) -> Self {
        Node::Group(Arc::new(group))
    }
}

impl From<Arc<FieldGroup>> for Node {
    fn from(group: Arc<FieldGroup>) -> Self {
        Node::Group(group)
    }
}

/// Ordered, positionally indexed sequence of schema nodes.
#[derive(Debug, Clone)]
pub struct FieldGroup {
    description: Cow<'static, str>,
    children: Vec<Node>,
    /// Prefix sums of child lengths; `offsets[i]` is child `i`'s start.
    offsets: Vec<usize>,
    length: usize,
}

impl FieldGroup {
    /// Build a group; offsets and total length are derived once here.
    ///
    /// A group with no children is valid and has length 0.
    pub fn new(description: impl Into<Cow<'static, str>>, children: Vec<Node>) -> Self {
        let mut offsets = Vec::with_capacity(children.len());
        let mut length = 0usize;
        for child in &children {
            offsets.push(length);
            length += child.length();
        }
        FieldGroup {
            description: description.into(),
            children,
            offsets,
            length,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Exact byte span of the group: the sum of its children's lengths.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, index: usize) -> Result<&Node, FsvisError> {
        self.children.get(index).ok_or(FsvisError::Index {
            index,
            count: self.children.len(),
        })
    }

    /// Byte offset of child `index` relative to the start of the group.
    pub fn offset_of(&self, index: usize) -> Result<usize, FsvisError> {
        self.offsets.get(index).copied().ok_or(FsvisError::Index {
            index,
            count: self.children.len(),
        })
    }

    /// The bytes of child `index` within `content`.
    ///
    /// `content` must hold at least [`length`](Self::length) bytes.
    pub fn slice_of<'c>(&self, content: &'c [u8], index: usize) -> Result<&'c [u8], FsvisError> {
        check_content(self.length, content)?;
        let start = self.offset_of(index)?;
        let end = start + self.children[index].length();
        Ok(&content[start..end])
    }

    /// Describe every child of the group as bound to `content`.
    ///
    /// Child `i` gets the path `path_prefix.i`, which link fields expose so
    /// a consumer can follow them later. Links are never followed here.
    pub fn describe(
        &self,
        content: &[u8],
        path_prefix: &Path,
    ) -> Result<Vec<Description>, FsvisError> {
        check_content(self.length, content)?;
        Ok(self.render(content, path_prefix))
    }

    pub(crate) fn render(&self, content: &[u8], path_prefix: &Path) -> Vec<Description> {
        self.children
            .iter()
            .enumerate()
            .map(|(i, child)| {
                let start = self.offsets[i];
                child.render(&content[start..start + child.length()], &path_prefix.child(i))
            })
            .collect()
    }

    /// Flattened, depth-first list of every node with its derived position.
    ///
    /// Offsets are relative to the start of this group.
    pub fn entries(&self) -> Vec<LayoutEntry> {
        let mut entries = Vec::new();
        self.collect_entries(0, &Path::root(), &mut entries);
        entries
    }

    fn collect_entries(&self, base: usize, prefix: &Path, out: &mut Vec<LayoutEntry>) {
        for (i, child) in self.children.iter().enumerate() {
            let path = prefix.child(i);
            let offset = base + self.offsets[i];
            let (link, group) = match child {
                Node::Field(field) => (field.is_link(), None),
                Node::Group(group) => (false, Some(group)),
            };
            out.push(LayoutEntry {
                path: path.clone(),
                description: child.description().to_string(),
                offset,
                length: child.length(),
                depth: path.len() - 1,
                link,
            });
            if let Some(group) = group {
                group.collect_entries(offset, &path, out);
            }
        }
    }
}

fn check_content(length: usize, content: &[u8]) -> Result<(), FsvisError> {
    if content.len() < length {
        return Err(FsvisError::OutOfRange {
            offset: 0,
            length: length as u64,
            size: content.len() as u64,
        });
    }
    Ok(())
}

/// One node of a rendered description tree.
///
/// Serializes as `{"description", "contents"}` for leaves or
/// `{"description", "subfields"}` for groups, plus `"link"` on
/// dereferenceable leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Description {
    pub description: String,
    #[serde(flatten)]
    pub body: Body,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Path>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Contents(String),
    Subfields(Vec<Description>),
}

/// Position of one schema node, as derived by the layout algebra.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutEntry {
    pub path: Path,
    pub description: String,
    pub offset: usize,
    pub length: usize,
    pub depth: usize,
    pub link: bool,
}
