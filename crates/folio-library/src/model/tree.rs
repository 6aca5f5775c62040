use std::fmt::{self, Debug, Formatter};

use ecow::EcoString;

use crate::foundations::{PropertyId, PropertyList, Value};
use crate::model::{InlineItem, PageMaster, RegionName, Styles};

/// Identifies a node in a [`ContentTree`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a node id from its raw index.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The index of the node in its tree.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Debug for NodeId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a content node is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The document root. Its children are page sequences.
    Root,
    /// A run of pages sharing one page master.
    PageSequence(PageMaster),
    /// The content flowing through the body regions of a page sequence.
    Flow,
    /// Content repeated on every page in a side region.
    StaticContent(RegionName),
    /// A block container.
    Block,
    /// A block of inline content that is broken into lines.
    Paragraph(Vec<InlineItem>),
    /// A table. Its children are its column declarations followed by rows.
    Table,
    /// A column declaration of a table.
    TableColumn,
    /// A row of table cells.
    TableRow,
    /// A table cell holding block content.
    TableCell,
}

/// A node in the content tree.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    properties: PropertyList,
    xml_id: Option<EcoString>,
}

impl Node {
    /// What the node is.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The parent node, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The child nodes in document order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The properties specified directly on the node.
    pub fn properties(&self) -> &PropertyList {
        &self.properties
    }

    /// The document-level identifier of the node, if it has one.
    pub fn xml_id(&self) -> Option<&EcoString> {
        self.xml_id.as_ref()
    }
}

/// An arena of content nodes, rooted at [`ContentTree::root`].
#[derive(Debug, Clone)]
pub struct ContentTree {
    nodes: Vec<Node>,
}

impl ContentTree {
    /// Create a tree containing only a root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                parent: None,
                children: vec![],
                properties: PropertyList::new(),
                xml_id: None,
            }],
        }
    }

    /// The root node's id.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a new node as the last child of `parent`.
    pub fn push(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        properties: PropertyList,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: vec![],
            properties,
            xml_id: None,
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Give a node a document-level identifier.
    pub fn set_xml_id(&mut self, node: NodeId, id: impl Into<EcoString>) {
        self.nodes[node.index()].xml_id = Some(id.into());
    }

    /// Set a property on a node after it was pushed, e.g. one whose value
    /// refers to the node itself.
    pub fn set_property(&mut self, node: NodeId, id: PropertyId, value: impl Into<Value>) {
        self.nodes[node.index()].properties.set(id, value);
    }

    /// Access a node.
    ///
    /// Panics if the id does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// The properties in effect for a node, including inherited ones.
    pub fn styles(&self, id: NodeId) -> Styles<'_> {
        Styles::new(self, id)
    }

    /// The number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds nothing but the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }
}

impl Default for ContentTree {
    fn default() -> Self {
        Self::new()
    }
}
