//! NodeArena creation methods.
//!
//! Children are always created before their parent, so adding a node with a
//! payload is also the point where the children's parent links are set.

use super::base::NodeIndex;
use super::node::*;

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
            extended_info: Vec::with_capacity(capacity),
            data: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node without a payload (keyword expressions, `;`).
    pub fn add_token(&mut self, kind: u16, pos: u32, end: u32) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            flags: 0,
            pos,
            end,
            data_index: Node::NO_DATA,
        });
        self.extended_info.push(ExtendedNodeInfo::default());
        index
    }

    /// Add a node with a payload and link its children to it.
    pub fn add_node(&mut self, kind: u16, pos: u32, end: u32, data: NodeData) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        let children = data.children();
        let data_index = self.data.len() as u32;
        self.data.push(data);
        self.nodes.push(Node {
            kind,
            flags: 0,
            pos,
            end,
            data_index,
        });
        self.extended_info.push(ExtendedNodeInfo::default());
        for child in children {
            if let Some(info) = self.get_extended_mut(child) {
                info.parent = index;
            }
        }
        index
    }

    pub fn add_identifier(&mut self, kind: u16, pos: u32, end: u32, text: String) -> NodeIndex {
        self.add_node(
            kind,
            pos,
            end,
            NodeData::Identifier(IdentifierData { escaped_text: text }),
        )
    }

    pub fn add_literal(&mut self, kind: u16, pos: u32, end: u32, text: String) -> NodeIndex {
        self.add_node(kind, pos, end, NodeData::Literal(LiteralData { text }))
    }

    pub fn set_flags(&mut self, index: NodeIndex, flags: u32) {
        if let Some(node) = self.get_mut(index) {
            node.flags |= flags;
        }
    }

    /// Drop every node added after `len`. Used to undo speculative parses.
    pub(crate) fn truncate(&mut self, len: usize, data_len: usize) {
        self.nodes.truncate(len);
        self.extended_info.truncate(len);
        self.data.truncate(data_len);
    }
}
