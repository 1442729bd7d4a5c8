//! Prefix tree of saved opening lines.
//!
//! Nodes live in an arena; node 0 is the starting position. Each node keeps
//! its children as an ordered list so that line extraction is deterministic:
//! the index of a line in [`RepertoireTree::extract_lines`] is what users pick
//! as "variant N".

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::move_token::MoveToken;

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("Duplicate move '{0}' under the same position")]
    DuplicateMove(MoveToken),

    #[error("Invalid repertoire tree: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeId(usize);

const ROOT: NodeId = NodeId(0);

#[derive(Debug, Clone, Default)]
struct RepertoireNode {
    children: Vec<(MoveToken, NodeId)>,
}

impl RepertoireNode {
    fn child(&self, mv: &MoveToken) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(child_mv, _)| child_mv == mv)
            .map(|(_, id)| *id)
    }
}

/// Every line saved under one repertoire name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "SerializedTree", try_from = "SerializedTree")]
pub struct RepertoireTree {
    nodes: Vec<RepertoireNode>,
}

impl Default for RepertoireTree {
    fn default() -> Self {
        Self {
            nodes: vec![RepertoireNode::default()],
        }
    }
}

impl RepertoireTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a line into the tree, reusing any shared prefix.
    /// Returns how many positions were added; 0 means the line was already known.
    pub fn insert_line(&mut self, moves: &[MoveToken]) -> usize {
        let mut current = ROOT;
        let mut created = 0;

        for mv in moves {
            current = match self.nodes[current.0].child(mv) {
                Some(next) => next,
                None => {
                    let next = NodeId(self.nodes.len());
                    self.nodes.push(RepertoireNode::default());
                    self.nodes[current.0].children.push((mv.clone(), next));
                    created += 1;
                    next
                }
            };
        }

        created
    }

    /// All root-to-leaf lines, depth first, children in insertion order.
    pub fn extract_lines(&self) -> Vec<Vec<MoveToken>> {
        let mut lines = Vec::new();
        let mut prefix = Vec::new();
        self.collect_lines(ROOT, &mut prefix, &mut lines);
        lines
    }

    fn collect_lines(
        &self,
        id: NodeId,
        prefix: &mut Vec<MoveToken>,
        lines: &mut Vec<Vec<MoveToken>>,
    ) {
        let node = &self.nodes[id.0];
        if node.children.is_empty() {
            if !prefix.is_empty() {
                lines.push(prefix.clone());
            }
            return;
        }
        for (mv, child) in &node.children {
            prefix.push(mv.clone());
            self.collect_lines(*child, prefix, lines);
            prefix.pop();
        }
    }

    /// Moves saved as continuations of `prefix`. Empty when the prefix
    /// left the repertoire.
    pub fn suggest_next(&self, prefix: &[MoveToken]) -> Vec<MoveToken> {
        match self.find(prefix) {
            Some(id) => self.nodes[id.0]
                .children
                .iter()
                .map(|(mv, _)| mv.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    fn find(&self, prefix: &[MoveToken]) -> Option<NodeId> {
        prefix
            .iter()
            .try_fold(ROOT, |id, mv| self.nodes[id.0].child(mv))
    }

    /// Number of positions after the start (one per distinct prefix).
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn line_count(&self) -> usize {
        self.nodes
            .iter()
            .skip(1)
            .filter(|node| node.children.is_empty())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[ROOT.0].children.is_empty()
    }

    pub fn to_json(&self) -> JsonValue {
        serde_json::json!({ "children": self.children_to_json(ROOT) })
    }

    fn children_to_json(&self, id: NodeId) -> Vec<JsonValue> {
        self.nodes[id.0]
            .children
            .iter()
            .map(|(mv, child)| {
                serde_json::json!({
                    "move": mv.as_str(),
                    "children": self.children_to_json(*child),
                })
            })
            .collect()
    }

    pub fn from_json(value: JsonValue) -> Result<Self, TreeError> {
        let serialized: SerializedTree = serde_json::from_value(value)?;
        Self::try_from(serialized)
    }

    fn serialize_children(&self, id: NodeId) -> Vec<SerializedNode> {
        self.nodes[id.0]
            .children
            .iter()
            .map(|(mv, child)| SerializedNode {
                mv: mv.clone(),
                children: self.serialize_children(*child),
            })
            .collect()
    }

    fn attach(&mut self, parent: NodeId, children: Vec<SerializedNode>) -> Result<(), TreeError> {
        for SerializedNode { mv, children } in children {
            if self.nodes[parent.0].child(&mv).is_some() {
                return Err(TreeError::DuplicateMove(mv));
            }
            let id = NodeId(self.nodes.len());
            self.nodes.push(RepertoireNode::default());
            self.nodes[parent.0].children.push((mv, id));
            self.attach(id, children)?;
        }
        Ok(())
    }
}

/// Wire and storage form. Arrays rather than objects keep child order
/// intact through JSONB.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerializedTree {
    pub children: Vec<SerializedNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedNode {
    #[serde(rename = "move")]
    pub mv: MoveToken,
    #[serde(default)]
    pub children: Vec<SerializedNode>,
}

impl From<RepertoireTree> for SerializedTree {
    fn from(tree: RepertoireTree) -> Self {
        Self {
            children: tree.serialize_children(ROOT),
        }
    }
}

impl TryFrom<SerializedTree> for RepertoireTree {
    type Error = TreeError;

    fn try_from(serialized: SerializedTree) -> Result<Self, Self::Error> {
        let mut tree = RepertoireTree::new();
        tree.attach(ROOT, serialized.children)?;
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_token::parse_line;

    fn line(s: &str) -> Vec<MoveToken> {
        parse_line(s).unwrap()
    }

    fn tokens(moves: &[MoveToken]) -> Vec<&str> {
        moves.iter().map(MoveToken::as_str).collect()
    }

    #[test]
    fn test_empty_tree_has_no_lines() {
        let tree = RepertoireTree::new();
        assert!(tree.extract_lines().is_empty());
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 0);
        assert_eq!(tree.line_count(), 0);
    }

    #[test]
    fn test_shared_prefix_collapses() {
        let mut tree = RepertoireTree::new();
        assert_eq!(tree.insert_line(&line("e2e4 e7e5 g1f3")), 3);
        assert_eq!(tree.insert_line(&line("e2e4 c7c5")), 1);

        let lines = tree.extract_lines();
        assert_eq!(lines, vec![line("e2e4 e7e5 g1f3"), line("e2e4 c7c5")]);
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.line_count(), 2);
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut tree = RepertoireTree::new();
        tree.insert_line(&line("d2d4 d7d5 c2c4"));
        let before = tree.extract_lines();
        assert_eq!(tree.insert_line(&line("d2d4 d7d5 c2c4")), 0);
        assert_eq!(tree.extract_lines(), before);
    }

    #[test]
    fn test_extending_a_line_replaces_its_leaf() {
        let mut tree = RepertoireTree::new();
        tree.insert_line(&line("e2e4"));
        tree.insert_line(&line("e2e4 e7e5"));
        assert_eq!(tree.extract_lines(), vec![line("e2e4 e7e5")]);
    }

    #[test]
    fn test_suggest_next() {
        let mut tree = RepertoireTree::new();
        tree.insert_line(&line("e2e4"));
        tree.insert_line(&line("e2e4 e7e5"));

        assert_eq!(tokens(&tree.suggest_next(&[])), vec!["e2e4"]);
        assert_eq!(tokens(&tree.suggest_next(&line("e2e4"))), vec!["e7e5"]);
        assert!(tree.suggest_next(&line("d2d4")).is_empty());
        assert!(tree.suggest_next(&line("e2e4 e7e5")).is_empty());
    }

    #[test]
    fn test_suggestions_keep_insertion_order() {
        let mut tree = RepertoireTree::new();
        tree.insert_line(&line("e2e4 e7e5"));
        tree.insert_line(&line("e2e4 c7c5"));
        tree.insert_line(&line("e2e4 e7e6"));
        assert_eq!(
            tokens(&tree.suggest_next(&line("e2e4"))),
            vec!["e7e5", "c7c5", "e7e6"]
        );
    }

    #[test]
    fn test_json_preserves_order() {
        let mut tree = RepertoireTree::new();
        tree.insert_line(&line("e2e4 e7e5 g1f3"));
        tree.insert_line(&line("e2e4 c7c5"));
        tree.insert_line(&line("d2d4"));

        let json = tree.to_json();
        assert_eq!(json["children"][0]["move"], "e2e4");
        assert_eq!(json["children"][0]["children"][1]["move"], "c7c5");
        assert_eq!(json["children"][1]["move"], "d2d4");

        let restored = RepertoireTree::from_json(json).unwrap();
        assert_eq!(restored.extract_lines(), tree.extract_lines());
    }

    #[test]
    fn test_to_json_matches_serde_form() {
        let mut tree = RepertoireTree::new();
        assert_eq!(tree.to_json(), serde_json::json!({ "children": [] }));

        tree.insert_line(&line("e2e4 e7e5 g1f3"));
        tree.insert_line(&line("e2e4 c7c5"));
        assert_eq!(tree.to_json(), serde_json::to_value(&tree).unwrap());
        assert!(!tree.to_json().is_null());
    }

    #[test]
    fn test_from_json_rejects_duplicate_siblings() {
        let json = serde_json::json!({
            "children": [
                {"move": "e2e4", "children": []},
                {"move": "e2e4", "children": []}
            ]
        });
        assert!(matches!(
            RepertoireTree::from_json(json),
            Err(TreeError::DuplicateMove(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_malformed_token() {
        let json = serde_json::json!({"children": [{"move": "Nf3", "children": []}]});
        assert!(matches!(RepertoireTree::from_json(json), Err(TreeError::Json(_))));
    }
}
