use serde::{Deserialize, Serialize};

/// Display name given to a freshly created node.
pub const PLACEHOLDER_NAME: &str = "新しいメンバー";
/// Display title given to a freshly created node.
pub const PLACEHOLDER_TITLE: &str = "役職名";

/// One position in the organisation tree.
///
/// `id` is unique across the whole tree and never changes after creation.
/// `children` is in display order; an empty vector means a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            title: title.into(),
            children: Vec::new(),
        }
    }

    /// Builder-style helper used for literal trees.
    pub fn with_children(mut self, children: Vec<HierarchyNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Case-insensitive substring match on name or title.
    /// `needle` must already be lowercased.
    pub(crate) fn contains_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.title.to_lowercase().contains(needle)
    }
}

/// The organisation every new session starts from when nothing is persisted.
pub fn sample_hierarchy() -> HierarchyNode {
    HierarchyNode::new("1", "山田太郎", "代表取締役社長").with_children(vec![
        HierarchyNode::new("2", "佐藤一郎", "営業部長").with_children(vec![
            HierarchyNode::new("4", "高橋花子", "営業マネージャー"),
            HierarchyNode::new("5", "鈴木健太", "営業担当"),
        ]),
        HierarchyNode::new("3", "田中次郎", "技術部長").with_children(vec![
            HierarchyNode::new("6", "伊藤誠", "開発リーダー"),
            HierarchyNode::new("7", "渡辺真理", "デザイナー"),
        ]),
    ])
}
