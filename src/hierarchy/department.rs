//! Department labels derived from position titles.

use super::types::HierarchyNode;

/// Suffixes that end an organisational unit name: department, section, team.
pub const DEPARTMENT_MARKERS: [&str; 3] = ["部", "課", "チーム"];

/// Leading part of `title` up to and including the first department marker.
///
/// A marker only counts when at least one character precedes it, so `"部長"`
/// has no department. Titles without a marker are returned unchanged.
pub fn extract_department(title: &str) -> String {
    let Some(first) = title.chars().next() else {
        return String::new();
    };
    let search_from = first.len_utf8();
    let end = DEPARTMENT_MARKERS
        .iter()
        .filter_map(|marker| {
            title[search_from..]
                .find(*marker)
                .map(|idx| search_from + idx + marker.len())
        })
        .min();
    match end {
        Some(end) => title[..end].to_string(),
        None => title.to_string(),
    }
}

/// Distinct non-empty department labels in pre-order, root first.
pub fn get_all_departments(tree: &HierarchyNode) -> Vec<String> {
    fn walk(node: &HierarchyNode, out: &mut Vec<String>) {
        let dept = extract_department(&node.title);
        if !dept.is_empty() && !out.contains(&dept) {
            out.push(dept);
        }
        for child in &node.children {
            walk(child, out);
        }
    }
    let mut out = Vec::new();
    walk(tree, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::types::sample_hierarchy;

    #[test]
    fn test_extract_department_examples() {
        assert_eq!(extract_department("営業部長"), "営業部");
        assert_eq!(extract_department("開発リーダー"), "開発リーダー");
        assert_eq!(extract_department(""), "");
    }

    #[test]
    fn test_extract_department_other_markers() {
        assert_eq!(extract_department("総務課長"), "総務課");
        assert_eq!(extract_department("開発チームリーダー"), "開発チーム");
    }

    #[test]
    fn test_extract_department_first_marker_wins() {
        // 課 comes before 部 here
        assert_eq!(extract_department("経理課第二部"), "経理課");
    }

    #[test]
    fn test_extract_department_needs_prefix() {
        assert_eq!(extract_department("部長"), "部長");
        assert_eq!(extract_department("部門部長"), "部門部");
    }

    #[test]
    fn test_get_all_departments() {
        let tree = sample_hierarchy();
        assert_eq!(
            get_all_departments(&tree),
            vec![
                "代表取締役社長",
                "営業部",
                "営業マネージャー",
                "営業担当",
                "技術部",
                "開発リーダー",
                "デザイナー",
            ]
        );
    }

    #[test]
    fn test_get_all_departments_dedupes_and_skips_empty() {
        let tree = HierarchyNode::new("1", "a", "").with_children(vec![
            HierarchyNode::new("2", "b", "営業部長"),
            HierarchyNode::new("3", "c", "営業部員"),
        ]);
        assert_eq!(get_all_departments(&tree), vec!["営業部"]);
    }
}
