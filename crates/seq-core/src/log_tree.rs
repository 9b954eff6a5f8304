use std::fmt;

use serde::Serialize;

/// A child of a [`LogTree`]: one explanation line or a nested tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LogNode {
    Line(String),
    Tree(LogTree),
}

/// Ordered, nested explanation of a search.
///
/// Subtrees are moved in when attached, so a tree is only ever built from
/// finished children and can never contain itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LogTree {
    children: Vec<LogNode>,
}

impl LogTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_line(&mut self, line: impl Into<String>) {
        self.children.push(LogNode::Line(line.into()));
    }

    pub fn add_subtree(&mut self, tree: LogTree) {
        self.children.push(LogNode::Tree(tree));
    }

    pub fn children(&self) -> &[LogNode] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Nesting depth of the deepest line; a tree holding only lines is 1,
    /// and subtrees without lines do not count.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                LogNode::Line(_) => 1,
                LogNode::Tree(tree) => match tree.depth() {
                    0 => 0,
                    d => d + 1,
                },
            })
            .max()
            .unwrap_or(0)
    }

    /// Outline rendering, one string per line:
    ///
    /// ```text
    /// | 1, 4, 9 --> 16
    /// ----| 3, 5 --> 7      taking differences
    ///     ----| 2 --> 2     ...
    /// ```
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.render_into(0, &mut out);
        out
    }

    fn render_into(&self, level: usize, out: &mut Vec<String>) {
        for child in &self.children {
            match child {
                LogNode::Line(text) => {
                    let indent = "    ".repeat(level.saturating_sub(1));
                    let branch = if level > 0 { "----" } else { "" };
                    out.push(format!("{indent}{branch}| {text}"));
                }
                LogNode::Tree(tree) => tree.render_into(level + 1, out),
            }
        }
    }
}

impl fmt::Display for LogTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LogTree {
        let mut values = LogTree::new();
        values.add_line("2, 4 by abs values");

        let mut odds = LogTree::new();
        odds.add_line("-2, -4 by alternation");
        odds.add_subtree(values);

        let mut root = LogTree::new();
        root.add_line("1, -2, 3, -4");
        root.add_subtree(odds);
        root
    }

    #[test]
    fn test_render_indents_by_nesting() {
        assert_eq!(
            sample().lines(),
            vec![
                "| 1, -2, 3, -4",
                "----| -2, -4 by alternation",
                "    ----| 2, 4 by abs values",
            ]
        );
    }

    #[test]
    fn test_depth_matches_nesting() {
        assert_eq!(LogTree::new().depth(), 0);
        assert_eq!(sample().depth(), 3);
    }

    #[test]
    fn test_empty_subtrees_render_nothing() {
        let mut root = LogTree::new();
        root.add_line("top");
        root.add_subtree(LogTree::new());
        assert_eq!(root.lines(), vec!["| top"]);
    }

    #[test]
    fn test_display_joins_lines() {
        assert_eq!(
            sample().to_string(),
            "| 1, -2, 3, -4\n----| -2, -4 by alternation\n    ----| 2, 4 by abs values"
        );
    }

    #[test]
    fn test_serializes_as_nested_arrays() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json[0], "1, -2, 3, -4");
        assert_eq!(json[1][0], "-2, -4 by alternation");
        assert_eq!(json[1][1][0], "2, 4 by abs values");
    }
}
