//! Logic-structure tree traversal, layout and rendering.
//!
//! The tree comes straight from a model response, so it is walked with an
//! explicit stack and cut off at [`MAX_TREE_DEPTH`] levels. Nodes below the
//! cut are counted but never visited.

use super::result::{NodeKind, StructureNode};
use crate::render::escape_xml;

/// Deepest level that is visited; the root is level 0.
pub const MAX_TREE_DEPTH: usize = 16;

const MARGIN_TOP: f64 = 20.0;
const MARGIN_RIGHT: f64 = 120.0;
const MARGIN_BOTTOM: f64 = 20.0;
const MARGIN_LEFT: f64 = 100.0;

const NODE_RADIUS: f64 = 6.0;
const LABEL_OFFSET: f64 = 12.0;
const LABEL_MAX_CHARS: usize = 15;
const LINK_COLOR: &str = "#cbd5e1";

/// A node reached by [`walk_tree`].
#[derive(Debug, Clone, Copy)]
pub struct VisitedNode<'a> {
    pub node: &'a StructureNode,
    pub depth: usize,
    /// Index of the parent in [`TreeWalk::nodes`]
    pub parent: Option<usize>,
    /// Children that were visited (not cut off by the depth cap)
    pub visible_children: usize,
}

/// Pre-order traversal result.
#[derive(Debug, Clone)]
pub struct TreeWalk<'a> {
    pub nodes: Vec<VisitedNode<'a>>,
    /// Number of nodes below the depth cap
    pub truncated: usize,
}

impl TreeWalk<'_> {
    /// Deepest visited level.
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}

/// Walk the tree in pre-order, stopping at [`MAX_TREE_DEPTH`].
pub fn walk_tree(root: &StructureNode) -> TreeWalk<'_> {
    let mut nodes: Vec<VisitedNode<'_>> = Vec::new();
    let mut truncated = 0;
    let mut stack = vec![(root, 0usize, None::<usize>)];

    while let Some((node, depth, parent)) = stack.pop() {
        if depth >= MAX_TREE_DEPTH {
            truncated += subtree_size(node);
            continue;
        }

        let index = nodes.len();
        if let Some(p) = parent {
            nodes[p].visible_children += 1;
        }
        nodes.push(VisitedNode {
            node,
            depth,
            parent,
            visible_children: 0,
        });

        for child in node.children.iter().rev() {
            stack.push((child, depth + 1, Some(index)));
        }
    }

    if truncated > 0 {
        log::debug!("Structure tree truncated: {} node(s) below depth {}", truncated, MAX_TREE_DEPTH);
    }

    TreeWalk { nodes, truncated }
}

fn subtree_size(node: &StructureNode) -> usize {
    let mut count = 0;
    let mut stack = vec![node];
    while let Some(n) = stack.pop() {
        count += 1;
        stack.extend(n.children.iter());
    }
    count
}

/// A positioned node.
///
/// `x` grows with depth and `y` spreads siblings, both relative to the
/// inner drawing area.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub name: String,
    pub kind: NodeKind,
    pub description: Option<String>,
    pub depth: usize,
    pub parent: Option<usize>,
    pub has_children: bool,
    pub x: f64,
    pub y: f64,
}

/// Horizontal tidy-tree layout of a structure tree.
#[derive(Debug, Clone)]
pub struct TreeLayout {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<LayoutNode>,
    /// Nodes left out below the depth cap
    pub truncated: usize,
}

impl TreeLayout {
    /// Default drawing height for a given width.
    pub fn default_height(width: f64) -> f64 {
        (width * 0.6).max(400.0)
    }

    /// Lay out the tree for a drawing of `width` with the default height.
    pub fn for_width(root: &StructureNode, width: f64) -> Self {
        Self::compute(root, width, Self::default_height(width))
    }

    /// Lay out the tree in a `width` by `height` drawing.
    ///
    /// Depth maps to the horizontal axis. Leaves are placed in order with
    /// one unit between siblings and two between cousins, parents are
    /// centered over their first and last child, and the result is scaled
    /// to fill the inner area.
    pub fn compute(root: &StructureNode, width: f64, height: f64) -> Self {
        let walk = walk_tree(root);
        let count = walk.nodes.len();
        let inner_width = (width - MARGIN_LEFT - MARGIN_RIGHT).max(0.0);
        let inner_height = (height - MARGIN_TOP - MARGIN_BOTTOM).max(0.0);

        let mut first_child = vec![None; count];
        let mut last_child = vec![None; count];
        for (i, visited) in walk.nodes.iter().enumerate() {
            if let Some(p) = visited.parent {
                first_child[p].get_or_insert(i);
                last_child[p] = Some(i);
            }
        }

        let separation = |a: usize, b: usize| {
            if walk.nodes[a].parent == walk.nodes[b].parent {
                1.0
            } else {
                2.0
            }
        };

        let mut breadth = vec![0.0f64; count];
        let mut previous_leaf: Option<usize> = None;
        for (i, visited) in walk.nodes.iter().enumerate() {
            if visited.visible_children == 0 {
                breadth[i] = match previous_leaf {
                    Some(prev) => breadth[prev] + separation(prev, i),
                    None => 0.0,
                };
                previous_leaf = Some(i);
            }
        }
        // Children follow their parent in pre-order.
        for i in (0..count).rev() {
            if let (Some(first), Some(last)) = (first_child[i], last_child[i]) {
                breadth[i] = (breadth[first] + breadth[last]) / 2.0;
            }
        }

        let mut left = 0;
        let mut right = 0;
        for i in 0..count {
            if breadth[i] < breadth[left] {
                left = i;
            }
            if breadth[i] > breadth[right] {
                right = i;
            }
        }

        let pad = if left == right {
            1.0
        } else {
            separation(left, right) / 2.0
        };
        let offset = pad - breadth.get(left).copied().unwrap_or(0.0);
        let kx = inner_height / (breadth.get(right).copied().unwrap_or(0.0) + pad + offset);
        let ky = inner_width / walk.max_depth().max(1) as f64;

        let nodes = walk
            .nodes
            .iter()
            .enumerate()
            .map(|(i, visited)| LayoutNode {
                name: visited.node.name.clone(),
                kind: visited.node.kind,
                description: visited.node.description.clone(),
                depth: visited.depth,
                parent: visited.parent,
                has_children: visited.visible_children > 0,
                x: visited.depth as f64 * ky,
                y: (breadth[i] + offset) * kx,
            })
            .collect();

        TreeLayout {
            width,
            height,
            nodes,
            truncated: walk.truncated,
        }
    }

    /// Parent-child index pairs.
    pub fn links(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| node.parent.map(|p| (p, i)))
    }

    /// Render the layout as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\" font-size=\"12\">\n",
            w = num(self.width),
            h = num(self.height)
        );
        svg.push_str(&format!(
            "<g transform=\"translate({},{})\">\n",
            num(MARGIN_LEFT),
            num(MARGIN_TOP)
        ));

        for (p, c) in self.links() {
            let (source, target) = (&self.nodes[p], &self.nodes[c]);
            let mid = (source.x + target.x) / 2.0;
            svg.push_str(&format!(
                "<path class=\"link\" d=\"M{},{}C{},{} {},{} {},{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>\n",
                num(source.x),
                num(source.y),
                num(mid),
                num(source.y),
                num(mid),
                num(target.y),
                num(target.x),
                num(target.y),
                LINK_COLOR
            ));
        }

        for node in &self.nodes {
            let (label_x, anchor) = if node.has_children {
                (-LABEL_OFFSET, "end")
            } else {
                (LABEL_OFFSET, "start")
            };
            let tooltip = format!(
                "{}\n{}",
                node.name,
                node.description.as_deref().unwrap_or("")
            );

            svg.push_str(&format!(
                "<g class=\"node\" transform=\"translate({},{})\">\
                 <circle r=\"{}\" fill=\"{}\" stroke=\"#fff\" stroke-width=\"2\"/>\
                 <text dy=\".35em\" x=\"{}\" text-anchor=\"{}\">{}</text>\
                 <title>{}</title></g>\n",
                num(node.x),
                num(node.y),
                num(NODE_RADIUS),
                node.kind.color(),
                num(label_x),
                anchor,
                escape_xml(&truncate_label(&node.name)),
                escape_xml(&tooltip)
            ));
        }

        svg.push_str("</g>\n</svg>\n");
        svg
    }
}

/// Shorten a label to its first 15 characters plus `...`.
fn truncate_label(name: &str) -> String {
    if name.chars().count() > LABEL_MAX_CHARS {
        let head: String = name.chars().take(LABEL_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

/// Render the tree as an indented plain-text outline.
pub fn render_outline(root: &StructureNode) -> String {
    let walk = walk_tree(root);
    let mut output = String::new();

    for visited in &walk.nodes {
        let node = visited.node;
        output.push_str(&"  ".repeat(visited.depth));
        output.push_str(&format!("- {} [{}]", node.name, node.kind.label()));
        if let Some(description) = node.description.as_deref().filter(|d| !d.trim().is_empty()) {
            output.push_str(": ");
            output.push_str(description);
        }
        output.push('\n');
    }

    if walk.truncated > 0 {
        output.push_str(&format!(
            "({} deeper node(s) not shown)\n",
            walk.truncated
        ));
    }

    output
}
