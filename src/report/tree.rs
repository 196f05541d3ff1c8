//! Field → unit → well hierarchy and its collapsible rendering.

use super::html::escape;
use crate::error::Error;
use serde::{de, Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt::Write;

pub const COLLAPSED_GLYPH: &str = "▶";
pub const EXPANDED_GLYPH: &str = "▼";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WellTree {
    fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub units: Vec<Unit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub name: String,
    pub wells: Vec<String>,
}

impl WellTree {
    /// Reads `{field: {unit: [well, ...]}}`, keeping the object's key order.
    pub fn from_json(value: &Value) -> Result<Self, Error> {
        let fields = value
            .as_object()
            .ok_or_else(|| Error::InvalidTree("expected an object of fields".into()))?;

        let mut tree = Self::default();
        for (field_name, units) in fields {
            let units = units.as_object().ok_or_else(|| {
                Error::InvalidTree(format!("field {:?} is not an object of units", field_name))
            })?;

            let mut field = Field {
                name: field_name.clone(),
                units: Vec::with_capacity(units.len()),
            };
            for (unit_name, wells) in units {
                let wells = wells.as_array().ok_or_else(|| {
                    Error::InvalidTree(format!("unit {:?} is not a list of wells", unit_name))
                })?;
                let wells = wells
                    .iter()
                    .map(|well| {
                        well.as_str().map(str::to_string).ok_or_else(|| {
                            Error::InvalidTree(format!(
                                "unit {:?} has a non-string well: {}",
                                unit_name, well
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                field.units.push(Unit {
                    name: unit_name.clone(),
                    wells,
                });
            }
            tree.fields.push(field);
        }

        Ok(tree)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn unit_count(&self) -> usize {
        self.fields.iter().map(|f| f.units.len()).sum()
    }

    pub fn well_count(&self) -> usize {
        self.fields
            .iter()
            .flat_map(|f| f.units.iter())
            .map(|u| u.wells.len())
            .sum()
    }
}

impl<'de> Deserialize<'de> for WellTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        WellTree::from_json(&Value::Object(map)).map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Field,
    Unit,
    Well,
}

#[derive(Debug, Clone)]
struct ViewNode {
    kind: NodeKind,
    label: String,
    children: Vec<NodeId>,
    expanded: bool,
}

/// Interactive view over a [`WellTree`]. Field and unit nodes own a
/// collapsible children block; every block starts collapsed.
#[derive(Debug, Clone, Default)]
pub struct TreeView {
    nodes: Vec<ViewNode>,
    roots: Vec<NodeId>,
}

impl TreeView {
    pub fn new(tree: &WellTree) -> Self {
        let mut view = Self::default();
        for field in tree.fields() {
            let unit_ids = field
                .units
                .iter()
                .map(|unit| {
                    let well_ids = unit
                        .wells
                        .iter()
                        .map(|well| view.push(NodeKind::Well, well, Vec::new()))
                        .collect();
                    view.push(NodeKind::Unit, &unit.name, well_ids)
                })
                .collect();
            let field_id = view.push(NodeKind::Field, &field.name, unit_ids);
            view.roots.push(field_id);
        }
        view
    }

    fn push(&mut self, kind: NodeKind, label: &str, children: Vec<NodeId>) -> NodeId {
        self.nodes.push(ViewNode {
            kind,
            label: label.to_string(),
            children,
            expanded: false,
        });
        NodeId(self.nodes.len() - 1)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.nodes.get(id.0).map(|n| n.kind)
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.0).map(|n| n.label.as_str())
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.nodes.get(id.0).map_or(false, |n| n.expanded)
    }

    /// Disclosure glyph of a collapsible node, `None` for wells.
    pub fn glyph(&self, id: NodeId) -> Option<&'static str> {
        match self.nodes.get(id.0) {
            Some(node) if node.kind != NodeKind::Well => Some(if node.expanded {
                EXPANDED_GLYPH
            } else {
                COLLAPSED_GLYPH
            }),
            _ => None,
        }
    }

    /// Flips the children block of `id` and its glyph.
    ///
    /// Returns `false` without changing anything when `id` has no
    /// collapsible block (wells, unknown ids).
    pub fn toggle(&mut self, id: NodeId) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(node) if node.kind != NodeKind::Well => {
                node.expanded = !node.expanded;
                tracing::debug!(node = id.0, label = %node.label, expanded = node.expanded, "toggled tree node");
                true
            }
            _ => false,
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from(r#"<div class="tree-structure">"#);
        for &root in &self.roots {
            self.write_node(&mut html, root);
        }
        html.push_str("</div>");
        html
    }

    fn write_node(&self, html: &mut String, id: NodeId) {
        let node = &self.nodes[id.0];
        let label = escape(&node.label);

        // Writing to a String cannot fail.
        let _ = match node.kind {
            NodeKind::Field => write!(
                html,
                r#"<div class="tree-node field-node"><span class="tree-toggle" data-node="{}">{}</span><strong>{}</strong> ({}个单元)</div>"#,
                id.0,
                self.glyph(id).unwrap_or(COLLAPSED_GLYPH),
                label,
                node.children.len()
            ),
            NodeKind::Unit => write!(
                html,
                r#"<div class="tree-node unit-node"><span class="tree-toggle" data-node="{}">{}</span>{} ({}口井)</div>"#,
                id.0,
                self.glyph(id).unwrap_or(COLLAPSED_GLYPH),
                label,
                node.children.len()
            ),
            NodeKind::Well => write!(
                html,
                r#"<div class="tree-node well-node" style="margin-left: 40px;"><span style="color: #999;">●</span> {}</div>"#,
                label
            ),
        };

        if node.kind != NodeKind::Well {
            let display = if node.expanded { "block" } else { "none" };
            let _ = write!(
                html,
                r#"<div class="tree-children" style="display: {};">"#,
                display
            );
            for &child in &node.children {
                self.write_node(html, child);
            }
            html.push_str("</div>");
        }
    }
}

/// Renders `tree` with every level collapsed.
pub fn build_tree_html(tree: &WellTree) -> String {
    TreeView::new(tree).to_html()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_tree() -> WellTree {
        WellTree::from_json(&json!({"F1": {"U1": ["W1", "W2"]}})).unwrap()
    }

    #[test]
    fn test_empty_tree_html() {
        assert_eq!(
            build_tree_html(&WellTree::default()),
            r#"<div class="tree-structure"></div>"#
        );
    }

    #[test]
    fn test_single_field_html() {
        let html = build_tree_html(&sample_tree());

        assert_eq!(html.matches("field-node").count(), 1);
        assert_eq!(html.matches("unit-node").count(), 1);
        assert_eq!(html.matches("well-node").count(), 2);
        assert!(html.contains("<strong>F1</strong> (1个单元)"));
        assert!(html.contains("U1 (2口井)"));

        let w1 = html.find("</span> W1</div>").unwrap();
        let w2 = html.find("</span> W2</div>").unwrap();
        assert!(w1 < w2);
        assert_eq!(html.matches(r#"style="display: none;""#).count(), 2);
        assert!(!html.contains(EXPANDED_GLYPH));
    }

    #[test]
    fn test_key_order_preserved() {
        let tree = WellTree::from_json(&json!({
            "Zeta": {"U9": ["W9"]},
            "Alpha": {"U2": [], "U1": ["W1"]}
        }))
        .unwrap();

        let names: Vec<_> = tree.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Zeta", "Alpha"]);
        let units: Vec<_> = tree.fields()[1].units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(units, ["U2", "U1"]);

        let html = build_tree_html(&tree);
        assert!(html.find("Zeta").unwrap() < html.find("Alpha").unwrap());
        assert!(html.contains("U2 (0口井)"));
    }

    #[test]
    fn test_names_are_escaped() {
        let tree = WellTree::from_json(&json!({"<b>F</b>": {"U&1": ["<script>x</script>"]}})).unwrap();
        let html = build_tree_html(&tree);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;b&gt;F&lt;/b&gt;"));
        assert!(html.contains("U&amp;1"));
    }

    #[test]
    fn test_rejects_malformed_tree() {
        assert!(matches!(
            WellTree::from_json(&json!(["F1"])),
            Err(Error::InvalidTree(_))
        ));
        assert!(matches!(
            WellTree::from_json(&json!({"F1": ["U1"]})),
            Err(Error::InvalidTree(_))
        ));
        assert!(matches!(
            WellTree::from_json(&json!({"F1": {"U1": [1, 2]}})),
            Err(Error::InvalidTree(_))
        ));
    }

    #[test]
    fn test_deserialize_from_response() {
        let tree: WellTree =
            serde_json::from_str(r#"{"F1": {"U1": ["W1"], "U2": ["W2", "W3"]}}"#).unwrap();
        assert_eq!(tree.field_count(), 1);
        assert_eq!(tree.unit_count(), 2);
        assert_eq!(tree.well_count(), 3);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut view = TreeView::new(&sample_tree());
        let field = view.roots()[0];
        let before = view.to_html();

        assert!(view.toggle(field));
        assert!(view.is_expanded(field));
        assert_eq!(view.glyph(field), Some(EXPANDED_GLYPH));
        let expanded = view.to_html();
        assert!(expanded.contains(r#"style="display: block;""#));
        assert!(expanded.contains(EXPANDED_GLYPH));

        assert!(view.toggle(field));
        assert_eq!(view.glyph(field), Some(COLLAPSED_GLYPH));
        assert_eq!(view.to_html(), before);
    }

    #[test]
    fn test_toggle_unit_is_independent() {
        let mut view = TreeView::new(&sample_tree());
        let field = view.roots()[0];
        let unit = view.children(field)[0];

        assert!(view.toggle(unit));
        assert!(view.is_expanded(unit));
        assert!(!view.is_expanded(field));
    }

    #[test]
    fn test_toggle_well_is_noop() {
        let mut view = TreeView::new(&sample_tree());
        let unit = view.children(view.roots()[0])[0];
        let well = view.children(unit)[0];
        let before = view.to_html();

        assert_eq!(view.kind(well), Some(NodeKind::Well));
        assert!(!view.toggle(well));
        assert!(!view.toggle(NodeId(999)));
        assert_eq!(view.glyph(well), None);
        assert_eq!(view.to_html(), before);
    }
}
