pub mod html;
mod page;
mod stats;
mod tree;

pub use page::ReportPage;
pub use stats::{show_statistics, stat_cards_html, stat_label, StatsRecord};
pub use tree::{
    build_tree_html, Field, NodeId, NodeKind, TreeView, Unit, WellTree, COLLAPSED_GLYPH,
    EXPANDED_GLYPH,
};
