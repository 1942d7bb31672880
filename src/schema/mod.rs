//! Tagged schema types.
//!
//! A schema document is a map from section id to [`SectionSchema`] plus an
//! `order` list. It is resolved and validated once by [`SchemaMap`] and never
//! mutated while rendering; subsections reference other sections by id, so the
//! section graph may be cyclic.

mod load;
pub mod walk;

pub use load::SchemaError;

use crate::core::SectionId;
use indexmap::IndexMap;
use serde::Deserialize;

/// Section flags. Each flag is tri-state so nested sections can inherit the
/// parent's value for keys they leave unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Options {
    pub clickable: Option<bool>,
    pub editable: Option<bool>,
    pub collapsible: Option<bool>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clickable(mut self, value: bool) -> Self {
        self.clickable = Some(value);
        self
    }

    pub fn with_editable(mut self, value: bool) -> Self {
        self.editable = Some(value);
        self
    }

    pub fn with_collapsible(mut self, value: bool) -> Self {
        self.collapsible = Some(value);
        self
    }

    /// Per-key merge: keys set here win, unset keys fall back to `parent`.
    pub fn inherit(&self, parent: &Options) -> Options {
        Options {
            clickable: self.clickable.or(parent.clickable),
            editable: self.editable.or(parent.editable),
            collapsible: self.collapsible.or(parent.collapsible),
        }
    }

    pub fn is_clickable(&self) -> bool {
        self.clickable.unwrap_or(false)
    }

    pub fn is_editable(&self) -> bool {
        self.editable.unwrap_or(false)
    }

    pub fn is_collapsible(&self) -> bool {
        self.collapsible.unwrap_or(false)
    }
}

/// Storage type of numeric leaves (`type` in the schema document).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Float,
}

/// Element description of a `valarray` leaf.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemSpec {
    pub format: String,
    pub enumvals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeafSpec {
    pub id: String,
    pub title: String,
    pub format: String,
    pub edit_label: Option<String>,
    pub edit_suffix: Option<String>,
    pub value_kind: Option<ValueKind>,
    pub enumvals: Vec<String>,
    pub item: Option<ItemSpec>,
}

impl LeafSpec {
    pub fn new(id: impl Into<String>, title: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            format: format.into(),
            edit_label: None,
            edit_suffix: None,
            value_kind: None,
            enumvals: Vec::new(),
            item: None,
        }
    }

    pub fn with_enumvals(mut self, values: Vec<String>) -> Self {
        self.enumvals = values;
        self
    }

    pub fn with_value_kind(mut self, kind: ValueKind) -> Self {
        self.value_kind = Some(kind);
        self
    }

    /// Numeric storage type: the declared `type`, else integer for `int` and
    /// `hex`, float for everything else.
    pub fn storage(&self) -> ValueKind {
        self.value_kind.unwrap_or(match self.format.as_str() {
            "int" | "hex" => ValueKind::Int,
            _ => ValueKind::Float,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSpec {
    pub id: String,
    pub title: String,
    pub children: Vec<SchemaNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Leaf(LeafSpec),
    Group(GroupSpec),
}

impl SchemaNode {
    pub fn leaf(id: impl Into<String>, title: impl Into<String>, format: impl Into<String>) -> Self {
        Self::Leaf(LeafSpec::new(id, title, format))
    }

    pub fn group(id: impl Into<String>, title: impl Into<String>, children: Vec<SchemaNode>) -> Self {
        Self::Group(GroupSpec {
            id: id.into(),
            title: title.into(),
            children,
        })
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Leaf(leaf) => leaf.id.as_str(),
            Self::Group(group) => group.id.as_str(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Leaf(leaf) => leaf.title.as_str(),
            Self::Group(group) => group.title.as_str(),
        }
    }
}

/// Number of terminal leaves below `nodes`.
pub fn leaf_count(nodes: &[SchemaNode]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            SchemaNode::Leaf(_) => 1,
            SchemaNode::Group(group) => leaf_count(&group.children),
        })
        .sum()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubsectionRef {
    /// Key looked up in the parent row's record.
    pub id: String,
    pub section: SectionId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSection {
    pub title: Option<String>,
    pub options: Options,
    pub columns: Vec<SchemaNode>,
    pub subsections: Vec<SubsectionRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldsSection {
    pub title: Option<String>,
    pub options: Options,
    pub fields: Vec<SchemaNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionSchema {
    Table(TableSection),
    Fields(FieldsSection),
    /// A section whose `type` is neither `table` nor `fields`. Rendered as a
    /// visible placeholder.
    Unknown {
        type_name: String,
        title: Option<String>,
    },
}

impl SectionSchema {
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Table(table) => table.title.as_deref(),
            Self::Fields(fields) => fields.title.as_deref(),
            Self::Unknown { title, .. } => title.as_deref(),
        }
    }

    pub fn options(&self) -> Options {
        match self {
            Self::Table(table) => table.options,
            Self::Fields(fields) => fields.options,
            Self::Unknown { .. } => Options::default(),
        }
    }
}

/// Fully resolved schema graph.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaMap {
    order: Vec<SectionId>,
    sections: IndexMap<SectionId, SectionSchema>,
}

impl SchemaMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a section and appends it to the render order.
    pub fn with_section(mut self, id: impl Into<SectionId>, section: SectionSchema) -> Self {
        let id = id.into();
        self.order.push(id.clone());
        self.sections.insert(id, section);
        self
    }

    /// Adds a section that is only reachable as a subsection target.
    pub fn with_hidden_section(mut self, id: impl Into<SectionId>, section: SectionSchema) -> Self {
        self.sections.insert(id.into(), section);
        self
    }

    pub fn order(&self) -> &[SectionId] {
        self.order.as_slice()
    }

    pub fn section(&self, id: &str) -> Option<&SectionSchema> {
        self.sections.get(id)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&SectionId, &SectionSchema)> {
        self.sections.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{LeafSpec, Options, SchemaNode, ValueKind, leaf_count};

    #[test]
    fn options_inherit_per_key() {
        let parent = Options::new().with_editable(true).with_collapsible(true);
        let child = Options::new().with_collapsible(false);

        let merged = child.inherit(&parent);
        assert!(merged.is_editable());
        assert!(!merged.is_collapsible());
        assert!(!merged.is_clickable());
    }

    #[test]
    fn storage_follows_declared_type_then_format() {
        assert_eq!(LeafSpec::new("t", "T", "int").storage(), ValueKind::Int);
        assert_eq!(LeafSpec::new("s", "S", "siprefix").storage(), ValueKind::Float);
        let seed = LeafSpec::new("seed", "Seed", "siprefix").with_value_kind(ValueKind::Int);
        assert_eq!(seed.storage(), ValueKind::Int);
    }

    #[test]
    fn leaf_count_descends_into_groups() {
        let nodes = vec![
            SchemaNode::leaf("a", "A", "int"),
            SchemaNode::group(
                "g",
                "G",
                vec![
                    SchemaNode::leaf("x", "x", "int"),
                    SchemaNode::group("empty", "E", Vec::new()),
                    SchemaNode::leaf("y", "y", "int"),
                ],
            ),
        ];
        assert_eq!(leaf_count(&nodes), 3);
    }
}
