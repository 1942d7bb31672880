use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use super::{
    FieldsSection, GroupSpec, ItemSpec, LeafSpec, Options, SchemaMap, SchemaNode, SectionSchema,
    SubsectionRef, TableSection, ValueKind,
};
use crate::core::SectionId;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid schema json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid schema yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("schema document must be an object with an `order` list")]
    NotAMap,
    #[error("section `{section}`: {source}")]
    Section {
        section: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("`order` names unknown section `{0}`")]
    UnknownOrderEntry(String),
    #[error("section `{section}` has a subsection pointing at unknown section `{target}`")]
    UnknownSubsectionTarget { section: String, target: String },
    #[error("section `{section}` declares `{id}` twice among siblings")]
    DuplicateId { section: String, id: String },
}

#[derive(Debug, Deserialize)]
struct RawSection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    options: Options,
    #[serde(default)]
    columns: Vec<RawNode>,
    #[serde(default)]
    fields: Vec<RawNode>,
    #[serde(default)]
    subsections: Vec<RawSubsection>,
}

#[derive(Debug, Deserialize)]
struct RawSubsection {
    id: String,
    schema: String,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    subfields: Option<Vec<RawNode>>,
    #[serde(default)]
    columns: Option<Vec<RawNode>>,
    #[serde(default)]
    editlabel: Option<String>,
    #[serde(default)]
    editsuffix: Option<String>,
    #[serde(default, rename = "type")]
    value_type: Option<String>,
    #[serde(default)]
    enumvals: Vec<String>,
    #[serde(default)]
    item: Option<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    enumvals: Vec<String>,
}

impl SchemaMap {
    pub fn from_json_str(input: &str) -> Result<Self, SchemaError> {
        let raw: serde_json::Value = serde_json::from_str(input)?;
        Self::from_json_value(raw)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, SchemaError> {
        let raw: serde_json::Value = serde_yaml::from_str(input)?;
        Self::from_json_value(raw)
    }

    pub fn from_json_value(raw: serde_json::Value) -> Result<Self, SchemaError> {
        let serde_json::Value::Object(mut map) = raw else {
            return Err(SchemaError::NotAMap);
        };
        let order: Vec<String> = match map.remove("order") {
            Some(order) => serde_json::from_value(order)?,
            None => return Err(SchemaError::NotAMap),
        };

        let mut sections = IndexMap::<SectionId, SectionSchema>::new();
        for (id, body) in map {
            let raw: RawSection = serde_json::from_value(body).map_err(|source| {
                SchemaError::Section {
                    section: id.clone(),
                    source,
                }
            })?;
            let section = resolve_section(id.as_str(), raw)?;
            sections.insert(SectionId::from(id), section);
        }

        for id in &order {
            if !sections.contains_key(id.as_str()) {
                return Err(SchemaError::UnknownOrderEntry(id.clone()));
            }
        }
        for (id, section) in &sections {
            let SectionSchema::Table(table) = section else {
                continue;
            };
            for sub in &table.subsections {
                if !sections.contains_key(sub.section.as_str()) {
                    return Err(SchemaError::UnknownSubsectionTarget {
                        section: id.to_string(),
                        target: sub.section.to_string(),
                    });
                }
            }
        }

        Ok(Self {
            order: order.into_iter().map(SectionId::from).collect(),
            sections,
        })
    }
}

fn resolve_section(id: &str, raw: RawSection) -> Result<SectionSchema, SchemaError> {
    Ok(match raw.kind.as_str() {
        "table" => SectionSchema::Table(TableSection {
            title: raw.title,
            options: raw.options,
            columns: resolve_nodes(id, raw.columns)?,
            subsections: raw
                .subsections
                .into_iter()
                .map(|sub| SubsectionRef {
                    id: sub.id,
                    section: SectionId::from(sub.schema),
                })
                .collect(),
        }),
        "fields" => SectionSchema::Fields(FieldsSection {
            title: raw.title,
            options: raw.options,
            fields: resolve_nodes(id, raw.fields)?,
        }),
        other => SectionSchema::Unknown {
            type_name: other.to_string(),
            title: raw.title,
        },
    })
}

fn resolve_nodes(section: &str, raw: Vec<RawNode>) -> Result<Vec<SchemaNode>, SchemaError> {
    let mut seen = HashSet::<String>::new();
    let mut nodes = Vec::with_capacity(raw.len());
    for node in raw {
        if !seen.insert(node.id.clone()) {
            return Err(SchemaError::DuplicateId {
                section: section.to_string(),
                id: node.id,
            });
        }
        nodes.push(resolve_node(section, node)?);
    }
    Ok(nodes)
}

fn resolve_node(section: &str, raw: RawNode) -> Result<SchemaNode, SchemaError> {
    if let Some(children) = raw.subfields.or(raw.columns) {
        return Ok(SchemaNode::Group(GroupSpec {
            id: raw.id,
            title: raw.title,
            children: resolve_nodes(section, children)?,
        }));
    }

    let value_kind = match raw.value_type.as_deref() {
        Some("int") => Some(ValueKind::Int),
        Some("float") => Some(ValueKind::Float),
        _ => None,
    };
    Ok(SchemaNode::Leaf(LeafSpec {
        id: raw.id,
        title: raw.title,
        format: raw.format.unwrap_or_default(),
        edit_label: raw.editlabel,
        edit_suffix: raw.editsuffix,
        value_kind,
        enumvals: raw.enumvals,
        item: raw.item.map(|item| ItemSpec {
            format: item.format.unwrap_or_default(),
            enumvals: item.enumvals,
        }),
    }))
}

#[cfg(test)]
mod tests {
    use super::SchemaError;
    use crate::schema::{SchemaMap, SchemaNode, SectionSchema, ValueKind};
    use serde_json::json;

    fn bodies_schema() -> serde_json::Value {
        json!({
            "order": ["system", "bodies"],
            "system": {
                "type": "fields",
                "title": "System Properties",
                "options": {"editable": true},
                "fields": [
                    {"id": "name", "title": "System name", "format": "string"},
                    {"id": "sector", "title": "Sector", "subfields": [
                        {"id": "x", "title": "x", "format": "int", "selector": ["sector_coord", 0]},
                        {"id": "y", "title": "y", "format": "int"}
                    ]}
                ]
            },
            "bodies": {
                "type": "table",
                "title": "System Bodies",
                "options": {"collapsible": true, "editable": true},
                "columns": [
                    {"id": "name", "title": "Body name", "format": "string"},
                    {"id": "radius", "title": "Radius", "format": "siprefix", "type": "float",
                     "editlabel": "Relative to Sun/Earth"},
                    {"id": "seed", "title": "Seed", "format": "hex", "type": "int"}
                ],
                "subsections": [
                    {"id": "sattelites", "schema": "bodies"},
                    {"id": "starports", "schema": "starports"}
                ]
            },
            "starports": {
                "type": "table",
                "title": "Surface starports",
                "options": {"collapsible": false},
                "columns": [{"id": "name", "title": "Body name", "format": "string"}]
            }
        })
    }

    #[test]
    fn loads_cyclic_section_graph() {
        let schema = SchemaMap::from_json_value(bodies_schema()).expect("schema should load");
        let order: Vec<&str> = schema.order().iter().map(|id| id.as_str()).collect();
        assert_eq!(order, vec!["system", "bodies"]);

        let Some(SectionSchema::Table(bodies)) = schema.section("bodies") else {
            panic!("bodies should be a table");
        };
        assert_eq!(bodies.subsections[0].section.as_str(), "bodies");
        assert_eq!(bodies.options.collapsible, Some(true));
        let SchemaNode::Leaf(radius) = &bodies.columns[1] else {
            panic!("radius should be a leaf");
        };
        assert_eq!(radius.value_kind, Some(ValueKind::Float));
        assert_eq!(radius.edit_label.as_deref(), Some("Relative to Sun/Earth"));
        assert!(schema.section("starports").is_some());
    }

    #[test]
    fn subfields_become_groups() {
        let schema = SchemaMap::from_json_value(bodies_schema()).expect("schema should load");
        let Some(SectionSchema::Fields(system)) = schema.section("system") else {
            panic!("system should be a field list");
        };
        let SchemaNode::Group(sector) = &system.fields[1] else {
            panic!("sector should be a group");
        };
        assert_eq!(sector.children.len(), 2);
    }

    #[test]
    fn unknown_type_is_not_a_load_error() {
        let schema = SchemaMap::from_json_value(json!({
            "order": ["chart"],
            "chart": {"type": "chart", "title": "Orbits"}
        }))
        .expect("schema should load");
        assert!(matches!(
            schema.section("chart"),
            Some(SectionSchema::Unknown { type_name, .. }) if type_name == "chart"
        ));
    }

    #[test]
    fn rejects_dangling_subsection_target() {
        let err = SchemaMap::from_json_value(json!({
            "order": ["bodies"],
            "bodies": {
                "type": "table",
                "columns": [],
                "subsections": [{"id": "moons", "schema": "moons"}]
            }
        }))
        .expect_err("dangling reference");
        assert!(matches!(err, SchemaError::UnknownSubsectionTarget { target, .. } if target == "moons"));
    }

    #[test]
    fn rejects_duplicate_sibling_ids() {
        let err = SchemaMap::from_json_value(json!({
            "order": ["t"],
            "t": {"type": "table", "columns": [
                {"id": "a", "title": "A", "format": "int"},
                {"id": "a", "title": "A again", "format": "int"}
            ]}
        }))
        .expect_err("duplicate id");
        assert!(matches!(err, SchemaError::DuplicateId { id, .. } if id == "a"));
    }

    #[test]
    fn rejects_order_entry_without_section() {
        let err = SchemaMap::from_json_value(json!({"order": ["missing"]})).expect_err("missing");
        assert!(matches!(err, SchemaError::UnknownOrderEntry(id) if id == "missing"));
    }

    #[test]
    fn yaml_documents_load_the_same_way() {
        let schema = SchemaMap::from_yaml_str(
            "order: [systems]\nsystems:\n  type: table\n  options: {clickable: true}\n  columns:\n    - {id: name, title: Name, format: string}\n",
        )
        .expect("yaml schema");
        assert!(schema.section("systems").is_some_and(|s| s.options().is_clickable()));
    }
}
