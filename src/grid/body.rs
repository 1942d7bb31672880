use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::grid::merge_grid::{MergeRule, SparseGrid};
use crate::schema::walk::{SchemaVisitor, walk};
use crate::schema::{GroupSpec, LeafSpec, SchemaNode};

/// One merged body cell: the leaf it renders, the raw value found in the
/// record and the absolute path that value lives at.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyCell<'s> {
    pub leaf: &'s LeafSpec,
    pub value: Value,
    pub path: ValuePath,
    pub col: usize,
    pub rowspan: usize,
    pub colspan: usize,
}

/// All grid rows produced by one data record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BodyUnit<'s> {
    pub rows: Vec<Vec<BodyCell<'s>>>,
    pub column_count: usize,
}

impl<'s> BodyUnit<'s> {
    pub fn cells(&self) -> impl Iterator<Item = &BodyCell<'s>> {
        self.rows.iter().flatten()
    }
}

#[derive(Debug, Clone)]
struct Seed<'s> {
    leaf: &'s LeafSpec,
    value: Value,
    path: ValuePath,
}

#[derive(Debug, Clone)]
struct Slot<'v> {
    row: usize,
    record: Option<&'v Value>,
    path: ValuePath,
}

struct BodyBuilder<'s, 'v> {
    grid: SparseGrid<Seed<'s>>,
    stack: Vec<Vec<Slot<'v>>>,
    col: usize,
}

impl<'s, 'v> SchemaVisitor<'s> for BodyBuilder<'s, 'v> {
    fn terminal(&mut self, leaf: &'s LeafSpec) {
        let Some(slots) = self.stack.last() else {
            return;
        };
        for slot in slots {
            let value = slot
                .record
                .and_then(|record| record.get(leaf.id.as_str()))
                .cloned()
                .unwrap_or(Value::Null);
            self.grid.set(
                slot.row,
                self.col,
                Seed {
                    leaf,
                    value,
                    path: slot.path.key(leaf.id.as_str()),
                },
            );
        }
        self.col += 1;
    }

    fn enter_group(&mut self, group: &'s GroupSpec) {
        let parents = self.stack.last().cloned().unwrap_or_default();
        let mut slots = Vec::with_capacity(parents.len());
        for parent in parents {
            let path = parent.path.key(group.id.as_str());
            let child = parent
                .record
                .and_then(|record| record.get(group.id.as_str()));
            match child {
                Some(Value::List(items)) => {
                    let mut row = parent.row;
                    for (idx, item) in items.iter().enumerate() {
                        slots.push(Slot {
                            row,
                            record: Some(item),
                            path: path.index(idx),
                        });
                        row += record_height(&group.children, Some(item));
                    }
                }
                other => slots.push(Slot {
                    row: parent.row,
                    record: other,
                    path,
                }),
            }
        }
        self.stack.push(slots);
    }

    fn exit_group(&mut self, _group: &'s GroupSpec) {
        self.stack.pop();
    }
}

/// Grid rows `record` needs under `nodes`: list-valued groups stack their
/// elements vertically, everything else shares the row.
pub fn record_height(nodes: &[SchemaNode], record: Option<&Value>) -> usize {
    nodes
        .iter()
        .filter_map(|node| match node {
            SchemaNode::Group(group) => Some(group),
            SchemaNode::Leaf(_) => None,
        })
        .map(|group| {
            let child = record.and_then(|record| record.get(group.id.as_str()));
            match child {
                Some(Value::List(items)) => items
                    .iter()
                    .map(|item| record_height(&group.children, Some(item)))
                    .sum(),
                other => record_height(&group.children, other),
            }
        })
        .fold(1, usize::max)
}

/// Lays out one data record under `columns`. `base` is the absolute path of
/// `record` in the data tree; every cell path extends it.
pub fn layout_record<'s>(columns: &'s [SchemaNode], record: &Value, base: &ValuePath) -> BodyUnit<'s> {
    let mut builder = BodyBuilder {
        grid: SparseGrid::new(),
        stack: vec![vec![Slot {
            row: 0,
            record: Some(record),
            path: base.clone(),
        }]],
        col: 0,
    };
    walk(columns, &mut builder);

    let column_count = builder.col.max(builder.grid.col_count());
    let mut rows: Vec<Vec<BodyCell<'s>>> = vec![Vec::new(); builder.grid.row_count()];
    for placed in builder.grid.merged(MergeRule::Adjacent, column_count) {
        rows[placed.row].push(BodyCell {
            leaf: placed.value.leaf,
            value: placed.value.value.clone(),
            path: placed.value.path.clone(),
            col: placed.col,
            rowspan: placed.rowspan,
            colspan: placed.colspan,
        });
    }

    BodyUnit { rows, column_count }
}

#[cfg(test)]
mod tests {
    use super::{layout_record, record_height};
    use crate::core::value::Value;
    use crate::core::value_path::ValuePath;
    use crate::schema::SchemaNode;
    use serde_json::json;

    fn spans(unit: &super::BodyUnit<'_>) -> Vec<Vec<(String, usize, usize)>> {
        unit.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| (cell.value.to_string(), cell.rowspan, cell.colspan))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn flat_record_is_one_row() {
        let columns = vec![
            SchemaNode::leaf("a", "A", "int"),
            SchemaNode::leaf("b", "B", "text"),
        ];
        let record = Value::from_json(json!({"a": 5, "b": "x"}));
        let unit = layout_record(&columns, &record, &ValuePath::root().key("rows").index(0));

        assert_eq!(unit.column_count, 2);
        assert_eq!(
            spans(&unit),
            vec![vec![("5".to_string(), 1, 1), ("x".to_string(), 1, 1)]]
        );
        assert_eq!(unit.rows[0][1].path.to_string(), "rows[0].b");
    }

    #[test]
    fn object_groups_stay_on_the_row() {
        let columns = vec![
            SchemaNode::leaf("name", "Name", "string"),
            SchemaNode::group(
                "sector",
                "Sector",
                vec![
                    SchemaNode::leaf("x", "x", "int"),
                    SchemaNode::leaf("y", "y", "int"),
                ],
            ),
        ];
        let record = Value::from_json(json!({"name": "Sol", "sector": {"x": 0, "y": -1}}));
        let unit = layout_record(&columns, &record, &ValuePath::root());

        assert_eq!(unit.rows.len(), 1);
        assert_eq!(unit.rows[0][2].path.to_string(), "sector.y");
        assert_eq!(unit.rows[0][2].value, Value::Int(-1));
    }

    #[test]
    fn absent_group_yields_null_cells() {
        let columns = vec![SchemaNode::group(
            "rings",
            "Rings",
            vec![
                SchemaNode::leaf("min_radius", "Min", "float"),
                SchemaNode::leaf("max_radius", "Max", "float"),
            ],
        )];
        let record = Value::from_json(json!({"name": "Earth"}));
        let unit = layout_record(&columns, &record, &ValuePath::root());

        assert_eq!(unit.rows[0].len(), 2);
        assert!(unit.cells().all(|cell| cell.value.is_null()));
    }

    #[test]
    fn list_groups_expand_into_sub_rows() {
        let columns = vec![
            SchemaNode::leaf("name", "Name", "string"),
            SchemaNode::group(
                "ports",
                "Ports",
                vec![
                    SchemaNode::leaf("port", "Port", "string"),
                    SchemaNode::leaf("lat", "Lat", "float"),
                ],
            ),
            SchemaNode::leaf("mass", "Mass", "float"),
        ];
        let record = Value::from_json(json!({
            "name": "Earth",
            "ports": [{"port": "A", "lat": 1.5}, {"port": "B", "lat": -2.5}],
            "mass": 1.0
        }));
        let unit = layout_record(&columns, &record, &ValuePath::root());

        assert_eq!(
            spans(&unit),
            vec![
                vec![
                    ("Earth".to_string(), 2, 1),
                    ("A".to_string(), 1, 1),
                    ("1.5".to_string(), 1, 1),
                    ("1".to_string(), 2, 1),
                ],
                vec![("B".to_string(), 1, 1), ("-2.5".to_string(), 1, 1)],
            ]
        );
        assert_eq!(unit.rows[1][0].path.to_string(), "ports[1].port");
    }

    #[test]
    fn empty_list_is_absorbed_by_neighbours() {
        let columns = vec![
            SchemaNode::leaf("name", "Name", "string"),
            SchemaNode::group("ports", "Ports", vec![SchemaNode::leaf("port", "Port", "string")]),
        ];
        let record = Value::from_json(json!({"name": "Mars", "ports": []}));
        let unit = layout_record(&columns, &record, &ValuePath::root());

        assert_eq!(unit.column_count, 2);
        assert_eq!(spans(&unit), vec![vec![("Mars".to_string(), 1, 2)]]);
    }

    #[test]
    fn nested_lists_do_not_collide() {
        let columns = vec![SchemaNode::group(
            "outer",
            "Outer",
            vec![
                SchemaNode::leaf("id", "Id", "int"),
                SchemaNode::group("inner", "Inner", vec![SchemaNode::leaf("v", "V", "int")]),
            ],
        )];
        let record = Value::from_json(json!({"outer": [
            {"id": 1, "inner": [{"v": 10}, {"v": 11}]},
            {"id": 2, "inner": [{"v": 20}]}
        ]}));

        assert_eq!(record_height(&columns, Some(&record)), 3);
        let unit = layout_record(&columns, &record, &ValuePath::root());
        assert_eq!(
            spans(&unit),
            vec![
                vec![("1".to_string(), 2, 1), ("10".to_string(), 1, 1)],
                vec![("11".to_string(), 1, 1)],
                vec![("2".to_string(), 1, 1), ("20".to_string(), 1, 1)],
            ]
        );
    }

    #[test]
    fn cell_paths_reproduce_the_record() {
        let columns = vec![
            SchemaNode::leaf("name", "Name", "string"),
            SchemaNode::group(
                "coord",
                "Coordinates",
                vec![
                    SchemaNode::leaf("x", "x", "float"),
                    SchemaNode::leaf("y", "y", "float"),
                ],
            ),
            SchemaNode::group(
                "ports",
                "Ports",
                vec![SchemaNode::leaf("port", "Port", "string")],
            ),
            SchemaNode::leaf("seed", "Seed", "hex"),
        ];
        let record = Value::from_json(json!({
            "name": "Sol",
            "coord": {"x": 0.25, "y": -3.0},
            "ports": [{"port": "Abraham Lincoln"}, {"port": "Mars High"}],
            "seed": 4660
        }));
        let unit = layout_record(&columns, &record, &ValuePath::root());

        let mut rebuilt = Value::Null;
        for cell in unit.cells() {
            rebuilt.set_path(&cell.path, cell.value.clone());
        }
        assert_eq!(rebuilt, record);
    }
}
