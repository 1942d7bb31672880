use super::{GroupSpec, LeafSpec, SchemaNode};

/// Callbacks for [`walk`]. Visitors carry all the state (column cursor,
/// data-path stack, ...); the walk itself keeps none.
pub trait SchemaVisitor<'s> {
    fn terminal(&mut self, leaf: &'s LeafSpec);

    fn enter_group(&mut self, _group: &'s GroupSpec) {}

    fn exit_group(&mut self, _group: &'s GroupSpec) {}
}

/// Depth-first traversal in declaration order: `enter_group` pre-order,
/// `exit_group` post-order, every node exactly once.
pub fn walk<'s, V>(nodes: &'s [SchemaNode], visitor: &mut V)
where
    V: SchemaVisitor<'s> + ?Sized,
{
    for node in nodes {
        match node {
            SchemaNode::Leaf(leaf) => visitor.terminal(leaf),
            SchemaNode::Group(group) => {
                visitor.enter_group(group);
                walk(&group.children, visitor);
                visitor.exit_group(group);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SchemaVisitor, walk};
    use crate::schema::{GroupSpec, LeafSpec, SchemaNode};

    #[derive(Default)]
    struct Trace(Vec<String>);

    impl<'s> SchemaVisitor<'s> for Trace {
        fn terminal(&mut self, leaf: &'s LeafSpec) {
            self.0.push(leaf.id.clone());
        }

        fn enter_group(&mut self, group: &'s GroupSpec) {
            self.0.push(format!("+{}", group.id));
        }

        fn exit_group(&mut self, group: &'s GroupSpec) {
            self.0.push(format!("-{}", group.id));
        }
    }

    #[test]
    fn visits_in_order_with_enter_and_exit() {
        let nodes = vec![
            SchemaNode::leaf("a", "A", "int"),
            SchemaNode::group(
                "g",
                "G",
                vec![
                    SchemaNode::leaf("x", "x", "int"),
                    SchemaNode::group("h", "H", vec![SchemaNode::leaf("y", "y", "int")]),
                ],
            ),
            SchemaNode::group("empty", "E", Vec::new()),
            SchemaNode::leaf("b", "B", "text"),
        ];

        let mut trace = Trace::default();
        walk(&nodes, &mut trace);
        assert_eq!(
            trace.0,
            vec!["a", "+g", "x", "+h", "y", "-h", "-g", "+empty", "-empty", "b"]
        );
    }
}
