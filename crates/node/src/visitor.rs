//! Depth-first tree traversal
//!
//! [`ConfigNode::visit`] drives a [`Visitor`] over a tree with an explicit
//! work list, so arbitrarily deep trees never recurse. Emitters implement the
//! trait instead of walking children by hand.
//!
//! Event order for `{a: 1, b: [2]}`:
//!
//! ```text
//! begin_visit(root)
//! enter_node(root)  enter_mapping_node(root)
//! enter_node(a)     enter_scalar_node(a)
//! enter_node(b)     enter_list_node(b)
//! enter_node(b[0])  enter_scalar_node(b[0])
//! exit_list_node(b)
//! exit_mapping_node(root)
//! end_visit()
//! ```
//!
//! A null node only gets `enter_node`. Children are read when their parent is
//! entered; concurrent writers may or may not be observed.

use crate::node::ConfigNode;
use crate::value::{Value, ValueType};

/// Callbacks for [`ConfigNode::visit`]
///
/// Every hook except [`end_visit`](Visitor::end_visit) defaults to a no-op.
/// Returning an error from any hook stops the traversal and is passed back to
/// the caller. Visitors that cannot fail use [`std::convert::Infallible`].
pub trait Visitor {
    /// Result produced when the traversal completes
    type Output;
    /// Error a hook may raise
    type Error;

    /// Called once, before any node event
    fn begin_visit(&mut self, _root: &ConfigNode) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called for every node reached, before its shape-specific hook
    fn enter_node(&mut self, _node: &ConfigNode) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called after `enter_node` for a map; its children follow
    fn enter_mapping_node(&mut self, _node: &ConfigNode) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called after `enter_node` for a list; its elements follow
    fn enter_list_node(&mut self, _node: &ConfigNode) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called after `enter_node` for a scalar
    fn enter_scalar_node(&mut self, _node: &ConfigNode) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called once every child of a map has been visited
    fn exit_mapping_node(&mut self, _node: &ConfigNode) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called once every element of a list has been visited
    fn exit_list_node(&mut self, _node: &ConfigNode) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called once, after the last node event
    fn end_visit(&mut self) -> Result<Self::Output, Self::Error>;
}

enum Step {
    Enter(ConfigNode),
    Exit(ConfigNode, ValueType),
}

impl ConfigNode {
    /// Traverse this node and its descendants depth-first
    ///
    /// A null root produces only `begin_visit` and `end_visit`.
    pub fn visit<V>(&self, visitor: &mut V) -> Result<V::Output, V::Error>
    where
        V: Visitor + ?Sized,
    {
        visitor.begin_visit(self)?;
        if self.is_null() {
            return visitor.end_visit();
        }

        let mut stack = vec![Step::Enter(self.clone())];
        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(node) => {
                    visitor.enter_node(&node)?;
                    match node.current_value() {
                        Value::Map(map) => {
                            visitor.enter_mapping_node(&node)?;
                            let children = map.children();
                            stack.push(Step::Exit(node, ValueType::Map));
                            stack.extend(children.into_iter().rev().map(Step::Enter));
                        }
                        Value::List(list) => {
                            visitor.enter_list_node(&node)?;
                            let children = list.children();
                            stack.push(Step::Exit(node, ValueType::List));
                            stack.extend(children.iter().rev().cloned().map(Step::Enter));
                        }
                        Value::Scalar(_) => visitor.enter_scalar_node(&node)?,
                        Value::Null => {}
                    }
                }
                Step::Exit(node, ValueType::Map) => visitor.exit_mapping_node(&node)?,
                Step::Exit(node, _) => visitor.exit_list_node(&node)?,
            }
        }
        visitor.end_visit()
    }
}
