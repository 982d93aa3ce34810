//! In-memory host tree
//!
//! [`HostTree`] is the host environment a render root attaches to. It is a
//! shared handle: clones observe and mutate the same nodes, the same way
//! every `web_sys::Node` handle points into one live document.
//!
//! Besides the node arena the tree owns two registration side tables that
//! belong to the host environment rather than to any particular root:
//!
//! - the set of containers currently marked as render roots
//! - the mapping from host nodes to the instance that produced them

use core::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use crate::error::HostError;
use crate::node::{InstanceKey, NodeId, NodeType};

#[derive(Debug)]
struct NodeData {
	node_type: NodeType,
	tag: Option<String>,
	value: Option<String>,
	attributes: BTreeMap<String, String>,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

impl NodeData {
	fn new(node_type: NodeType) -> Self {
		Self {
			node_type,
			tag: None,
			value: None,
			attributes: BTreeMap::new(),
			parent: None,
			children: Vec::new(),
		}
	}
}

#[derive(Debug, Default)]
struct TreeInner {
	nodes: HashMap<NodeId, NodeData>,
	next_id: u64,
	root_containers: HashSet<NodeId>,
	instances: HashMap<NodeId, InstanceKey>,
}

impl TreeInner {
	fn alloc(&mut self, data: NodeData) -> NodeId {
		let id = NodeId::from_raw(self.next_id);
		self.next_id += 1;
		self.nodes.insert(id, data);
		id
	}

	fn node(&self, id: NodeId) -> Result<&NodeData, HostError> {
		self.nodes.get(&id).ok_or(HostError::NodeNotFound(id))
	}

	fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData, HostError> {
		self.nodes.get_mut(&id).ok_or(HostError::NodeNotFound(id))
	}

	fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
		loop {
			if node == ancestor {
				return true;
			}
			match self.nodes.get(&node).and_then(|n| n.parent) {
				Some(parent) => node = parent,
				None => return false,
			}
		}
	}

	fn detach(&mut self, child: NodeId) {
		let parent = self.nodes.get_mut(&child).and_then(|n| n.parent.take());
		if let Some(data) = parent.and_then(|p| self.nodes.get_mut(&p)) {
			data.children.retain(|c| *c != child);
		}
	}

	fn collect_text(&self, id: NodeId, out: &mut String) {
		let Some(data) = self.nodes.get(&id) else {
			return;
		};
		match data.node_type {
			NodeType::Text => {
				if let Some(value) = &data.value {
					out.push_str(value);
				}
			}
			NodeType::Element | NodeType::DocumentFragment => {
				for child in &data.children {
					self.collect_text(*child, out);
				}
			}
			NodeType::Comment | NodeType::Document => {}
		}
	}
}

/// Shared handle to an in-memory host tree.
#[derive(Debug, Clone, Default)]
pub struct HostTree {
	inner: Rc<RefCell<TreeInner>>,
}

impl HostTree {
	/// Creates an empty tree.
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether both handles point at the same tree.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}

	/// Creates a detached document node.
	pub fn create_document(&self) -> NodeId {
		self.inner
			.borrow_mut()
			.alloc(NodeData::new(NodeType::Document))
	}

	/// Creates a detached document fragment.
	pub fn create_document_fragment(&self) -> NodeId {
		self.inner
			.borrow_mut()
			.alloc(NodeData::new(NodeType::DocumentFragment))
	}

	/// Creates a detached element with the given tag name.
	pub fn create_element(&self, tag: impl Into<String>) -> NodeId {
		let mut data = NodeData::new(NodeType::Element);
		data.tag = Some(tag.into());
		self.inner.borrow_mut().alloc(data)
	}

	/// Creates a detached text node.
	pub fn create_text(&self, text: impl Into<String>) -> NodeId {
		let mut data = NodeData::new(NodeType::Text);
		data.value = Some(text.into());
		self.inner.borrow_mut().alloc(data)
	}

	/// Creates a detached comment node.
	pub fn create_comment(&self, text: impl Into<String>) -> NodeId {
		let mut data = NodeData::new(NodeType::Comment);
		data.value = Some(text.into());
		self.inner.borrow_mut().alloc(data)
	}

	/// Whether the node exists in this tree.
	pub fn contains(&self, node: NodeId) -> bool {
		self.inner.borrow().nodes.contains_key(&node)
	}

	/// Returns the node's type, or `None` for unknown ids.
	pub fn node_type(&self, node: NodeId) -> Option<NodeType> {
		self.inner.borrow().nodes.get(&node).map(|n| n.node_type)
	}

	/// Returns the tag name of an element.
	pub fn tag_name(&self, node: NodeId) -> Option<String> {
		self.inner
			.borrow()
			.nodes
			.get(&node)
			.and_then(|n| n.tag.clone())
	}

	/// Appends `child` as the last child of `parent`, detaching it from any
	/// previous parent first.
	pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
		let mut inner = self.inner.borrow_mut();
		let parent_type = inner.node(parent)?.node_type;
		let child_type = inner.node(child)?.node_type;

		if !parent_type.can_have_children()
			|| child_type == NodeType::Document
			|| inner.is_inclusive_ancestor(child, parent)
		{
			return Err(HostError::HierarchyRequest { parent, child });
		}

		inner.detach(child);
		inner.node_mut(child)?.parent = Some(parent);
		inner.node_mut(parent)?.children.push(child);
		Ok(())
	}

	/// Inserts `child` into `parent` before `reference`, or last when
	/// `reference` is `None`. The child is detached from any previous parent
	/// first.
	pub fn insert_before(
		&self,
		parent: NodeId,
		child: NodeId,
		reference: Option<NodeId>,
	) -> Result<(), HostError> {
		let Some(reference) = reference else {
			return self.append_child(parent, child);
		};
		let mut inner = self.inner.borrow_mut();
		let parent_type = inner.node(parent)?.node_type;
		let child_type = inner.node(child)?.node_type;
		if inner.node(reference)?.parent != Some(parent) {
			return Err(HostError::NotAChild {
				parent,
				child: reference,
			});
		}

		if !parent_type.can_have_children()
			|| child_type == NodeType::Document
			|| inner.is_inclusive_ancestor(child, parent)
		{
			return Err(HostError::HierarchyRequest { parent, child });
		}
		if child == reference {
			return Ok(());
		}

		inner.detach(child);
		inner.node_mut(child)?.parent = Some(parent);
		let siblings = &mut inner.node_mut(parent)?.children;
		let index = siblings
			.iter()
			.position(|c| *c == reference)
			.unwrap_or(siblings.len());
		siblings.insert(index, child);
		Ok(())
	}

	/// Removes `child` from `parent`.
	pub fn remove_child(&self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
		let mut inner = self.inner.borrow_mut();
		inner.node(parent)?;
		if inner.node(child)?.parent != Some(parent) {
			return Err(HostError::NotAChild { parent, child });
		}
		inner.detach(child);
		Ok(())
	}

	/// Returns the parent of a node.
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.inner.borrow().nodes.get(&node).and_then(|n| n.parent)
	}

	/// Returns the first child of a node.
	pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
		self.inner
			.borrow()
			.nodes
			.get(&node)
			.and_then(|n| n.children.first().copied())
	}

	/// Returns the last child of a node.
	pub fn last_child(&self, node: NodeId) -> Option<NodeId> {
		self.inner
			.borrow()
			.nodes
			.get(&node)
			.and_then(|n| n.children.last().copied())
	}

	/// Returns the children of a node in document order.
	pub fn children(&self, node: NodeId) -> Vec<NodeId> {
		self.inner
			.borrow()
			.nodes
			.get(&node)
			.map(|n| n.children.clone())
			.unwrap_or_default()
	}

	/// Returns the number of children of a node.
	pub fn child_count(&self, node: NodeId) -> usize {
		self.inner
			.borrow()
			.nodes
			.get(&node)
			.map_or(0, |n| n.children.len())
	}

	/// Returns the first element child of a document.
	pub fn document_element(&self, document: NodeId) -> Option<NodeId> {
		let inner = self.inner.borrow();
		let data = inner.nodes.get(&document)?;
		if data.node_type != NodeType::Document {
			return None;
		}
		data.children.iter().copied().find(|child| {
			inner
				.nodes
				.get(child)
				.is_some_and(|c| c.node_type == NodeType::Element)
		})
	}

	/// Returns an attribute value of an element.
	pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
		self.inner
			.borrow()
			.nodes
			.get(&node)
			.and_then(|n| n.attributes.get(name).cloned())
	}

	/// Whether an element carries the attribute.
	pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
		self.inner
			.borrow()
			.nodes
			.get(&node)
			.is_some_and(|n| n.attributes.contains_key(name))
	}

	/// Sets an attribute on an element.
	pub fn set_attribute(
		&self,
		node: NodeId,
		name: impl Into<String>,
		value: impl Into<String>,
	) -> Result<(), HostError> {
		let mut inner = self.inner.borrow_mut();
		let data = inner.node_mut(node)?;
		if data.node_type != NodeType::Element {
			return Err(HostError::UnsupportedNode(node));
		}
		data.attributes.insert(name.into(), value.into());
		Ok(())
	}

	/// Removes an attribute, returning its previous value.
	pub fn remove_attribute(&self, node: NodeId, name: &str) -> Option<String> {
		self.inner
			.borrow_mut()
			.nodes
			.get_mut(&node)
			.and_then(|n| n.attributes.remove(name))
	}

	/// Returns the value of a text or comment node.
	pub fn node_value(&self, node: NodeId) -> Option<String> {
		self.inner
			.borrow()
			.nodes
			.get(&node)
			.and_then(|n| n.value.clone())
	}

	/// Replaces the value of a text or comment node.
	pub fn set_node_value(&self, node: NodeId, value: impl Into<String>) -> Result<(), HostError> {
		let mut inner = self.inner.borrow_mut();
		let data = inner.node_mut(node)?;
		match data.node_type {
			NodeType::Text | NodeType::Comment => {
				data.value = Some(value.into());
				Ok(())
			}
			_ => Err(HostError::UnsupportedNode(node)),
		}
	}

	/// Returns the DOM `textContent` of a node.
	///
	/// Documents have no text content and yield `None`.
	pub fn text_content(&self, node: NodeId) -> Option<String> {
		let inner = self.inner.borrow();
		let data = inner.nodes.get(&node)?;
		match data.node_type {
			NodeType::Document => None,
			NodeType::Text | NodeType::Comment => data.value.clone(),
			NodeType::Element | NodeType::DocumentFragment => {
				let mut out = String::new();
				inner.collect_text(node, &mut out);
				Some(out)
			}
		}
	}

	/// Sets the DOM `textContent` of a node.
	///
	/// For elements and fragments every child is removed and replaced by a
	/// single text node (or nothing, for an empty string).
	pub fn set_text_content(&self, node: NodeId, text: &str) -> Result<(), HostError> {
		let node_type = {
			let inner = self.inner.borrow();
			inner.node(node)?.node_type
		};
		match node_type {
			NodeType::Document => Ok(()),
			NodeType::Text | NodeType::Comment => self.set_node_value(node, text),
			NodeType::Element | NodeType::DocumentFragment => {
				let mut inner = self.inner.borrow_mut();
				let children = core::mem::take(&mut inner.node_mut(node)?.children);
				for child in children {
					if let Some(data) = inner.nodes.get_mut(&child) {
						data.parent = None;
					}
				}
				if !text.is_empty() {
					let mut data = NodeData::new(NodeType::Text);
					data.value = Some(text.to_string());
					data.parent = Some(node);
					let text_node = inner.alloc(data);
					inner.node_mut(node)?.children.push(text_node);
				}
				Ok(())
			}
		}
	}

	/// Marks a container as hosting a render root.
	pub fn mark_as_root(&self, container: NodeId) {
		self.inner.borrow_mut().root_containers.insert(container);
	}

	/// Clears the root marking of a container.
	pub fn unmark_as_root(&self, container: NodeId) {
		self.inner.borrow_mut().root_containers.remove(&container);
	}

	/// Whether the container is currently marked as hosting a render root.
	pub fn is_marked_as_root(&self, container: NodeId) -> bool {
		self.inner.borrow().root_containers.contains(&container)
	}

	/// Records the instance that produced a host node.
	pub fn precache_instance(&self, node: NodeId, instance: InstanceKey) {
		self.inner.borrow_mut().instances.insert(node, instance);
	}

	/// Forgets the instance registered for a host node.
	pub fn detach_instance(&self, node: NodeId) -> Option<InstanceKey> {
		self.inner.borrow_mut().instances.remove(&node)
	}

	/// Returns the instance registered for a host node.
	pub fn instance_from_node(&self, node: NodeId) -> Option<InstanceKey> {
		self.inner.borrow().instances.get(&node).copied()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn tree() -> HostTree {
		HostTree::new()
	}

	#[rstest]
	fn test_append_and_remove_child(tree: HostTree) {
		let parent = tree.create_element("div");
		let a = tree.create_text("a");
		let b = tree.create_text("b");
		tree.append_child(parent, a).unwrap();
		tree.append_child(parent, b).unwrap();

		assert_eq!(tree.children(parent), vec![a, b]);
		assert_eq!(tree.first_child(parent), Some(a));
		assert_eq!(tree.last_child(parent), Some(b));
		assert_eq!(tree.parent(a), Some(parent));

		tree.remove_child(parent, a).unwrap();
		assert_eq!(tree.children(parent), vec![b]);
		assert_eq!(tree.parent(a), None);
	}

	#[rstest]
	fn test_remove_non_child_fails(tree: HostTree) {
		let parent = tree.create_element("div");
		let stray = tree.create_text("x");
		assert_eq!(
			tree.remove_child(parent, stray),
			Err(HostError::NotAChild {
				parent,
				child: stray
			})
		);
	}

	#[rstest]
	fn test_append_rejects_cycles_and_leaf_parents(tree: HostTree) {
		let outer = tree.create_element("div");
		let inner = tree.create_element("span");
		tree.append_child(outer, inner).unwrap();

		assert!(matches!(
			tree.append_child(inner, outer),
			Err(HostError::HierarchyRequest { .. })
		));

		let text = tree.create_text("leaf");
		let child = tree.create_element("b");
		assert!(matches!(
			tree.append_child(text, child),
			Err(HostError::HierarchyRequest { .. })
		));
	}

	#[rstest]
	fn test_append_moves_existing_child(tree: HostTree) {
		let first = tree.create_element("div");
		let second = tree.create_element("div");
		let child = tree.create_text("moved");
		tree.append_child(first, child).unwrap();
		tree.append_child(second, child).unwrap();

		assert_eq!(tree.child_count(first), 0);
		assert_eq!(tree.children(second), vec![child]);
	}

	#[rstest]
	fn test_insert_before(tree: HostTree) {
		let parent = tree.create_element("div");
		let anchor = tree.create_comment("anchor");
		let tail = tree.create_text("tail");
		tree.append_child(parent, anchor).unwrap();
		tree.append_child(parent, tail).unwrap();

		let inserted = tree.create_text("before anchor");
		tree.insert_before(parent, inserted, Some(anchor)).unwrap();
		assert_eq!(tree.children(parent), vec![inserted, anchor, tail]);

		tree.insert_before(parent, inserted, None).unwrap();
		assert_eq!(tree.children(parent), vec![anchor, tail, inserted]);

		tree.insert_before(parent, tail, Some(anchor)).unwrap();
		assert_eq!(tree.children(parent), vec![tail, anchor, inserted]);
	}

	#[rstest]
	fn test_insert_before_requires_child_reference(tree: HostTree) {
		let parent = tree.create_element("div");
		let stray = tree.create_comment("elsewhere");
		let node = tree.create_text("x");
		assert_eq!(
			tree.insert_before(parent, node, Some(stray)),
			Err(HostError::NotAChild {
				parent,
				child: stray
			})
		);
		assert_eq!(tree.parent(node), None);
	}

	#[rstest]
	fn test_detached_nodes_keep_resolving(tree: HostTree) {
		let parent = tree.create_element("div");
		let child = tree.create_text("gone");
		tree.append_child(parent, child).unwrap();
		tree.remove_child(parent, child).unwrap();
		tree.set_text_content(parent, "").unwrap();

		assert!(tree.contains(child));
		assert_eq!(tree.node_value(child).as_deref(), Some("gone"));
	}

	#[rstest]
	fn test_text_content(tree: HostTree) {
		let div = tree.create_element("div");
		let span = tree.create_element("span");
		tree.append_child(div, span).unwrap();
		let hello = tree.create_text("Hello, ");
		let world = tree.create_text("World");
		tree.append_child(span, hello).unwrap();
		tree.append_child(div, world).unwrap();
		let comment = tree.create_comment("ignored");
		tree.append_child(div, comment).unwrap();

		assert_eq!(tree.text_content(div).as_deref(), Some("Hello, World"));

		tree.set_text_content(div, "replaced").unwrap();
		assert_eq!(tree.child_count(div), 1);
		assert_eq!(tree.text_content(div).as_deref(), Some("replaced"));
		assert_eq!(tree.parent(span), None);
	}

	#[rstest]
	fn test_document_element(tree: HostTree) {
		let doc = tree.create_document();
		let comment = tree.create_comment("doctype-ish");
		let html = tree.create_element("html");
		tree.append_child(doc, comment).unwrap();
		tree.append_child(doc, html).unwrap();

		assert_eq!(tree.document_element(doc), Some(html));
		assert_eq!(tree.document_element(html), None);
		assert_eq!(tree.text_content(doc), None);
	}

	#[rstest]
	fn test_attributes(tree: HostTree) {
		let div = tree.create_element("div");
		tree.set_attribute(div, "id", "app").unwrap();
		assert_eq!(tree.attribute(div, "id").as_deref(), Some("app"));
		assert!(tree.has_attribute(div, "id"));
		assert_eq!(tree.remove_attribute(div, "id").as_deref(), Some("app"));
		assert!(!tree.has_attribute(div, "id"));

		let text = tree.create_text("t");
		assert!(tree.set_attribute(text, "id", "x").is_err());
	}

	#[rstest]
	fn test_registration_tables(tree: HostTree) {
		let container = tree.create_element("div");
		assert!(!tree.is_marked_as_root(container));
		tree.mark_as_root(container);
		assert!(tree.is_marked_as_root(container));
		tree.unmark_as_root(container);
		assert!(!tree.is_marked_as_root(container));

		let node = tree.create_text("x");
		tree.precache_instance(node, InstanceKey(3));
		assert_eq!(tree.instance_from_node(node), Some(InstanceKey(3)));
		assert_eq!(tree.detach_instance(node), Some(InstanceKey(3)));
		assert_eq!(tree.instance_from_node(node), None);
	}

	#[rstest]
	fn test_clones_share_nodes(tree: HostTree) {
		let other = tree.clone();
		let div = other.create_element("div");
		assert!(tree.contains(div));
		assert!(tree.ptr_eq(&other));
		assert!(!tree.ptr_eq(&HostTree::new()));
	}
}
