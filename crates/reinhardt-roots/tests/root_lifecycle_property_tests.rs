//! Property-based tests for root lifecycle invariants
//!
//! Arbitrary sequences of render, hydrate and unmount calls across a few
//! containers must keep:
//! - at most one binding per container, identical across updates
//! - the host root marking in sync with the registry
//! - `unmount_component_at_node` reporting exactly whether a root existed

use std::rc::Rc;

use proptest::prelude::*;
use reinhardt_host::{HostTree, NodeId};
use reinhardt_roots::testing::{RootId, TextReconciler};
use reinhardt_roots::{LegacyRoots, RootBinding};

const CONTAINERS: usize = 3;

#[derive(Debug, Clone)]
enum Op {
	Render(usize, String),
	Hydrate(usize, String),
	Unmount(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
	prop_oneof![
		(0..CONTAINERS, "[a-z]{1,6}").prop_map(|(i, s)| Op::Render(i, s)),
		(0..CONTAINERS, "[a-z]{1,6}").prop_map(|(i, s)| Op::Hydrate(i, s)),
		(0..CONTAINERS).prop_map(Op::Unmount),
	]
}

proptest! {
	#[test]
	fn prop_binding_tracks_lifecycle(ops in prop::collection::vec(op_strategy(), 1..40)) {
		let tree = HostTree::new();
		let reconciler = Rc::new(TextReconciler::new(tree.clone()));
		let roots = LegacyRoots::new(tree.clone(), Rc::clone(&reconciler));
		let containers: Vec<NodeId> = (0..CONTAINERS).map(|_| tree.create_element("div")).collect();

		let mut model: Vec<Option<(RootBinding<RootId>, String)>> = vec![None; CONTAINERS];

		for op in ops {
			let render = match op {
				Op::Render(i, text) => Some((i, text, false)),
				Op::Hydrate(i, text) => Some((i, text, true)),
				Op::Unmount(i) => {
					let existed = roots.unmount_component_at_node(containers[i]).unwrap();
					prop_assert_eq!(existed, model[i].is_some());
					model[i] = None;
					None
				}
			};

			if let Some((i, text, hydrate)) = render {
				if hydrate {
					roots.hydrate(text.clone(), containers[i], None).unwrap();
				} else {
					roots.render(text.clone(), containers[i], None).unwrap();
				}
				let current = roots.root_binding(containers[i]).unwrap();
				match model[i].take() {
					Some((previous, _)) => {
						prop_assert!(current.ptr_eq(&previous));
					}
					None => {
						prop_assert_eq!(current.is_hydrate(), hydrate);
					}
				}
				model[i] = Some((current, text));
			}

			let bound = model.iter().filter(|entry| entry.is_some()).count();
			prop_assert_eq!(roots.bound_count(), bound);
			for (container, entry) in containers.iter().zip(&model) {
				prop_assert_eq!(tree.is_marked_as_root(*container), entry.is_some());
				match entry {
					Some((_, text)) => {
						prop_assert_eq!(tree.text_content(*container), Some(text.clone()));
					}
					None => {
						prop_assert!(roots.root_binding(*container).is_none());
						prop_assert_eq!(tree.child_count(*container), 0);
					}
				}
			}
		}
	}
}
