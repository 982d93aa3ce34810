//! Diagnostic warning tests
//!
//! Warnings are captured with a `tracing-subscriber` layer installed for the
//! duration of each test. They never change behaviour, so these tests only
//! assert on what was emitted.

use std::fmt;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use reinhardt_host::{HostTree, ROOT_ATTRIBUTE_NAME};
use reinhardt_roots::testing::TextReconciler;
use reinhardt_roots::{LegacyRoots, MountConfig, PublicInstance};
use rstest::rstest;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Clone, Default)]
struct WarnCapture {
	messages: Arc<Mutex<Vec<String>>>,
}

impl WarnCapture {
	fn messages(&self) -> Vec<String> {
		self.messages.lock().unwrap().clone()
	}
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
		if field.name() == "message" {
			self.0 = format!("{value:?}");
		}
	}
}

impl<S: Subscriber> Layer<S> for WarnCapture {
	fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
		if *event.metadata().level() == Level::WARN {
			let mut visitor = MessageVisitor(String::new());
			event.record(&mut visitor);
			self.messages.lock().unwrap().push(visitor.0);
		}
	}
}

fn capture_warnings(f: impl FnOnce()) -> Vec<String> {
	let capture = WarnCapture::default();
	let subscriber = tracing_subscriber::registry().with(capture.clone());
	tracing::subscriber::with_default(subscriber, f);
	capture.messages()
}

fn roots_with(config: MountConfig) -> (HostTree, LegacyRoots<TextReconciler>) {
	let tree = HostTree::new();
	let reconciler = Rc::new(TextReconciler::new(tree.clone()));
	let roots = LegacyRoots::with_config(tree.clone(), reconciler, config);
	(tree, roots)
}

#[rstest]
fn test_implicit_hydration_warns() {
	let (tree, roots) = roots_with(MountConfig::default());
	let container = tree.create_element("div");
	let markup = tree.create_element("span");
	tree.set_attribute(markup, ROOT_ATTRIBUTE_NAME, "").unwrap();
	tree.append_child(container, markup).unwrap();

	let warnings = capture_warnings(|| {
		roots.render("x".to_string(), container, None).unwrap();
	});

	assert_eq!(warnings.len(), 1);
	assert!(warnings[0].contains("hydrating"));
}

#[rstest]
fn test_subtree_render_into_body_warns() {
	let (tree, roots) = roots_with(MountConfig::default());
	let parent_container = tree.create_element("div");
	let Some(PublicInstance::Component(parent)) = roots
		.render("parent".to_string(), parent_container, None)
		.unwrap()
	else {
		panic!("expected a component instance");
	};
	let body = tree.create_element("body");

	let warnings = capture_warnings(|| {
		roots
			.render_subtree_into_container(&parent, "child".to_string(), body, None)
			.unwrap();
	});

	assert_eq!(warnings.len(), 1);
	assert!(warnings[0].starts_with("render_subtree_into_container(): rendering directly into <body>"));
}

#[rstest]
fn test_subtree_render_into_foreign_root_warns() {
	let (tree, roots) = roots_with(MountConfig::default());
	let parent_container = tree.create_element("div");
	let Some(PublicInstance::Component(parent)) = roots
		.render("parent".to_string(), parent_container, None)
		.unwrap()
	else {
		panic!("expected a component instance");
	};
	let container = tree.create_element("div");
	tree.mark_as_root(container);

	let warnings = capture_warnings(|| {
		roots
			.render_subtree_into_container(&parent, "child".to_string(), container, None)
			.unwrap();
	});

	assert!(
		warnings
			.iter()
			.any(|w| w.contains("already attached to a different kind of root"))
	);
}

#[rstest]
fn test_disabled_diagnostics_emit_nothing() {
	let (tree, roots) = roots_with(MountConfig::default().with_diagnostics(false));
	let body = tree.create_element("body");
	let markup = tree.create_element("main");
	tree.set_attribute(markup, ROOT_ATTRIBUTE_NAME, "").unwrap();
	tree.append_child(body, markup).unwrap();

	let warnings = capture_warnings(|| {
		roots.render("x".to_string(), body, None).unwrap();
		let stale = tree.create_element("div");
		let child = tree.create_element("p");
		tree.append_child(stale, child).unwrap();
		tree.precache_instance(child, reinhardt_host::InstanceKey(99));
		assert!(!roots.unmount_component_at_node(stale).unwrap());
	});

	assert!(warnings.is_empty());
}

#[rstest]
fn test_unmount_of_rendered_node_warns() {
	let (tree, roots) = roots_with(MountConfig::default());
	let container = tree.create_element("div");
	let instance = roots.render("x".to_string(), container, None).unwrap();
	let host = roots.find_host_node(instance.as_ref()).unwrap();
	let wrapper = tree.create_element("section");
	let inner = tree.create_text("inner");
	tree.append_child(wrapper, inner).unwrap();
	tree.precache_instance(inner, reinhardt_host::InstanceKey(7));
	tree.append_child(container, wrapper).unwrap();

	let warnings = capture_warnings(|| {
		assert!(!roots.unmount_component_at_node(wrapper).unwrap());
	});

	assert_eq!(warnings.len(), 1);
	assert!(warnings[0].contains("rendered by a root"));
	assert_eq!(tree.parent(host), Some(container));
}
