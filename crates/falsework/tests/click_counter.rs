//! End-to-end behavior of a voting counter component.

use std::cell::Cell;
use std::rc::Rc;

use falsework::dom::{SelectorList, ShadowRoot};
use falsework::prelude::*;
use falsework::{BindError, RegistryError, ScopeError};
use pretty_assertions::assert_eq;

struct ClickCounter {
    up: Prop<u32>,
    down: Prop<u32>,
    tally: Binding<String>,
}

impl Component for ClickCounter {
    const IDENTIFIER: &'static str = "ClickCounter";

    fn init() -> Self {
        let up = Prop::new("up", 0);
        let down = Prop::new("down", 0);
        let tally = bind_mapped2(&up, &down, |u, d| format!("up={u}, down={d}"));
        Self { up, down, tally }
    }

    fn shadow_root_init() -> ShadowRootInit {
        ShadowRootInit::open()
    }

    fn declare(decl: &mut Declarations<Self>) {
        decl.reactive(|c| &c.up)
            .reactive(|c| &c.down)
            .capture::<Button>("click", "button.vote-up, button.vote-down", |c, hit| {
                if hit.target().has_class("vote-up") {
                    c.up.update(|n| *n += 1);
                } else {
                    c.down.update(|n| *n += 1);
                }
            });
    }

    fn template(&self) -> Option<Markup> {
        Some(
            html::el("div")
                .class("counter")
                .child(html::el("button").class("vote-up").text("+"))
                .child(html::el("button").class("vote-down").text("-"))
                .child(html::el("button").class("reset").text("0"))
                .child(
                    html::el("p")
                        .class("tally")
                        .text(self.tally.get()),
                ),
        )
    }

    fn css(&self) -> Option<std::borrow::Cow<'_, str>> {
        Some(".tally { font-weight: bold; }".into())
    }
}

fn root_of(counter: &Instance<ClickCounter>) -> ShadowRoot {
    counter.host().shadow_root().expect("open scope")
}

fn find(root: &ShadowRoot, selectors: &str) -> Element {
    let list = SelectorList::parse(selectors).expect("valid selector");
    root.query_selector(&list).expect("rendered element")
}

fn click(root: &ShadowRoot, selectors: &str) {
    find(root, selectors).click();
}

fn tally(root: &ShadowRoot) -> String {
    find(root, "p.tally").text_content()
}

fn mounted(host: &Host) -> Instance<ClickCounter> {
    host.define::<ClickCounter>().expect("define");
    let counter = host.construct::<ClickCounter>().expect("construct");
    host.document()
        .root()
        .append_child(counter.host())
        .expect("attach");
    assert_eq!(host.tick(), 1, "initial render");
    counter
}

#[test]
fn derives_element_name_from_identifier() {
    let host = Host::new();
    assert_eq!(host.define::<ClickCounter>().unwrap(), "click-counter");
    assert!(host.is_defined("click-counter"));
    assert_eq!(host.defined_names(), vec!["click-counter".to_owned()]);
}

#[test]
fn initial_render_shows_zero_votes() {
    let host = Host::new();
    let counter = mounted(&host);
    assert_eq!(counter.render_count(), 1);
    assert_eq!(tally(&root_of(&counter)), "up=0, down=0");
    assert_eq!(counter.state().up.get(), 0);
}

#[test]
fn one_click_one_render() {
    let host = Host::new();
    let counter = mounted(&host);
    let root = root_of(&counter);

    click(&root, ".vote-up");
    assert_eq!(counter.state().up.get(), 1);
    assert!(counter.render_pending());
    assert_eq!(tally(&root), "up=0, down=0", "render waits for the tick");

    assert_eq!(host.tick(), 1);
    assert_eq!(counter.render_count(), 2);
    assert_eq!(tally(&root), "up=1, down=0");
}

#[test]
fn clicks_within_one_tick_coalesce() {
    let host = Host::new();
    let counter = mounted(&host);
    let root = root_of(&counter);

    click(&root, ".vote-up");
    click(&root, ".vote-down");
    assert_eq!(host.pending(), 1);

    assert_eq!(host.tick(), 1);
    assert_eq!(counter.render_count(), 2);
    assert_eq!(tally(&root), "up=1, down=1");
}

#[test]
fn clicks_across_ticks_render_twice() {
    let host = Host::new();
    let counter = mounted(&host);
    let root = root_of(&counter);

    click(&root, ".vote-up");
    host.tick();
    assert_eq!(tally(&root), "up=1, down=0");

    click(&root, ".vote-down");
    host.tick();
    assert_eq!(tally(&root), "up=1, down=1");
    assert_eq!(counter.render_count(), 3);
}

#[test]
fn unmatched_origin_is_ignored() {
    let host = Host::new();
    let counter = mounted(&host);
    let root = root_of(&counter);

    click(&root, ".reset");
    click(&root, "p.tally");
    assert!(!counter.render_pending());
    assert_eq!(host.tick(), 0);
    assert_eq!(counter.render_count(), 1);
}

#[test]
fn rerender_keeps_element_identity() {
    let host = Host::new();
    let counter = mounted(&host);
    let root = root_of(&counter);
    let before = find(&root, ".vote-up");

    click(&root, ".vote-up");
    host.tick();
    before.click();
    assert_eq!(find(&root, ".vote-up"), before);
    assert_eq!(counter.state().up.get(), 2);
}

#[test]
fn style_follows_template() {
    let host = Host::new();
    let counter = mounted(&host);
    let root = root_of(&counter);
    let children = root.children();
    assert_eq!(children.len(), 2);
    let style = children[1].as_element().unwrap();
    assert_eq!(style.local_name(), "style");
    assert_eq!(style.text_content(), ".tally { font-weight: bold; }");
}

#[test]
fn immediate_scheduling_renders_inside_the_click() {
    let host = Host::with_config(HostConfig::default().scheduling(Scheduling::Immediate));
    host.define::<ClickCounter>().unwrap();
    let counter = host.construct::<ClickCounter>().unwrap();
    assert_eq!(counter.render_count(), 1);

    let root = root_of(&counter);
    click(&root, ".vote-up");
    assert_eq!(tally(&root), "up=1, down=0");
    assert_eq!(counter.render_count(), 2);
    assert_eq!(host.tick(), 0);
}

#[test]
fn render_now_bypasses_the_scheduler() {
    let host = Host::new();
    host.define::<ClickCounter>().unwrap();
    let counter = host.construct::<ClickCounter>().unwrap();
    counter.render_now();
    assert_eq!(counter.render_count(), 1);
    assert_eq!(tally(&root_of(&counter)), "up=0, down=0");
}

#[test]
fn remove_tears_down_bindings_and_hooks() {
    let host = Host::new();
    let counter = mounted(&host);
    let root = root_of(&counter);
    let up = find(&root, ".vote-up");
    assert_eq!(counter.binding_count(), 1);
    assert_eq!(counter.reactive_count(), 2);

    assert!(host.remove(counter.host()));
    assert!(!counter.is_connected());
    assert_eq!(counter.binding_count(), 0);
    assert_eq!(counter.reactive_count(), 0);
    assert_eq!(host.instance_count(), 0);

    up.click();
    counter.state().down.set(5);
    counter.request_render();
    assert_eq!(counter.state().up.get(), 0);
    assert_eq!(host.tick(), 0);
    assert_eq!(counter.render_count(), 1);
    assert!(!host.remove(counter.host()));
}

#[test]
fn duplicate_name_is_rejected() {
    let host = Host::new();
    host.define::<ClickCounter>().unwrap();
    let err = host.define::<ClickCounter>().unwrap_err();
    assert_eq!(
        err,
        Error::Registry(RegistryError::AlreadyRegistered {
            name: "click-counter".into()
        })
    );
}

#[test]
fn same_type_under_two_names() {
    let host = Host::new();
    host.define::<ClickCounter>().unwrap();
    host.define_as::<ClickCounter>("vote-box").unwrap();

    let boxed = host.create_element("vote-box").unwrap();
    let instance = host.instance::<ClickCounter>(&boxed).expect("mounted");
    assert_eq!(instance.string_tag(), "HTMLVoteBoxElement");

    let first = host.construct::<ClickCounter>().unwrap();
    assert_eq!(first.host().local_name(), "click-counter");
    assert_eq!(host.instance_count(), 2);
}

#[test]
fn string_tag_and_display() {
    let host = Host::new();
    let counter = mounted(&host);
    assert_eq!(counter.string_tag(), "HTMLClickCounterElement");
    assert_eq!(counter.to_string(), "[object HTMLClickCounterElement]");
}

#[test]
fn construct_without_definition_fails() {
    let host = Host::new();
    let err = host.construct::<ClickCounter>().unwrap_err();
    assert!(matches!(
        err,
        Error::Registry(RegistryError::NotDefined { .. })
    ));
}

#[test]
fn define_upgrades_existing_elements() {
    let host = Host::new();
    let early = host.document().create_element("click-counter");
    host.document().root().append_child(&early).unwrap();
    assert!(host.instance::<ClickCounter>(&early).is_none());

    host.define::<ClickCounter>().unwrap();
    let counter = host.instance::<ClickCounter>(&early).expect("upgraded");
    host.tick();
    assert_eq!(counter.render_count(), 1);
    assert_eq!(host.upgrade(&host.document().root()).unwrap(), 0);
}

#[test]
fn upgrade_disabled_leaves_elements_alone() {
    let config = HostConfig {
        upgrade_on_define: false,
        ..HostConfig::default()
    };
    let host = Host::with_config(config);
    let early = host.document().create_element("click-counter");
    host.document().root().append_child(&early).unwrap();
    host.define::<ClickCounter>().unwrap();
    assert!(host.instance::<ClickCounter>(&early).is_none());

    assert_eq!(host.upgrade(&host.document().root()).unwrap(), 1);
    assert!(host.instance::<ClickCounter>(&early).is_some());
}

#[test]
fn existing_scope_fails_construction() {
    let config = HostConfig {
        upgrade_on_define: false,
        ..HostConfig::default()
    };
    let host = Host::with_config(config);
    let taken = host.document().create_element("click-counter");
    taken.attach_shadow(ShadowRootInit::open()).unwrap();
    host.document().root().append_child(&taken).unwrap();
    let fresh = host.document().create_element("click-counter");
    host.document().root().append_child(&fresh).unwrap();
    host.define::<ClickCounter>().unwrap();

    let err = host.upgrade(&host.document().root()).unwrap_err();
    assert_eq!(
        err,
        Error::Scope(ScopeError::AlreadyInitialized {
            tag: "click-counter".into()
        })
    );
    assert_eq!(host.instance_count(), 1, "later candidates still upgrade");
    assert!(host.instance::<ClickCounter>(&fresh).is_some());
}

#[test]
fn failed_upgrade_on_define_keeps_the_name_bound() {
    let host = Host::new();
    assert!(host.config().upgrade_on_define);
    let taken = host.document().create_element("click-counter");
    taken.attach_shadow(ShadowRootInit::open()).unwrap();
    host.document().root().append_child(&taken).unwrap();
    let fresh = host.document().create_element("click-counter");
    host.document().root().append_child(&fresh).unwrap();

    assert_eq!(host.define::<ClickCounter>().unwrap(), "click-counter");
    assert!(host.is_defined("click-counter"));
    assert!(host.instance::<ClickCounter>(&taken).is_none());
    assert!(host.instance::<ClickCounter>(&fresh).is_some());
    assert_eq!(host.instance_count(), 1);

    let later = host.construct::<ClickCounter>().unwrap();
    assert_eq!(later.host().local_name(), "click-counter");
    assert_eq!(host.instance_count(), 2);
}

struct Sealed {
    hits: Prop<u32>,
}

impl Component for Sealed {
    const IDENTIFIER: &'static str = "SealedBox";

    fn init() -> Self {
        Self {
            hits: Prop::new("hits", 0),
        }
    }

    fn declare(decl: &mut Declarations<Self>) {
        decl.reactive(|c| &c.hits);
    }

    fn template(&self) -> Option<Markup> {
        Some(html::el("span").text(self.hits.get().to_string()))
    }
}

#[test]
fn closed_scope_is_hidden_from_outside() {
    let host = Host::new();
    host.define::<Sealed>().unwrap();
    let sealed = host.construct::<Sealed>().unwrap();
    assert!(sealed.host().shadow_root().is_none());
    assert!(sealed.host().has_shadow_root());

    sealed.state().hits.set(3);
    host.tick();
    assert_eq!(sealed.render_count(), 1);
    assert_eq!(sealed.host().child_count(), 0, "light tree untouched");
}

#[test]
fn equal_writes_still_request_a_render() {
    let host = Host::new();
    host.define::<Sealed>().unwrap();
    let sealed = host.construct::<Sealed>().unwrap();
    host.tick();

    sealed.state().hits.set(0);
    assert!(sealed.render_pending());
    assert_eq!(host.tick(), 1);
    assert_eq!(sealed.render_count(), 2);
}

struct Blank;

impl Component for Blank {
    const IDENTIFIER: &'static str = "BlankSlate";

    fn init() -> Self {
        Self
    }
}

#[test]
fn missing_template_skips_render() {
    let host = Host::new();
    host.define::<Blank>().unwrap();
    let blank = host.construct::<Blank>().unwrap();
    assert_eq!(host.tick(), 1);
    assert_eq!(blank.render_count(), 0);
    assert!(!blank.render_pending());
}

struct Nameless;

impl Component for Nameless {
    const IDENTIFIER: &'static str = "__";

    fn init() -> Self {
        Self
    }
}

struct Renamed;

impl Component for Renamed {
    const IDENTIFIER: &'static str = "__";
    const NAME: Option<&'static str> = Some("renamed-thing");

    fn init() -> Self {
        Self
    }
}

#[test]
fn empty_derivation_needs_explicit_name() {
    let host = Host::new();
    assert_eq!(
        host.define::<Nameless>().unwrap_err(),
        Error::Registry(RegistryError::EmptyDerivedName {
            identifier: "__".into()
        })
    );
    assert_eq!(host.define::<Renamed>().unwrap(), "renamed-thing");
}

struct WrongKind;

impl Component for WrongKind {
    const IDENTIFIER: &'static str = "WrongKind";

    fn init() -> Self {
        Self
    }

    fn declare(decl: &mut Declarations<Self>) {
        decl.capture::<Input>("click", "input.ok, button.nope", |_, _| {});
    }
}

#[test]
fn kind_mismatch_fails_definition() {
    let host = Host::new();
    let err = host.define::<WrongKind>().unwrap_err();
    assert_eq!(
        err,
        Error::Bind(BindError::KindMismatch {
            selectors: "input.ok, button.nope".into(),
            index: 1,
            expected: "input",
        })
    );
    assert!(!host.is_defined("wrong-kind"));
}

struct BadSelector;

impl Component for BadSelector {
    const IDENTIFIER: &'static str = "BadSelector";

    fn init() -> Self {
        Self
    }

    fn declare(decl: &mut Declarations<Self>) {
        decl.capture::<AnyElement>("click", "button[", |_, _| {});
    }
}

#[test]
fn invalid_selector_fails_definition() {
    let host = Host::new();
    let err = host.define::<BadSelector>().unwrap_err();
    assert!(matches!(
        err,
        Error::Bind(BindError::InvalidSelector { ref event, .. }) if event == "click"
    ));
    assert!(!host.is_defined("bad-selector"));
}

struct Listener {
    resizes: Prop<u32>,
    last_seen: Rc<Cell<u32>>,
}

impl Component for Listener {
    const IDENTIFIER: &'static str = "ResizeListener";

    fn init() -> Self {
        Self {
            resizes: Prop::new("resizes", 0),
            last_seen: Rc::default(),
        }
    }

    fn declare(decl: &mut Declarations<Self>) {
        decl.reactive_with(
            |c| &c.resizes,
            |c| c.last_seen.set(c.resizes.get()),
        )
        .subscribe(Document::window, "resize", |c, _| {
            c.resizes.update(|n| *n += 1);
        });
    }

    fn template(&self) -> Option<Markup> {
        Some(html::text(self.resizes.get().to_string()))
    }
}

#[test]
fn window_subscription_reaches_every_instance() {
    let host = Host::new();
    host.define::<Listener>().unwrap();
    let a = host.construct::<Listener>().unwrap();
    let b = host.construct::<Listener>().unwrap();
    host.tick();

    host.window().dispatch_event(&Event::new("resize"));
    assert_eq!(a.state().resizes.get(), 1);
    assert_eq!(b.state().resizes.get(), 1);
    assert_eq!(a.state().last_seen.get(), 1, "change hook saw the new value");
    assert_eq!(host.tick(), 2);

    host.remove(a.host());
    host.window().dispatch_event(&Event::new("resize"));
    assert_eq!(a.state().resizes.get(), 1);
    assert_eq!(b.state().resizes.get(), 2);
}

#[test]
fn removing_an_ancestor_tears_down_nested_instances() {
    let host = Host::new();
    host.define::<Listener>().unwrap();
    let wrapper = host.document().create_element("div");
    host.document().root().append_child(&wrapper).unwrap();
    let nested = host.construct::<Listener>().unwrap();
    wrapper.append_child(nested.host()).unwrap();
    host.tick();
    assert_eq!(host.window().listener_count(), 1);

    assert!(host.remove(&wrapper));
    assert!(!nested.is_connected());
    assert_eq!(host.instance_count(), 0);
    assert_eq!(host.window().listener_count(), 0);

    host.window().dispatch_event(&Event::new("resize"));
    assert_eq!(nested.state().resizes.get(), 0);
    assert!(!host.remove(&wrapper));
}

#[test]
fn removing_a_host_tears_down_instances_in_its_scope() {
    let host = Host::new();
    host.define::<Listener>().unwrap();
    let counter = mounted(&host);
    let root = root_of(&counter);
    let inner = host.document().create_element("resize-listener");
    root.append_child(&inner).unwrap();
    assert_eq!(host.upgrade(&root).unwrap(), 1);
    let listener = host.instance::<Listener>(&inner).expect("upgraded");
    assert_eq!(host.instance_count(), 2);

    assert!(host.remove(counter.host()));
    assert!(!counter.is_connected());
    assert!(!listener.is_connected());
    assert_eq!(host.instance_count(), 0);
    assert_eq!(host.window().listener_count(), 0);
}
