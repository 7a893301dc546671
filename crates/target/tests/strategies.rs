use anyhow::Error;
use inspect_host::{MemoryHost, NodeId, Rect, ScreenPoint};
use inspect_target::{Strategy, TargetConfig, TargetResolution, TargetResolver};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn resolve(host: &MemoryHost, initial: NodeId, point: ScreenPoint) -> TargetResolution {
    let config = TargetConfig::default();
    TargetResolver::new(host, host, &config).resolve(initial, point)
}

fn text_block(host: &mut MemoryHost, parent: NodeId, tag: &str, rect: Rect, text: &str) -> NodeId {
    let node = host.append_element(parent, tag);
    host.set_rect(node, rect);
    host.append_text(node, text);
    node
}

#[test]
fn direct_hit_ascends_to_the_text_owner() {
    init_logging();
    let mut host = MemoryHost::new();
    let body = host.body_node();
    let para = text_block(&mut host, body, "p", Rect::new(0.0, 0.0, 400.0, 20.0), "Hello ");
    let span = text_block(&mut host, para, "span", Rect::new(50.0, 0.0, 40.0, 20.0), "world");
    let point = ScreenPoint::new(60.0, 5.0);

    let direct = resolve(&host, span, point);
    assert_eq!(direct.element, span);
    assert_eq!(direct.strategy, Strategy::AscentFromTarget);
    assert!(!direct.forced);

    let text_node = host.append_text(span, "!");
    assert_eq!(resolve(&host, text_node, point).element, span);
}

#[test]
fn ascent_skips_hidden_elements() {
    init_logging();
    let mut host = MemoryHost::new();
    let body = host.body_node();
    let wrapper = text_block(&mut host, body, "div", Rect::new(0.0, 0.0, 400.0, 100.0), "visible");
    let hidden = text_block(&mut host, wrapper, "p", Rect::new(0.0, 0.0, 400.0, 20.0), "hidden");
    host.set_style(hidden, "display: none");

    let resolution = resolve(&host, hidden, ScreenPoint::new(5.0, 5.0));
    assert_eq!(resolution.element, wrapper);
    assert!(!resolution.forced);
}

#[test]
fn caret_probe_sees_through_a_textless_overlay() {
    init_logging();
    let mut host = MemoryHost::new();
    let body = host.body_node();
    let para = text_block(&mut host, body, "p", Rect::new(0.0, 0.0, 400.0, 20.0), "Under glass");
    let overlay = host.append_element(body, "div");
    host.set_rect(overlay, Rect::new(0.0, 0.0, 1280.0, 800.0));
    host.set_style(overlay, "position: fixed");
    host.set_z_index(overlay, 10);

    let resolution = resolve(&host, overlay, ScreenPoint::new(10.0, 5.0));
    assert_eq!(resolution.element, para);
    assert_eq!(resolution.strategy, Strategy::CaretProbe);
    assert!(resolution.forced);
}

#[test]
fn scoring_prefers_text_containers_under_the_point() {
    init_logging();
    let mut host = MemoryHost::new();
    let body = host.body_node();
    let section = host.append_element(body, "div");
    host.set_rect(section, Rect::new(0.0, 0.0, 400.0, 400.0));
    text_block(&mut host, section, "p", Rect::new(0.0, 300.0, 400.0, 20.0), "Caption");
    let image = host.append_element(body, "img");
    host.set_rect(image, Rect::new(0.0, 0.0, 100.0, 100.0));
    host.set_z_index(image, 5);

    let resolution = resolve(&host, image, ScreenPoint::new(10.0, 10.0));
    assert_eq!(resolution.element, section);
    assert_eq!(resolution.strategy, Strategy::BestCandidate);
    assert!(resolution.forced);
}

#[test]
fn own_ui_is_never_a_target() {
    init_logging();
    let mut host = MemoryHost::new();
    let body = host.body_node();
    let para = text_block(&mut host, body, "p", Rect::new(0.0, 0.0, 400.0, 20.0), "Page text");
    let tooltip = text_block(&mut host, body, "div", Rect::new(0.0, 0.0, 300.0, 40.0), "Inter 16px");
    host.set_attribute(tooltip, "data-font-inspector", "tooltip");
    host.set_z_index(tooltip, 100);

    let resolution = resolve(&host, tooltip, ScreenPoint::new(10.0, 10.0));
    assert_eq!(resolution.element, para);
    assert_eq!(resolution.strategy, Strategy::BestCandidate);
}

#[test]
fn deep_pierce_reaches_shadow_content() {
    init_logging();
    let mut host = MemoryHost::new();
    let body = host.body_node();
    let card = host.append_element(body, "fancy-card");
    host.set_rect(card, Rect::new(0.0, 0.0, 300.0, 100.0));
    let shadowed = host.attach_shadow_child(card, "p");
    host.set_rect(shadowed, Rect::new(0.0, 0.0, 300.0, 100.0));
    host.append_text(shadowed, "Shadowed");

    let resolution = resolve(&host, card, ScreenPoint::new(10.0, 10.0));
    assert_eq!(resolution.element, shadowed);
    assert_eq!(resolution.strategy, Strategy::DeepPierce);
    assert!(resolution.forced);
}

#[test]
fn deep_pierce_follows_nested_shadow_roots() {
    init_logging();
    let mut host = MemoryHost::new();
    let body = host.body_node();
    let outer = host.append_element(body, "app-shell");
    host.set_rect(outer, Rect::new(0.0, 0.0, 300.0, 100.0));
    let middle = host.attach_shadow_child(outer, "app-panel");
    host.set_rect(middle, Rect::new(0.0, 0.0, 300.0, 100.0));
    let label = host.attach_shadow_child(middle, "label");
    host.set_rect(label, Rect::new(0.0, 0.0, 120.0, 20.0));
    host.append_text(label, "Nested");

    let resolution = resolve(&host, outer, ScreenPoint::new(10.0, 10.0));
    assert_eq!(resolution.element, label);
    assert_eq!(resolution.strategy, Strategy::DeepPierce);
}

#[test]
fn nearest_text_within_radius_is_used_last() {
    init_logging();
    let mut host = MemoryHost::new();
    let body = host.body_node();
    text_block(&mut host, body, "p", Rect::new(0.0, 0.0, 100.0, 20.0), "Far away");
    let near = text_block(&mut host, body, "p", Rect::new(500.0, 500.0, 100.0, 20.0), "Close by");

    let resolution = resolve(&host, body, ScreenPoint::new(600.0, 600.0));
    assert_eq!(resolution.element, near);
    assert_eq!(resolution.strategy, Strategy::NearestNeighbor);
    assert!(resolution.forced);
}

#[test]
fn exhausted_strategies_return_the_initial_target() {
    init_logging();
    let mut host = MemoryHost::new();
    let body = host.body_node();
    text_block(&mut host, body, "p", Rect::new(0.0, 0.0, 100.0, 20.0), "Far away");

    let resolution = resolve(&host, body, ScreenPoint::new(1200.0, 780.0));
    assert_eq!(resolution.element, body);
    assert_eq!(resolution.strategy, Strategy::Unresolved);
    assert!(resolution.forced);
}

#[test]
fn resolution_serializes_for_presentation() -> Result<(), Error> {
    let host = MemoryHost::new();
    let resolution = resolve(&host, host.body_node(), ScreenPoint::new(1.0, 1.0));
    let json = serde_json::to_value(resolution)?;
    assert_eq!(json["strategy"], "Unresolved");
    assert_eq!(json["forced"], true);
    Ok(())
}

#[test]
fn config_overrides_merge_with_defaults() -> Result<(), Error> {
    let config: TargetConfig = serde_json::from_str(r#"{ "nearest_radius_px": 50.0 }"#)?;
    assert!((config.nearest_radius_px - 50.0).abs() < f32::EPSILON);
    assert_eq!(config.max_pierce_depth, 10);
    assert_eq!(config.own_ui_attribute, "data-font-inspector");
    Ok(())
}
