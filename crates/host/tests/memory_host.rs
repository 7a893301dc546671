use anyhow::{Context as _, Error};
use inspect_host::memory::{FontMetrics, MemoryStylesheet};
use inspect_host::{
    ColorSampler, DomView, FaceStatus, FontRegistry, HitScope, MemoryHost, ProbeSpec, Rect,
    ScreenPoint, StyleReader, TextBox, TextRenderer,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn hit_testing_orders_topmost_first_and_retargets_shadow_content() {
    init_logging();
    let mut host = MemoryHost::new();
    let body = host.body_node();
    let section = host.append_element(body, "section");
    host.set_rect(section, Rect::new(0.0, 0.0, 400.0, 400.0));
    let widget = host.append_element(section, "fancy-card");
    host.set_rect(widget, Rect::new(10.0, 10.0, 200.0, 100.0));
    let inner = host.attach_shadow_child(widget, "p");
    host.set_rect(inner, Rect::new(20.0, 20.0, 100.0, 30.0));

    let point = ScreenPoint::new(30.0, 30.0);
    let stacked = host.elements_from_point(point);
    assert_eq!(
        stacked,
        vec![widget, section, host.body_node(), host.html_node()]
    );
    assert_eq!(host.hit_test(HitScope::Document, point), Some(widget));
    assert!(host.has_shadow_root(widget));
    assert_eq!(host.hit_test(HitScope::ShadowRoot(widget), point), Some(inner));
    assert_eq!(host.parent(inner), None);
    assert_eq!(host.logical_parent(inner), Some(widget));
}

#[test]
fn z_index_beats_document_order() {
    init_logging();
    let mut host = MemoryHost::new();
    let body = host.body_node();
    let overlay = host.append_element(body, "div");
    host.set_rect(overlay, Rect::new(0.0, 0.0, 1280.0, 800.0));
    host.set_z_index(overlay, 10);
    let para = host.append_element(body, "p");
    host.set_rect(para, Rect::new(0.0, 0.0, 100.0, 20.0));
    host.append_text(para, "Hello");

    let point = ScreenPoint::new(5.0, 5.0);
    assert_eq!(host.hit_test(HitScope::Document, point), Some(overlay));
    let caret = host.caret_text_at(point);
    assert_eq!(caret.and_then(|text| host.parent(text)), Some(para));
}

#[test]
fn computed_style_inherits_through_shadow_hosts() -> Result<(), Error> {
    init_logging();
    let mut host = MemoryHost::new();
    let html = host.html_node();
    host.set_style(html, "--brand-font: \"Inter\", sans-serif; font-size: 20px");
    let body = host.body_node();
    let widget = host.append_element(body, "x-widget");
    host.set_inline_style(widget, "font-family: var(--brand-font); font-weight: bold");
    let label = host.attach_shadow_child(widget, "span");
    host.set_style(label, "font-size: 1.5em; font-style: italic");

    let style = host
        .computed_style(label)
        .context("shadow child has no computed style")?;
    assert_eq!(style.font_family, "\"Inter\", sans-serif");
    assert_eq!(style.font_weight, "700");
    assert_eq!(style.font_style, "italic");
    assert!((style.font_size_px - 30.0).abs() < 1e-4);
    assert_eq!(style.display, "inline");
    assert!(
        host.custom_properties(label)
            .contains(&("--brand-font".to_owned(), "\"Inter\", sans-serif".to_owned()))
    );
    Ok(())
}

#[test]
fn probes_measure_the_first_resolvable_family() -> Result<(), Error> {
    init_logging();
    let mut host = MemoryHost::new();
    let arial = FontMetrics::new(0.9, 0.3, 0.55, 1.15);
    host.install_font("Arial", arial);
    let measure = |family: &str| -> Result<TextBox, Error> {
        let probe = host.attach_probe(&ProbeSpec::new("mmmwwwiii", 32.0, family.to_owned()))?;
        let measured = host.probe_box(probe);
        host.detach_probe(probe);
        measured
    };
    assert_eq!(measure("\"Nope\", \"Arial\"")?, measure("\"Arial\"")?);
    assert_ne!(measure("\"Arial\"")?, measure("sans-serif")?);
    assert_eq!(measure("\"Nope\"")?, measure("serif")?);
    assert_eq!(measure("\"sans-serif\"")?, measure("serif")?);
    assert_eq!(host.live_probes(), 0);
    assert_eq!(host.probes_attached(), 8);
    Ok(())
}

#[test]
fn registry_check_only_sees_loaded_faces() -> Result<(), Error> {
    init_logging();
    let mut host = MemoryHost::new();
    host.register_face("Inter", FaceStatus::Loaded, FontMetrics::distinct(40));
    host.register_face("Lato", FaceStatus::Unloaded, FontMetrics::distinct(41));
    assert!(host.check("16px \"Inter\"")?);
    assert!(!host.check("bold 16px \"Lato\"")?);
    assert!(host.check("Inter").err().is_some());
    assert_eq!(host.faces()?.len(), 2);
    Ok(())
}

#[test]
fn cross_origin_sheets_are_unreadable() -> Result<(), Error> {
    init_logging();
    let mut host = MemoryHost::new();
    host.add_stylesheet(MemoryStylesheet::CrossOrigin);
    host.add_stylesheet(MemoryStylesheet::readable(["Inter"]));
    assert!(host.font_face_families(0).err().is_some());
    assert_eq!(host.font_face_families(1)?, vec!["Inter".to_owned()]);
    Ok(())
}

#[test]
fn color_surface_keeps_previous_fill_for_invalid_colors() -> Result<(), Error> {
    init_logging();
    let host = MemoryHost::new();
    let surface = host.create_surface()?;
    host.fill(surface, "rgb(0, 128, 255)")?;
    assert_eq!(host.read_pixel(surface)?, [0, 128, 255, 255]);
    host.fill(surface, "definitely not a color")?;
    assert_eq!(host.read_pixel(surface)?, [0, 128, 255, 255]);
    host.release_surface(surface);
    assert_eq!(host.live_surfaces(), 0);
    assert!(host.read_pixel(surface).err().is_some());
    Ok(())
}
