use anyhow::{Error, Result, anyhow};
use inspect_fonts::{
    AvailabilityCache, FontAvailabilityOracle, FontFamilyToken, OracleConfig, Platform,
    TextMeasurer, WIDE_REFERENCE,
};
use inspect_host::memory::FontMetrics;
use inspect_host::{FaceStatus, Host, MemoryHost, ProbeId, ProbeSpec, TextBox, TextRenderer};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn oracle<'session>(
    host: &'session MemoryHost,
    config: &'session OracleConfig,
    cache: &'session AvailabilityCache,
) -> FontAvailabilityOracle<'session> {
    FontAvailabilityOracle::new(
        TextMeasurer::new(host),
        host.font_registry(),
        Platform::detect(&host.platform_string()),
        config,
        cache,
    )
}

#[test]
fn keywords_are_available_without_measuring() {
    init_logging();
    let host = MemoryHost::new();
    let config = OracleConfig::default();
    let cache = AvailabilityCache::new();
    let oracle = oracle(&host, &config, &cache);

    for keyword in ["serif", "sans-serif", "monospace", "ui-rounded", "system-ui", "-apple-system"] {
        assert!(oracle.is_available(keyword), "{keyword} should be available");
    }
    assert_eq!(host.probes_attached(), 0);
    assert!(cache.is_empty());
}

#[test]
fn installed_fonts_are_detected_and_missing_ones_are_not() {
    init_logging();
    let mut host = MemoryHost::new();
    host.install_system_font("Arial");
    let config = OracleConfig::default();
    let cache = AvailabilityCache::new();
    let oracle = oracle(&host, &config, &cache);

    assert!(oracle.is_available("Arial"));
    assert!(oracle.is_available("  arial "));
    assert!(!oracle.is_available("Definitely Not Installed"));
    assert!(!oracle.is_available(""));
    assert_eq!(host.live_probes(), 0);
}

#[test]
fn verdicts_are_memoized_for_the_session() {
    init_logging();
    let mut host = MemoryHost::new();
    host.install_system_font("Arial");
    let config = OracleConfig::default();
    let cache = AvailabilityCache::new();
    let oracle = oracle(&host, &config, &cache);

    let first = oracle.is_available("Arial");
    let probes_after_first = host.probes_attached();
    assert!(probes_after_first > 0);
    let second = oracle.is_available("ARIAL");
    assert_eq!(first, second);
    assert_eq!(host.probes_attached(), probes_after_first);
    assert_eq!(cache.verdict("arial"), Some(true));
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn platform_allowlist_is_the_last_resort() {
    init_logging();
    let host = MemoryHost::new();
    let config = OracleConfig::default();
    let cache = AvailabilityCache::new();
    let oracle = oracle(&host, &config, &cache);

    // Not installed, but listed as a stock Linux font.
    assert!(oracle.is_available("Roboto"));
    assert!(!oracle.is_available("Segoe UI"));
}

#[test]
fn loaded_registry_faces_short_circuit_measurement() {
    init_logging();
    let mut host = MemoryHost::new();
    host.register_face("Brand Sans", FaceStatus::Loaded, FontMetrics::distinct(40));
    host.register_face("Pending Face", FaceStatus::Loading, FontMetrics::distinct(41));
    let config = OracleConfig::default();
    let cache = AvailabilityCache::new();
    let oracle = oracle(&host, &config, &cache);

    assert!(oracle.is_available("Brand Sans"));
    assert_eq!(host.probes_attached(), 0);
    assert!(!oracle.is_available("Pending Face"));
}

#[test]
fn measurement_still_works_without_a_registry() {
    init_logging();
    let mut host = MemoryHost::new().without_font_registry();
    host.register_face("Brand Sans", FaceStatus::Loaded, FontMetrics::distinct(40));
    let config = OracleConfig::default();
    let cache = AvailabilityCache::new();
    let oracle = oracle(&host, &config, &cache);

    assert!(oracle.is_available("Brand Sans"));
    assert!(host.probes_attached() > 0);
}

#[test]
fn self_rendering_separates_present_fonts_from_fallbacks() {
    init_logging();
    let host = MemoryHost::new();
    let config = OracleConfig::default();
    let cache = AvailabilityCache::new();
    let oracle = oracle(&host, &config, &cache);

    assert!(oracle.renders_itself("DejaVu Sans"));
    assert!(!oracle.renders_itself("Ubuntu"));
    let probes = host.probes_attached();
    assert!(oracle.renders_itself("dejavu sans"));
    assert_eq!(host.probes_attached(), probes);
}

/// Attaches probes on the real host but never manages to lay them out.
struct BrokenLayout<'host> {
    inner: &'host MemoryHost,
}

impl TextRenderer for BrokenLayout<'_> {
    fn attach_probe(&self, spec: &ProbeSpec) -> Result<ProbeId> {
        self.inner.attach_probe(spec)
    }

    fn probe_box(&self, probe: ProbeId) -> Result<TextBox> {
        Err(anyhow!("layout of probe {} failed", probe.0))
    }

    fn detach_probe(&self, probe: ProbeId) {
        self.inner.detach_probe(probe);
    }
}

#[test]
fn quoted_keyword_tokens_must_be_proven() {
    init_logging();
    let host = MemoryHost::new();
    let config = OracleConfig::default();
    let cache = AvailabilityCache::new();
    let oracle = oracle(&host, &config, &cache);

    assert!(oracle.is_available("serif"));
    assert!(!oracle.is_available_token(&FontFamilyToken::named("serif")));
    assert!(!oracle.is_available_token(&FontFamilyToken::named("system-ui")));
    assert!(host.probes_attached() > 0);
    assert_eq!(host.live_probes(), 0);
}

#[test]
fn failed_layout_still_detaches_the_measurement_text() {
    init_logging();
    let host = MemoryHost::new();
    let layout = BrokenLayout { inner: &host };
    let measured = TextMeasurer::new(&layout).measure(WIDE_REFERENCE, 16.0, "\"Arial\"", "serif");

    assert!(measured.err().is_some());
    assert_eq!(host.probes_attached(), 1);
    assert_eq!(host.live_probes(), 0);
}

#[test]
fn failed_layout_leaves_only_the_allowlist() {
    init_logging();
    let mut host = MemoryHost::new();
    host.install_system_font("Arial");
    let layout = BrokenLayout { inner: &host };
    let config = OracleConfig::default();
    let cache = AvailabilityCache::new();
    let oracle = FontAvailabilityOracle::new(
        TextMeasurer::new(&layout),
        host.font_registry(),
        Platform::detect(&host.platform_string()),
        &config,
        &cache,
    );

    assert!(!oracle.is_available("Arial"));
    assert!(oracle.is_available("Roboto"));
    assert!(!oracle.renders_itself("DejaVu Sans"));
    assert!(host.probes_attached() > 0);
    assert_eq!(host.live_probes(), 0);
}

#[test]
fn unattachable_measurement_sizes_fall_back_to_the_allowlist() {
    init_logging();
    let mut host = MemoryHost::new();
    host.install_system_font("Arial");
    let config = OracleConfig {
        probe_sizes_px: vec![0.0],
        ..OracleConfig::default()
    };
    let cache = AvailabilityCache::new();
    let oracle = oracle(&host, &config, &cache);

    assert!(!oracle.is_available("Arial"));
    assert!(oracle.is_available("Roboto"));
    assert_eq!(host.probes_attached(), 0);
    assert_eq!(host.live_probes(), 0);
}

#[test]
fn config_fills_missing_fields_with_defaults() -> Result<(), Error> {
    let config: OracleConfig = serde_json::from_str(r#"{ "probe_sizes_px": [24.0] }"#)?;
    assert_eq!(config.probe_sizes_px, vec![24.0]);
    assert_eq!(config.registry_check_sizes_px, OracleConfig::default().registry_check_sizes_px);
    assert!((config.comparison_size_px - 48.0).abs() < f32::EPSILON);
    Ok(())
}
