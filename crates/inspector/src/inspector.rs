use inspect_census::{FontCensusEntry, PageFontCensus};
use inspect_color::{ColorResolver, ResolvedColor};
use inspect_fonts::{
    AvailabilityCache, EvidenceSource, FamilyResolutionCascade, FontAvailabilityOracle,
    Platform, ResolvedFont, TextMeasurer,
};
use inspect_host::{ComputedStyle, Host, InteractionKind, ListenerId, NodeId, ScreenPoint};
use inspect_target::{Strategy, TargetResolver};
use log::{debug, warn};
use serde::Serialize;
use tracing::info_span;

use crate::config::InspectorConfig;

/// Everything reported for one interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inspection {
    pub element: NodeId,
    pub font: ResolvedFont,
    pub color: ResolvedColor,
    /// The element came from a heuristic strategy rather than a direct hit.
    pub forced: bool,
    pub strategy: Strategy,
    pub family_source: EvidenceSource,
}

/// Per-session state, dropped wholesale on teardown.
struct Session {
    listeners: Vec<ListenerId>,
    cache: AvailabilityCache,
    last_inspection: Option<Inspection>,
}

pub struct Inspector<H: Host> {
    host: H,
    config: InspectorConfig,
    platform: Platform,
    session: Option<Session>,
}

impl<H: Host> Inspector<H> {
    pub fn new(host: H, config: InspectorConfig) -> Self {
        let platform = Platform::detect(&host.platform_string());
        debug!(target: "font_inspector", "platform detected as {platform:?}");
        Self {
            host,
            config,
            platform,
            session: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Start a session, stopping the current one first if there is one.
    pub fn begin_session(&mut self) {
        if self.is_active() {
            debug!(target: "font_inspector", "restarting active session");
            self.end_session();
        }
        let events = self.host.events();
        let listeners = InteractionKind::ALL
            .into_iter()
            .filter_map(|kind| match events.listen(kind) {
                Ok(listener) => Some(listener),
                Err(err) => {
                    warn!(target: "font_inspector", "cannot listen for {kind:?}: {err}");
                    None
                }
            })
            .collect();
        self.session = Some(Session {
            listeners,
            cache: AvailabilityCache::new(),
            last_inspection: None,
        });
    }

    /// Remove listeners and drop every per-session cache. A no-op when inactive.
    pub fn end_session(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let events = self.host.events();
        for listener in session.listeners {
            events.unlisten(listener);
        }
        debug!(
            target: "font_inspector",
            "session ended with {} cached verdicts",
            session.cache.len()
        );
    }

    /// Most recent result of this session.
    pub fn last_inspection(&self) -> Option<&Inspection> {
        self.session
            .as_ref()
            .and_then(|session| session.last_inspection.as_ref())
    }

    /// Verdicts cached by the current session.
    pub fn cached_verdicts(&self) -> usize {
        self.session
            .as_ref()
            .map_or(0, |session| session.cache.len())
    }

    /// Resolve the element, font and color for an interaction at `point`.
    ///
    /// Outside a session the lookup still runs, against a throwaway cache.
    pub fn resolve_at(&mut self, point: ScreenPoint, initial: NodeId) -> Inspection {
        let _span = info_span!("inspector.resolve_at").entered();
        let inspection = match &self.session {
            Some(session) => self.inspect(&session.cache, point, initial),
            None => self.inspect(&AvailabilityCache::new(), point, initial),
        };
        if let Some(session) = self.session.as_mut() {
            session.last_inspection = Some(inspection.clone());
        }
        inspection
    }

    /// Families used across the document, loaded ones first.
    pub fn scan_document_fonts(&self) -> Vec<FontCensusEntry> {
        let _span = info_span!("inspector.scan_document_fonts").entered();
        match &self.session {
            Some(session) => self.census(&session.cache),
            None => self.census(&AvailabilityCache::new()),
        }
    }

    fn census(&self, cache: &AvailabilityCache) -> Vec<FontCensusEntry> {
        let oracle = self.oracle(cache);
        PageFontCensus::new(
            self.host.dom(),
            self.host.styles(),
            self.host.font_registry(),
            &oracle,
            &self.config.census,
        )
        .scan()
    }

    fn oracle<'session>(
        &'session self,
        cache: &'session AvailabilityCache,
    ) -> FontAvailabilityOracle<'session> {
        FontAvailabilityOracle::new(
            TextMeasurer::new(self.host.text_renderer()),
            self.host.font_registry(),
            self.platform,
            &self.config.oracle,
            cache,
        )
    }

    fn inspect(
        &self,
        cache: &AvailabilityCache,
        point: ScreenPoint,
        initial: NodeId,
    ) -> Inspection {
        let host = &self.host;
        let target = TargetResolver::new(host.dom(), host.styles(), &self.config.target)
            .resolve(initial, point);
        let oracle = self.oracle(cache);
        let family = FamilyResolutionCascade::new(
            host.dom(),
            host.styles(),
            host.font_registry(),
            &oracle,
            &self.config.cascade,
        )
        .resolve_detailed(target.element);
        let style = host.styles().computed_style(target.element).unwrap_or_else(|| {
            debug!(target: "font_inspector", "{:?} has no computed style", target.element);
            ComputedStyle::default()
        });
        let color = ColorResolver::new(host.color_sampler()).resolve(&style.color);
        Inspection {
            element: target.element,
            font: ResolvedFont::from_computed(family.family, &style),
            color,
            forced: target.forced,
            strategy: target.strategy,
            family_source: family.source,
        }
    }
}

impl<H: Host> Drop for Inspector<H> {
    fn drop(&mut self) {
        self.end_session();
    }
}
