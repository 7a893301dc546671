use inspect_host::{DomView, HitScope, NodeId, ScreenPoint, StyleReader};
use log::{debug, trace};
use serde::Serialize;

use crate::config::TargetConfig;
use crate::heuristics::{Heuristics, is_text_tag};

/// Which strategy produced a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strategy {
    AscentFromTarget,
    CaretProbe,
    BestCandidate,
    DeepPierce,
    NearestNeighbor,
    /// Every strategy failed; the initial target is returned as is.
    Unresolved,
}

impl Strategy {
    /// Whether the result is heuristic rather than a direct hit.
    pub const fn is_forced(self) -> bool {
        !matches!(self, Self::AscentFromTarget)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetResolution {
    pub element: NodeId,
    pub strategy: Strategy,
    pub forced: bool,
}

type StrategyFn = fn(&TargetResolver<'_>, NodeId, ScreenPoint) -> Option<NodeId>;

const STRATEGIES: [(Strategy, StrategyFn); 5] = [
    (Strategy::AscentFromTarget, |resolver, initial, _| resolver.ascend(initial)),
    (Strategy::CaretProbe, |resolver, _, point| resolver.caret_probe(point)),
    (Strategy::BestCandidate, |resolver, _, point| resolver.best_candidate(point)),
    (Strategy::DeepPierce, |resolver, _, point| resolver.deep_pierce(point)),
    (Strategy::NearestNeighbor, |resolver, _, point| resolver.nearest_neighbor(point)),
];

pub struct TargetResolver<'host> {
    dom: &'host dyn DomView,
    heuristics: Heuristics<'host>,
    config: &'host TargetConfig,
}

impl<'host> TargetResolver<'host> {
    pub fn new(
        dom: &'host dyn DomView,
        styles: &'host dyn StyleReader,
        config: &'host TargetConfig,
    ) -> Self {
        Self {
            dom,
            heuristics: Heuristics {
                dom,
                styles,
                config,
            },
            config,
        }
    }

    /// Best text-bearing element for an interaction. Never fails: when nothing better is
    /// found the initial target comes back, marked forced.
    pub fn resolve(&self, initial: NodeId, point: ScreenPoint) -> TargetResolution {
        for (strategy, run) in STRATEGIES {
            if let Some(element) = run(self, initial, point) {
                debug!(target: "target_resolver", "{strategy:?} -> {element:?}");
                return TargetResolution {
                    element,
                    strategy,
                    forced: strategy.is_forced(),
                };
            }
            trace!(target: "target_resolver", "{strategy:?} found nothing at {point:?}");
        }
        debug!(target: "target_resolver", "falling back to initial target {initial:?}");
        TargetResolution {
            element: initial,
            strategy: Strategy::Unresolved,
            forced: true,
        }
    }

    /// `start` or its nearest logical ancestor that renders text of its own.
    fn ascend(&self, start: NodeId) -> Option<NodeId> {
        let mut current = start;
        for _ in 0..=self.config.max_ancestor_hops {
            if self.heuristics.is_text_target(current) {
                return Some(current);
            }
            current = self.dom.logical_parent(current)?;
        }
        None
    }

    fn caret_probe(&self, point: ScreenPoint) -> Option<NodeId> {
        let text = self.dom.caret_text_at(point)?;
        let parent = self.dom.logical_parent(text)?;
        (self.heuristics.is_rendered(parent)
            && !self.heuristics.is_overlay(parent)
            && !self.heuristics.is_own_ui(parent))
        .then_some(parent)
    }

    fn score(&self, node: NodeId, point: ScreenPoint) -> Option<u32> {
        let heuristics = &self.heuristics;
        if heuristics.is_overlay(node) || !heuristics.is_rendered(node) {
            return None;
        }
        let mut score = if heuristics.has_direct_text(node) {
            50
        } else if heuristics.contains_text(node) {
            10
        } else {
            return None;
        };
        if let Some(rect) = self.dom.bounding_rect(node) {
            if rect.contains(point) {
                score += 30;
            }
            let area = rect.area();
            if area < self.config.small_area_px {
                score += 20;
            } else if area < self.config.medium_area_px {
                score += 10;
            }
        }
        if heuristics.tag(node).is_some_and(|tag| is_text_tag(&tag)) {
            score += 15;
        }
        Some(score)
    }

    /// Highest scoring element stacked at the point; ties go to the topmost.
    fn best_candidate(&self, point: ScreenPoint) -> Option<NodeId> {
        let mut best: Option<(NodeId, u32)> = None;
        for node in self.dom.elements_from_point(point) {
            if self.heuristics.is_root(node) || self.heuristics.is_own_ui(node) {
                continue;
            }
            let Some(score) = self.score(node, point) else {
                continue;
            };
            trace!(target: "target_resolver", "candidate {node:?} scored {score}");
            if score > 0 && best.is_none_or(|(_, top)| score > top) {
                best = Some((node, score));
            }
        }
        best.map(|(node, _)| node)
    }

    /// Hit test through nested shadow roots, then accept or ascend from the innermost hit.
    fn deep_pierce(&self, point: ScreenPoint) -> Option<NodeId> {
        let mut current = self.dom.hit_test(HitScope::Document, point)?;
        for depth in 0..self.config.max_pierce_depth {
            if !self.dom.has_shadow_root(current) {
                break;
            }
            match self.dom.hit_test(HitScope::ShadowRoot(current), point) {
                Some(inner) if inner != current => {
                    trace!(target: "target_resolver", "pierced to {inner:?} at depth {depth}");
                    current = inner;
                }
                _ => break,
            }
        }
        if self.heuristics.is_own_ui(current) {
            return None;
        }
        self.ascend(current)
    }

    /// Closest text-tag element with visible text, within the configured radius.
    fn nearest_neighbor(&self, point: ScreenPoint) -> Option<NodeId> {
        let heuristics = &self.heuristics;
        self.dom
            .all_elements()
            .into_iter()
            .filter(|node| heuristics.tag(*node).is_some_and(|tag| is_text_tag(&tag)))
            .filter(|node| heuristics.is_text_target(*node))
            .filter_map(|node| {
                let rect = self.dom.bounding_rect(node)?;
                if rect.is_empty() {
                    return None;
                }
                let distance = rect.center().distance_to(point);
                (distance <= self.config.nearest_radius_px).then_some((node, distance))
            })
            .min_by(|left, right| left.1.total_cmp(&right.1))
            .map(|(node, _)| node)
    }
}
