//! Span auto-generation.
//!
//! Turns one drawn span into a complete scaffold group. The span is cut into
//! fixed-length modules (1800 mm, one standard ledger); every module gets a
//! ledger and an anti board, every module boundary a pillar and a bracket.
//!
//! ```text
//!   P───L───P───L───P        P = pillar + bracket (n + 1)
//!       A       A            L = ledger at the module start (n)
//!                            A = anti board at the module middle (n)
//! ```
//!
//! The last module may be shorter than 1800 mm on paper; positions are
//! clamped to the span end so nothing is ever placed past it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::direction::calculate_direction;
use crate::geometry::{DEFAULT_SCALE, Point, SpanLine};
use crate::group::{GroupMeta, GroupSettings, ScaffoldGroup};
use crate::part::{BracketSize, PartColor, PartDetail, PillarMarker, ScaffoldPart};

/// Standard ledger length; one module of the span.
pub const MODULE_LENGTH_MM: f64 = 1800.0;

/// Most modules one span may be cut into (18 km at the standard length).
pub const MAX_MODULES: usize = 10_000;

/// Errors from span generation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpanError {
    /// Start and end coincide, or the span length is not a finite number.
    #[error("degenerate span from {start:?} to {end:?}: length must be finite and positive")]
    DegenerateSpan { start: Point, end: Point },
    #[error("span of {length_mm:.0} mm needs more than {max_modules} modules")]
    TooLong { length_mm: f64, max_modules: usize },
    #[error("invalid span config: {0}")]
    InvalidConfig(String),
}

/// Generation settings chosen by the user for one span.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanSettings {
    pub bracket_size: BracketSize,
    /// Put members on the other side of the span.
    #[serde(default)]
    pub reversed: bool,
    /// Drawing color every generated part inherits.
    #[serde(default)]
    pub current_color: PartColor,
}

/// One span to generate: a drawn line plus its settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanRequest {
    pub start: Point,
    pub end: Point,
    pub settings: SpanSettings,
}

impl SpanRequest {
    pub fn new(start: Point, end: Point, settings: SpanSettings) -> Self {
        Self { start, end, settings }
    }

    #[inline]
    pub fn line(&self) -> SpanLine {
        SpanLine::new(self.start, self.end)
    }
}

/// Canvas-level parameters the generator needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanConfig {
    /// Millimeters per pixel.
    pub scale: f64,
    pub module_length_mm: f64,
}

impl Default for SpanConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            module_length_mm: MODULE_LENGTH_MM,
        }
    }
}

impl SpanConfig {
    /// Config with a custom scale and the standard module length.
    pub fn with_scale(scale: f64) -> Self {
        Self { scale, ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), SpanError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(SpanError::InvalidConfig(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        if !(self.module_length_mm.is_finite() && self.module_length_mm > 0.0) {
            return Err(SpanError::InvalidConfig(format!(
                "module length must be a positive number, got {}",
                self.module_length_mm
            )));
        }
        Ok(())
    }
}

/// Generates scaffold groups for spans at a fixed canvas config.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanGenerator {
    config: SpanConfig,
}

impl SpanGenerator {
    pub fn new(config: SpanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SpanConfig {
        &self.config
    }

    /// Number of modules a span of `span_length_mm` is cut into.
    ///
    /// Always rounds up: 1800 mm is one module, 1801 mm is two. Saturates
    /// for lengths no span can reach; `generate` refuses those first.
    pub fn module_count(&self, span_length_mm: f64) -> usize {
        (span_length_mm / self.config.module_length_mm).ceil() as usize
    }

    /// Generate the full part set for one span.
    pub fn generate(&self, request: &SpanRequest) -> Result<ScaffoldGroup, SpanError> {
        self.config.validate()?;

        let line = request.line();
        let span_length_mm = line.length_mm(self.config.scale);
        if !(line.start.is_finite() && line.end.is_finite())
            || !span_length_mm.is_finite()
            || span_length_mm <= 0.0
        {
            return Err(SpanError::DegenerateSpan { start: line.start, end: line.end });
        }

        let settings = request.settings;
        let module = self.config.module_length_mm;
        if (span_length_mm / module).ceil() > MAX_MODULES as f64 {
            return Err(SpanError::TooLong { length_mm: span_length_mm, max_modules: MAX_MODULES });
        }
        let module_count = self.module_count(span_length_mm);
        let direction = calculate_direction(line.start, line.end, settings.reversed);
        let color = settings.current_color;

        let at = |distance_mm: f64| line.point_at((distance_mm / span_length_mm).min(1.0));

        let mut parts = Vec::with_capacity(4 * module_count + 2);

        for i in 0..module_count {
            parts.push(ScaffoldPart::new(
                at(i as f64 * module),
                color,
                PartDetail::Ledger { length: module, direction, index: Some(i) },
            ));
        }

        for i in 0..=module_count {
            parts.push(ScaffoldPart::new(
                at(i as f64 * module),
                color,
                PartDetail::Pillar { direction, index: Some(i), marker: PillarMarker::Normal },
            ));
        }

        let bracket_size = settings.bracket_size;
        for i in 0..=module_count {
            parts.push(ScaffoldPart::new(
                at(i as f64 * module),
                color,
                PartDetail::Bracket {
                    bracket_size,
                    width: bracket_size.width_mm(),
                    direction,
                    index: Some(i),
                },
            ));
        }

        let (anti_w, anti_s) = match bracket_size {
            BracketSize::W => (1, 0),
            BracketSize::S => (0, 1),
        };
        for i in 0..module_count {
            parts.push(ScaffoldPart::new(
                at(i as f64 * module + module / 2.0),
                color,
                PartDetail::Anti {
                    length: module,
                    levels: 1,
                    anti_w,
                    anti_s,
                    direction,
                    index: Some(i),
                },
            ));
        }

        log::debug!(
            "span {:.0} mm -> {} modules, {} parts, direction {:.1}",
            span_length_mm,
            module_count,
            parts.len(),
            direction
        );

        Ok(ScaffoldGroup::new(
            parts,
            GroupMeta {
                span_length: span_length_mm,
                line,
                settings: GroupSettings {
                    bracket_size,
                    reversed: settings.reversed,
                },
            },
        ))
    }
}

/// Generate a scaffold group for a span on the default canvas (1 px = 10 mm).
pub fn generate_scaffold_span(request: &SpanRequest) -> Result<ScaffoldGroup, SpanError> {
    SpanGenerator::default().generate(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::PartType;

    const EPS: f64 = 1e-9;

    fn request(
        start: (f64, f64),
        end: (f64, f64),
        bracket_size: BracketSize,
        reversed: bool,
    ) -> SpanRequest {
        SpanRequest::new(
            Point::new(start.0, start.1),
            Point::new(end.0, end.1),
            SpanSettings { bracket_size, reversed, current_color: PartColor::Blue },
        )
    }

    fn count(group: &ScaffoldGroup, part_type: PartType) -> usize {
        group.parts_of_type(part_type).count()
    }

    #[test]
    fn exact_two_modules() {
        // 360 px at 10 mm/px = 3600 mm
        let req = request((0.0, 0.0), (360.0, 0.0), BracketSize::W, false);
        let group = generate_scaffold_span(&req).unwrap();
        assert_eq!(count(&group, PartType::Ledger), 2);
        assert_eq!(count(&group, PartType::Pillar), 3);
        assert_eq!(count(&group, PartType::Bracket), 3);
        assert_eq!(count(&group, PartType::Anti), 2);
        assert_eq!(group.parts.len(), 10);
        assert!((group.meta.span_length - 3600.0).abs() < EPS);
    }

    #[test]
    fn one_mm_over_adds_a_module() {
        let req = request((0.0, 0.0), (360.1, 0.0), BracketSize::W, false);
        let group = generate_scaffold_span(&req).unwrap();
        assert_eq!(count(&group, PartType::Ledger), 3);
        assert_eq!(count(&group, PartType::Pillar), 4);
        assert_eq!(count(&group, PartType::Bracket), 4);
        assert_eq!(count(&group, PartType::Anti), 3);
        assert_eq!(group.parts.len(), 4 * 3 + 2);
    }

    #[test]
    fn single_module_boundaries() {
        let generator = SpanGenerator::default();
        assert_eq!(generator.module_count(1800.0), 1);
        assert_eq!(generator.module_count(1801.0), 2);
        assert_eq!(generator.module_count(1.0), 1);
    }

    #[test]
    fn parts_are_ordered_by_type() {
        let req = request((0.0, 0.0), (500.0, 0.0), BracketSize::S, false);
        let group = generate_scaffold_span(&req).unwrap();
        let types: Vec<PartType> = group.parts.iter().map(|p| p.part_type()).collect();
        let n = 3; // ceil(5000 / 1800)
        let mut expected = vec![PartType::Ledger; n];
        expected.extend(vec![PartType::Pillar; n + 1]);
        expected.extend(vec![PartType::Bracket; n + 1]);
        expected.extend(vec![PartType::Anti; n]);
        assert_eq!(types, expected);
    }

    #[test]
    fn positions_follow_the_modules() {
        let req = request((10.0, 20.0), (10.0, 380.0), BracketSize::W, false);
        let group = generate_scaffold_span(&req).unwrap();

        let positions =
            |t: PartType| group.parts_of_type(t).map(|p| p.position).collect::<Vec<_>>();

        let ledgers = positions(PartType::Ledger);
        assert_eq!(ledgers, vec![Point::new(10.0, 20.0), Point::new(10.0, 200.0)]);

        let pillars = positions(PartType::Pillar);
        assert_eq!(
            pillars,
            vec![Point::new(10.0, 20.0), Point::new(10.0, 200.0), Point::new(10.0, 380.0)]
        );

        let brackets = positions(PartType::Bracket);
        assert_eq!(brackets, pillars);

        let anti = positions(PartType::Anti);
        assert_eq!(anti, vec![Point::new(10.0, 110.0), Point::new(10.0, 290.0)]);
    }

    #[test]
    fn positions_never_pass_the_end() {
        // 250 px = 2500 mm: two modules, 3600 mm of module length
        let start = Point::new(0.0, 0.0);
        let end = Point::new(150.0, 200.0);
        let req = request((0.0, 0.0), (150.0, 200.0), BracketSize::W, false);
        let group = generate_scaffold_span(&req).unwrap();
        let span = start.distance(end);

        for part in &group.parts {
            let along = start.distance(part.position);
            assert!(along <= span + EPS, "{:?} lies past the end", part);
        }

        let last_pillar = group.parts_of_type(PartType::Pillar).last().unwrap();
        assert_eq!(last_pillar.position, end);

        // 2nd anti sits at 2700 mm, past the 2500 mm end, and is clamped
        let last_anti = group.parts_of_type(PartType::Anti).last().unwrap();
        assert_eq!(last_anti.position, end);
    }

    #[test]
    fn bracket_widths_follow_size() {
        for (size, width) in [(BracketSize::W, 600.0), (BracketSize::S, 355.0)] {
            let req = request((0.0, 0.0), (400.0, 0.0), size, false);
            let group = generate_scaffold_span(&req).unwrap();
            for part in group.parts_of_type(PartType::Bracket) {
                match part.detail {
                    PartDetail::Bracket { bracket_size, width: w, .. } => {
                        assert_eq!(bracket_size, size);
                        assert_eq!(w, width);
                    }
                    ref other => panic!("expected bracket, got {:?}", other),
                }
            }
        }
    }

    #[test]
    fn ledgers_are_full_modules() {
        let req = request((0.0, 0.0), (200.0, 0.0), BracketSize::W, false);
        let group = generate_scaffold_span(&req).unwrap();
        for (i, part) in group.parts_of_type(PartType::Ledger).enumerate() {
            assert_eq!(
                part.detail,
                PartDetail::Ledger { length: 1800.0, direction: 270.0, index: Some(i) }
            );
        }
    }

    #[test]
    fn every_part_shares_direction_and_color() {
        let start = Point::new(3.0, 7.0);
        let end = Point::new(-250.0, 91.0);
        for reversed in [false, true] {
            let req = SpanRequest::new(
                start,
                end,
                SpanSettings {
                    bracket_size: BracketSize::S,
                    reversed,
                    current_color: PartColor::Green,
                },
            );
            let group = generate_scaffold_span(&req).unwrap();
            let expected = calculate_direction(start, end, reversed);
            for part in &group.parts {
                assert_eq!(part.direction(), expected);
                assert_eq!(part.color, PartColor::Green);
            }
        }
    }

    #[test]
    fn group_keeps_line_and_settings() {
        let req = request((1.0, 2.0), (181.0, 2.0), BracketSize::S, true);
        let group = generate_scaffold_span(&req).unwrap();
        assert_eq!(group.meta.line, SpanLine::new(Point::new(1.0, 2.0), Point::new(181.0, 2.0)));
        assert_eq!(
            group.meta.settings,
            GroupSettings { bracket_size: BracketSize::S, reversed: true }
        );
        assert!((group.meta.span_length - 1800.0).abs() < EPS);
        assert_eq!(group.parts.len(), 6);
    }

    #[test]
    fn ids_are_fresh_each_call() {
        let req = request((0.0, 0.0), (360.0, 0.0), BracketSize::W, false);
        let a = generate_scaffold_span(&req).unwrap();
        let b = generate_scaffold_span(&req).unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.parts[0].id, b.parts[0].id);

        let positions = |g: &ScaffoldGroup| g.parts.iter().map(|p| p.position).collect::<Vec<_>>();
        assert_eq!(positions(&a), positions(&b));
    }

    #[test]
    fn zero_length_span_is_rejected() {
        let req = request((5.0, 5.0), (5.0, 5.0), BracketSize::W, false);
        assert!(matches!(generate_scaffold_span(&req), Err(SpanError::DegenerateSpan { .. })));
    }

    #[test]
    fn non_finite_points_are_rejected() {
        let req = request((0.0, 0.0), (f64::NAN, 5.0), BracketSize::W, false);
        assert!(matches!(generate_scaffold_span(&req), Err(SpanError::DegenerateSpan { .. })));
    }

    #[test]
    fn bad_scale_is_rejected() {
        let req = request((0.0, 0.0), (100.0, 0.0), BracketSize::W, false);
        for scale in [0.0, -1.0, f64::INFINITY] {
            let generator = SpanGenerator::new(SpanConfig::with_scale(scale));
            assert!(matches!(generator.generate(&req), Err(SpanError::InvalidConfig(_))));
        }
    }

    #[test]
    fn scale_changes_module_count() {
        // 360 px at 5 mm/px is 1800 mm: one module
        let generator = SpanGenerator::new(SpanConfig::with_scale(5.0));
        let req = request((0.0, 0.0), (360.0, 0.0), BracketSize::W, false);
        let group = generator.generate(&req).unwrap();
        assert_eq!(group.parts_of_type(PartType::Ledger).count(), 1);
        assert_eq!(group.parts.len(), 6);
    }

    #[test]
    fn huge_spans_are_refused() {
        let req = request((0.0, 0.0), (1e150, 0.0), BracketSize::W, false);
        match generate_scaffold_span(&req) {
            Err(SpanError::TooLong { max_modules, .. }) => assert_eq!(max_modules, MAX_MODULES),
            other => panic!("expected TooLong, got {:?}", other),
        }

        // 1e200 px squares past f64::MAX but the length is still finite
        let req = request((0.0, 0.0), (1e200, 1e200), BracketSize::W, false);
        assert!(matches!(generate_scaffold_span(&req), Err(SpanError::TooLong { .. })));
    }

    #[test]
    fn longest_allowed_span_generates() {
        // 10 000 modules at 180 px each
        let req = request((0.0, 0.0), (180.0 * MAX_MODULES as f64, 0.0), BracketSize::W, false);
        let group = generate_scaffold_span(&req).unwrap();
        assert_eq!(group.parts.len(), 4 * MAX_MODULES + 2);

        let end = (180.0 * MAX_MODULES as f64 + 1.0, 0.0);
        let req = request((0.0, 0.0), end, BracketSize::W, false);
        assert!(matches!(generate_scaffold_span(&req), Err(SpanError::TooLong { .. })));
    }
}
