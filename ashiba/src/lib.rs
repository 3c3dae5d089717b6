//! # ashiba
//!
//! Scaffold span generation. Draw a line on the canvas, get back every
//! pillar, ledger, bracket and anti board that span needs, positioned and
//! oriented by the usual site rules (1800 mm modules, members on one side of
//! the span, W/S bracket widths).
//!
//! ```
//! use ashiba::{BracketSize, PartColor, Point, SpanRequest, SpanSettings, generate_scaffold_span};
//!
//! let request = SpanRequest::new(
//!     Point::new(0.0, 0.0),
//!     Point::new(360.0, 0.0), // 3600 mm at 10 mm/px
//!     SpanSettings {
//!         bracket_size: BracketSize::W,
//!         reversed: false,
//!         current_color: PartColor::White,
//!     },
//! );
//! let group = generate_scaffold_span(&request).unwrap();
//! assert_eq!(group.parts.len(), 10);
//! ```
//!
//! ## Rust Lesson #7: Modules
//!
//! `pub mod foo;` loads `foo.rs` and exports it; `pub use foo::Bar;` puts
//! `Bar` at the crate root so callers can skip the module path.

pub mod direction;
pub mod geometry;
pub mod group;
pub mod part;
pub mod span;
pub mod svg;
pub mod tally;

// Re-export common types at crate root for convenience.
pub use direction::{Cardinal, calculate_direction, direction_to_text, round_to_cardinal_direction};
pub use geometry::{
    DEFAULT_GRID_MM, DEFAULT_SCALE, Point, SpanLine, angle_degrees, distance, distance_mm, mm_to_px,
    px_to_mm, snap_point_to_grid, snap_to_grid_mm,
};
pub use group::{GroupError, GroupId, GroupMeta, GroupSettings, ScaffoldGroup};
pub use part::{
    BracketSize, PartColor, PartDetail, PartError, PartId, PartType, PillarMarker, ScaffoldPart,
};
pub use span::{
    MAX_MODULES, MODULE_LENGTH_MM, SpanConfig, SpanError, SpanGenerator, SpanRequest, SpanSettings,
    generate_scaffold_span,
};
pub use svg::{SvgError, SvgSpan, extract_spans_from_svg};
pub use tally::Tally;
