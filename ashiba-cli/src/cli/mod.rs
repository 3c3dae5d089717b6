//! CLI command implementations.
//!
//! This module contains the implementations for the CLI subcommands:
//! - `span` - Generate the parts for one span
//! - `plan` - Generate every span of a YAML plan
//! - `import` - Generate spans from the lines of an SVG sketch
//! - `tally` - Count members in a drawing document
//! - `direction` - Show member direction for a span

pub mod common;
pub mod direction;
pub mod document;
pub mod import;
pub mod plan;
pub mod span;
pub mod tally;

pub use direction::{DirectionArgs, cmd_direction};
pub use import::{ImportArgs, cmd_import};
pub use plan::{PlanArgs, cmd_plan};
pub use span::{SpanArgs, cmd_span};
pub use tally::{TallyArgs, cmd_tally};
