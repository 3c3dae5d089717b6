//! Plan files: a whole elevation's spans in one YAML document.
//!
//! A plan lists spans by their end points in canvas pixels, with defaults
//! that each span may override. Points are snapped to the plan grid before
//! generation, the same way the drawing canvas snaps clicks.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use serde::{Deserialize, Serialize};

use ashiba::{
    BracketSize, DEFAULT_GRID_MM, DEFAULT_SCALE, PartColor, Point, ScaffoldGroup, SpanConfig,
    SpanGenerator, SpanRequest, SpanSettings, snap_point_to_grid,
};

use super::common::{OutputFormat, emit_groups};

/// A plan of spans to generate together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Plan name/title
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Canvas configuration
    #[serde(default)]
    pub canvas: Canvas,

    /// Settings applied to every span (can be overridden)
    #[serde(default)]
    pub defaults: SpanDefaults,

    /// Spans, generated in order
    pub spans: Vec<PlanSpan>,
}

/// Canvas configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Canvas {
    /// Millimeters per pixel
    #[serde(default = "default_scale")]
    pub scale: f64,

    /// Snap grid in millimeters (0 disables snapping)
    #[serde(default = "default_grid")]
    pub grid: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self { scale: default_scale(), grid: default_grid() }
    }
}

fn default_scale() -> f64 {
    DEFAULT_SCALE
}

fn default_grid() -> f64 {
    DEFAULT_GRID_MM
}

/// Per-span settings, all optional so they can fall back to the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpanDefaults {
    #[serde(default)]
    pub bracket_size: Option<BracketSize>,

    #[serde(default)]
    pub color: Option<PartColor>,

    #[serde(default)]
    pub reversed: Option<bool>,
}

impl SpanDefaults {
    /// Merge with defaults, preferring self's values.
    pub fn merge_with(&self, defaults: &SpanDefaults) -> SpanSettings {
        SpanSettings {
            bracket_size: self.bracket_size.or(defaults.bracket_size).unwrap_or_default(),
            reversed: self.reversed.or(defaults.reversed).unwrap_or(false),
            current_color: self.color.or(defaults.color).unwrap_or_default(),
        }
    }
}

/// A single span of the plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSpan {
    /// Span name (for messages)
    pub name: String,

    /// Start as [x, y] in pixels
    pub start: (f64, f64),

    /// End as [x, y] in pixels
    pub end: (f64, f64),

    /// Overrides for this span
    #[serde(flatten)]
    pub settings: SpanDefaults,

    /// Whether this span is generated
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Plan {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let plan: Plan = serde_yaml::from_str(yaml).context("invalid plan YAML")?;
        if plan.spans.is_empty() {
            bail!("plan '{}' has no spans", plan.name);
        }
        Ok(plan)
    }

    /// Load a plan from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read plan {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("failed to load plan {}", path.display()))
    }

    fn snap(&self, (x, y): (f64, f64)) -> Point {
        let p = Point::new(x, y);
        if self.canvas.grid > 0.0 {
            snap_point_to_grid(p, self.canvas.grid, self.canvas.scale)
        } else {
            p
        }
    }

    /// Generate a group for every enabled span.
    pub fn generate(&self) -> Result<Vec<ScaffoldGroup>> {
        let config = SpanConfig::with_scale(self.canvas.scale);
        config.validate().context("invalid canvas scale")?;
        let generator = SpanGenerator::new(config);

        let mut groups = Vec::new();
        for span in self.spans.iter().filter(|s| s.enabled) {
            let request = SpanRequest::new(
                self.snap(span.start),
                self.snap(span.end),
                span.settings.merge_with(&self.defaults),
            );
            let group = generator
                .generate(&request)
                .with_context(|| format!("span '{}'", span.name))?;
            log::debug!("span '{}': {} parts", span.name, group.parts.len());
            groups.push(group);
        }

        if groups.is_empty() {
            bail!("plan '{}' has no enabled spans", self.name);
        }
        Ok(groups)
    }
}

#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    /// Plan YAML file
    #[arg(required_unless_present = "example")]
    pub plan: Option<PathBuf>,

    /// Print an example plan and exit
    #[arg(long)]
    pub example: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Output file (stdout if omitted or "-")
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the plan command.
pub fn cmd_plan(args: &PlanArgs) -> Result<()> {
    if args.example {
        print_example();
        return Ok(());
    }

    let Some(path) = args.plan.as_deref() else {
        bail!("no plan file given (try --example)");
    };

    let plan = Plan::load(path)?;
    log::info!("Plan: {} ({} spans)", plan.name, plan.spans.len());
    if let Some(desc) = &plan.description {
        log::info!("  {}", desc);
    }

    let groups = plan.generate()?;
    emit_groups(groups, plan.canvas.scale, args.format, args.output.as_deref())
}

pub const EXAMPLE_PLAN: &str = r##"# Example ashiba plan
name: "North and east elevations"
description: "Two spans meeting at a corner"

canvas:
  scale: 10     # millimeters per pixel
  grid: 150     # snap grid in millimeters (0 = off)

defaults:
  bracket_size: W
  color: white

spans:
  - name: north
    start: [0, 0]
    end: [540, 0]

  - name: east
    start: [540, 0]
    end: [540, 360]
    bracket_size: S
    color: red
    reversed: true
"##;

fn print_example() {
    print!("{}", EXAMPLE_PLAN);
}
