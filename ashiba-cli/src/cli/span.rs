//! Span command - generate the parts for one drawn line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use ashiba::{
    BracketSize, DEFAULT_SCALE, PartColor, Point, SpanConfig, SpanGenerator, SpanRequest,
    SpanSettings,
};

use super::common::{OutputFormat, emit_groups, parse_point};

/// Generation settings shared by `span` and `import`.
#[derive(Debug, Clone, Args)]
pub struct SettingsArgs {
    /// Bracket size (W = 600 mm, S = 355 mm)
    #[arg(short, long, default_value = "W")]
    pub bracket: BracketSize,

    /// Part color (white, red, blue, green)
    #[arg(short, long, default_value = "white")]
    pub color: PartColor,

    /// Put members on the other side of the span
    #[arg(short, long)]
    pub reversed: bool,

    /// Millimeters per canvas pixel
    #[arg(short, long, default_value_t = DEFAULT_SCALE)]
    pub scale: f64,
}

impl SettingsArgs {
    pub fn span_settings(&self) -> SpanSettings {
        SpanSettings {
            bracket_size: self.bracket,
            reversed: self.reversed,
            current_color: self.color,
        }
    }

    pub fn generator(&self) -> Result<SpanGenerator> {
        let config = SpanConfig::with_scale(self.scale);
        config.validate().context("invalid --scale")?;
        Ok(SpanGenerator::new(config))
    }
}

/// Where and how to write generated groups.
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Output file (stdout if omitted or "-")
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct SpanArgs {
    /// Span start as x,y in canvas pixels
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub start: Point,

    /// Span end as x,y in canvas pixels
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub end: Point,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Execute the span command.
pub fn cmd_span(args: &SpanArgs) -> Result<()> {
    let generator = args.settings.generator()?;
    let request = SpanRequest::new(args.start, args.end, args.settings.span_settings());

    let group = generator.generate(&request).with_context(|| {
        format!("cannot generate span {} -> {}", fmt_point(args.start), fmt_point(args.end))
    })?;

    log::info!(
        "{:.0} mm span, {} parts, direction {:.1}",
        group.meta.span_length,
        group.parts.len(),
        group.parts.first().map(|p| p.direction()).unwrap_or_default()
    );

    emit_groups(vec![group], args.settings.scale, args.output.format, args.output.output.as_deref())
}

pub fn fmt_point(p: Point) -> String {
    format!("({}, {})", p.x, p.y)
}
