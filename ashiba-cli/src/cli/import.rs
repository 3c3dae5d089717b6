//! Import command - generate spans for every line of an SVG sketch.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use ashiba::extract_spans_from_svg;

use super::span::{OutputArgs, SettingsArgs, fmt_point};
use super::common::emit_groups;

#[derive(Debug, Clone, Args)]
pub struct ImportArgs {
    /// SVG sketch; each <line> becomes a span
    pub input: PathBuf,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Execute the import command.
pub fn cmd_import(args: &ImportArgs) -> Result<()> {
    let svg = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let spans = extract_spans_from_svg(&svg, args.settings.span_settings())
        .with_context(|| format!("failed to import {}", args.input.display()))?;
    log::info!("{}: {} spans", args.input.display(), spans.len());

    let generator = args.settings.generator()?;
    let mut groups = Vec::with_capacity(spans.len());
    for (i, span) in spans.iter().enumerate() {
        let label = span.id.clone().unwrap_or_else(|| format!("#{}", i));
        let group = generator.generate(&span.request).with_context(|| {
            format!(
                "line {} {} -> {}",
                label,
                fmt_point(span.request.start),
                fmt_point(span.request.end)
            )
        })?;
        groups.push(group);
    }

    emit_groups(groups, args.settings.scale, args.output.format, args.output.output.as_deref())
}
