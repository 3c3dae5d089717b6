//! Direction command - show which way members face for a span.

use anyhow::Result;
use clap::Args;
use serde_json::json;

use ashiba::{Point, calculate_direction, direction_to_text, round_to_cardinal_direction};

use super::common::parse_point;

#[derive(Debug, Clone, Args)]
pub struct DirectionArgs {
    /// Span start as x,y in canvas pixels
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub start: Point,

    /// Span end as x,y in canvas pixels
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub end: Point,

    /// Members on the other side of the span
    #[arg(short, long)]
    pub reversed: bool,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the direction command.
pub fn cmd_direction(args: &DirectionArgs) -> Result<()> {
    if args.start == args.end {
        log::warn!("start and end are the same point; direction is arbitrary");
    }

    let direction = calculate_direction(args.start, args.end, args.reversed);
    let cardinal = round_to_cardinal_direction(direction);
    let label = direction_to_text(direction);

    if args.json {
        let value = json!({
            "direction": direction,
            "cardinal": cardinal,
            "label": label,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("Direction: {:.1}°", direction);
        println!("Cardinal:  {} ({})", cardinal, label);
    }
    Ok(())
}
