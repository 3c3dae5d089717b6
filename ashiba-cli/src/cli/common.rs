//! Common utilities shared across CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use resvg::usvg;
use tiny_skia::Pixmap;

use ashiba::{PartColor, PartDetail, PillarMarker, Point, ScaffoldGroup, ScaffoldPart, mm_to_px};

use super::document::DrawingDocument;

/// Output format for generated groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Drawing document JSON
    Json,
    /// Vector preview
    Svg,
    /// Raster preview (needs --output)
    Png,
}

/// Anti board widths in mm, by the bracket they sit on.
const ANTI_W_WIDTH_MM: f64 = 400.0;
const ANTI_S_WIDTH_MM: f64 = 240.0;

/// Preview padding around the drawing, in px.
const PADDING: f64 = 20.0;

/// Raster previews are drawn at this multiple of canvas px.
const PNG_ZOOM: f32 = 2.0;

/// Parse an `x,y` pair.
pub fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{}'", s))?;
    let x: f64 = x.trim().parse().map_err(|_| format!("bad x coordinate '{}'", x))?;
    let y: f64 = y.trim().parse().map_err(|_| format!("bad y coordinate '{}'", y))?;
    if !(x.is_finite() && y.is_finite()) {
        return Err(format!("coordinates must be finite, got '{}'", s));
    }
    Ok(Point::new(x, y))
}

/// Write text to a file, or stdout when `output` is `None` or `-`.
pub fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) if path != Path::new("-") => {
            fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("Wrote: {}", path.display());
        }
        _ => println!("{}", content),
    }
    Ok(())
}

/// Emit groups in the requested format.
pub fn emit_groups(
    groups: Vec<ScaffoldGroup>,
    scale: f64,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let part_count: usize = groups.iter().map(|g| g.parts.len()).sum();
    log::info!("Generated {} parts in {} groups", part_count, groups.len());

    match format {
        OutputFormat::Json => {
            let document = DrawingDocument::new(scale, groups);
            write_output(&document.to_json()?, output)
        }
        OutputFormat::Svg => write_output(&groups_to_svg(&groups, scale), output),
        OutputFormat::Png => {
            let Some(path) = output.filter(|p| *p != Path::new("-")) else {
                bail!("PNG output needs a file: pass --output <file.png>");
            };
            render_png(&groups_to_svg(&groups, scale), path)
        }
    }
}

/// Stroke color for a part color on the dark preview background.
fn stroke_for(color: PartColor) -> &'static str {
    match color {
        PartColor::White => "#f5f5f5",
        PartColor::Red => "#e53935",
        PartColor::Blue => "#1e88e5",
        PartColor::Green => "#43a047",
    }
}

/// Unit vector of a member direction, in canvas space (y down).
fn direction_vector(direction: f64) -> (f64, f64) {
    let rad = direction.to_radians();
    (rad.cos(), -rad.sin())
}

/// Unit vector along a group's span.
fn span_vector(group: &ScaffoldGroup) -> (f64, f64) {
    let line = group.meta.line;
    let len = line.length_px();
    if len > 0.0 {
        ((line.end.x - line.start.x) / len, (line.end.y - line.start.y) / len)
    } else {
        (1.0, 0.0)
    }
}

/// Bounding box of all part anchors and span ends, padded for members.
fn bounds(groups: &[ScaffoldGroup], scale: f64) -> (f64, f64, f64, f64) {
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;

    let points = groups.iter().flat_map(|g| {
        g.parts
            .iter()
            .map(|p| p.position)
            .chain([g.meta.line.start, g.meta.line.end])
    });
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    if min_x > max_x {
        return (0.0, 0.0, 100.0, 100.0);
    }

    // Brackets reach out up to 600 mm from the span
    let reach = mm_to_px(600.0, scale) + PADDING;
    (min_x - reach, min_y - reach, max_x + reach, max_y + reach)
}

/// Render groups to an SVG preview.
///
/// Ledgers run along the span, brackets stick out in the member direction,
/// anti boards are drawn as rectangles on the bracket side and pillars as
/// small circles (filled when special, dashed when auxiliary).
pub fn groups_to_svg(groups: &[ScaffoldGroup], scale: f64) -> String {
    let (min_x, min_y, max_x, max_y) = bounds(groups, scale);
    let width = max_x - min_x;
    let height = max_y - min_y;

    let mut svg = String::new();
    svg.push_str(&format!(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}"
     viewBox="{:.2} {:.2} {:.2} {:.2}">
<rect x="{:.2}" y="{:.2}" width="100%" height="100%" fill="#1e1e1e"/>
"##,
        width, height, min_x, min_y, width, height, min_x, min_y
    ));

    for group in groups {
        svg.push_str(&format!(
            "<g id=\"group-{}\" fill=\"none\" stroke-width=\"1.5\" stroke-linecap=\"round\">\n",
            group.id
        ));

        let line = group.meta.line;
        svg.push_str(&format!(
            "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" \
             stroke=\"#757575\" stroke-dasharray=\"4 4\"/>\n",
            line.start.x, line.start.y, line.end.x, line.end.y
        ));

        for part in &group.parts {
            svg.push_str(&part_to_svg(part, group, scale));
        }

        svg.push_str("</g>\n");
    }

    svg.push_str("</svg>\n");
    svg
}

fn part_to_svg(part: &ScaffoldPart, group: &ScaffoldGroup, scale: f64) -> String {
    let stroke = stroke_for(part.color);
    let p = part.position;
    let (dx, dy) = direction_vector(part.direction());
    let (ux, uy) = span_vector(group);

    match part.detail {
        PartDetail::Pillar { marker, .. } => {
            let style = match marker {
                PillarMarker::Normal => String::new(),
                PillarMarker::Special => format!(" fill=\"{}\"", stroke),
                PillarMarker::Auxiliary => " stroke-dasharray=\"2 2\"".to_string(),
            };
            format!(
                "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"4\" stroke=\"{}\"{}/>\n",
                p.x, p.y, stroke, style
            )
        }
        PartDetail::Ledger { length, .. } => {
            // The last ledger may be longer than what is left of the span
            let remaining = p.distance(group.meta.line.end);
            let len = mm_to_px(length, scale).min(remaining);
            format!(
                "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" \
                 stroke=\"{}\" stroke-width=\"3\"/>\n",
                p.x, p.y, p.x + ux * len, p.y + uy * len, stroke
            )
        }
        PartDetail::Bracket { width, .. } => {
            let len = mm_to_px(width, scale);
            format!(
                "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\"/>\n",
                p.x, p.y, p.x + dx * len, p.y + dy * len, stroke
            )
        }
        PartDetail::Anti { length, anti_w, anti_s, .. } => {
            let board = if anti_w > 0 || anti_s == 0 { ANTI_W_WIDTH_MM } else { ANTI_S_WIDTH_MM };
            let half = mm_to_px(length, scale) / 2.0;
            let across = mm_to_px(board, scale);
            let corners = [
                (p.x - ux * half, p.y - uy * half),
                (p.x + ux * half, p.y + uy * half),
                (p.x + ux * half + dx * across, p.y + uy * half + dy * across),
                (p.x - ux * half + dx * across, p.y - uy * half + dy * across),
            ];
            let points: String = corners
                .iter()
                .map(|(x, y)| format!("{:.2},{:.2}", x, y))
                .collect::<Vec<_>>()
                .join(" ");
            format!(
                "  <polygon points=\"{}\" stroke=\"{}\" stroke-opacity=\"0.6\"/>\n",
                points, stroke
            )
        }
        PartDetail::Stair { length, .. } | PartDetail::Frame { length, .. } => {
            let len = mm_to_px(length, scale);
            format!(
                "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" \
                 stroke=\"{}\" stroke-dasharray=\"6 2\"/>\n",
                p.x, p.y, p.x + dx * len, p.y + dy * len, stroke
            )
        }
    }
}

/// Rasterize an SVG preview to a PNG file.
pub fn render_png(svg: &str, path: &Path) -> Result<()> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &options).context("failed to parse generated SVG")?;

    let size = tree.size().to_int_size();
    let width = (size.width() as f32 * PNG_ZOOM).ceil() as u32;
    let height = (size.height() as f32 * PNG_ZOOM).ceil() as u32;
    let mut pixmap = Pixmap::new(width, height)
        .with_context(|| format!("cannot allocate a {}x{} image", width, height))?;

    let transform = tiny_skia::Transform::from_scale(PNG_ZOOM, PNG_ZOOM);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .save_png(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("Wrote: {}", path.display());
    Ok(())
}
