//! SVG span import - turn `<line>` elements of a sketch into span requests.
//!
//! Streams the document with quick-xml instead of building a tree; a sketch
//! is just a list of lines, so there is nothing a full SVG resolver would
//! add. Per-line settings come from `data-*` attributes:
//!
//! ```xml
//! <line id="north" x1="0" y1="0" x2="360" y2="0"
//!       data-bracket-size="S" data-reversed="true" data-color="red"/>
//! ```
//!
//! `stroke` is used as the color when `data-color` is absent and the stroke
//! names one of the part colors. Transforms are not applied.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use thiserror::Error;

use crate::geometry::Point;
use crate::part::{PartColor, PartError};
use crate::span::{SpanRequest, SpanSettings};

/// Error type for SVG span import.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("SVG parse error at byte {position}: {message}")]
    Parse { position: u64, message: String },
    #[error("bad {name}=\"{value}\" on <line> #{index}")]
    Attribute { index: usize, name: String, value: String },
    #[error("no <line> spans found in SVG")]
    NoSpans,
    #[error(transparent)]
    Part(#[from] PartError),
}

/// A span read from the sketch, with the element id if it had one.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgSpan {
    pub id: Option<String>,
    pub request: SpanRequest,
}

/// Extract every non-degenerate `<line>` as a span request.
///
/// `defaults` supplies the settings for lines without `data-*` overrides.
pub fn extract_spans_from_svg(
    svg_content: &str,
    defaults: SpanSettings,
) -> Result<Vec<SvgSpan>, SvgError> {
    let mut reader = Reader::from_str(svg_content);
    reader.config_mut().trim_text(true);

    let mut spans = Vec::new();
    let mut line_index = 0;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"line" =>
            {
                if let Some(span) = line_to_span(e, line_index, defaults)? {
                    spans.push(span);
                }
                line_index += 1;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SvgError::Parse {
                    position: reader.error_position(),
                    message: e.to_string(),
                });
            }
            _ => {}
        }
        buf.clear();
    }

    log::debug!("read {} spans from {} <line> elements", spans.len(), line_index);

    if spans.is_empty() {
        Err(SvgError::NoSpans)
    } else {
        Ok(spans)
    }
}

/// Convert one `<line>` element; `None` when the line has zero length.
fn line_to_span(
    e: &BytesStart<'_>,
    index: usize,
    defaults: SpanSettings,
) -> Result<Option<SvgSpan>, SvgError> {
    let mut id = None;
    let (mut x1, mut y1, mut x2, mut y2) = (0.0, 0.0, 0.0, 0.0);
    let mut settings = defaults;
    let mut data_color = None;
    let mut stroke = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|err| SvgError::Parse { position: 0, message: err.to_string() })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| SvgError::Parse { position: 0, message: err.to_string() })?
            .into_owned();

        let bad = || SvgError::Attribute { index, name: key.clone(), value: value.clone() };

        match key.as_str() {
            "id" if !value.is_empty() => id = Some(value.clone()),
            "x1" => x1 = parse_coordinate(&value).ok_or_else(bad)?,
            "y1" => y1 = parse_coordinate(&value).ok_or_else(bad)?,
            "x2" => x2 = parse_coordinate(&value).ok_or_else(bad)?,
            "y2" => y2 = parse_coordinate(&value).ok_or_else(bad)?,
            "data-bracket-size" => settings.bracket_size = value.parse()?,
            "data-reversed" => settings.reversed = parse_bool(&value).ok_or_else(bad)?,
            "data-color" => data_color = Some(value.parse::<PartColor>()?),
            "stroke" => stroke = value.parse::<PartColor>().ok(),
            _ => {}
        }
    }

    if let Some(color) = data_color.or(stroke) {
        settings.current_color = color;
    }

    let start = Point::new(x1, y1);
    let end = Point::new(x2, y2);
    if start == end {
        log::warn!("skipping zero-length <line> #{} ({:?})", index, id);
        return Ok(None);
    }

    Ok(Some(SvgSpan { id, request: SpanRequest::new(start, end, settings) }))
}

/// Parse a coordinate, allowing a trailing `px` unit.
fn parse_coordinate(value: &str) -> Option<f64> {
    let v = value.trim();
    let v = v.strip_suffix("px").unwrap_or(v);
    v.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}

// ============================================================================
// TESTS
// ============================================================================
