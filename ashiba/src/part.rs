//! Scaffold parts and their typed metadata.
//!
//! Each part type carries a different set of attributes, so the metadata is
//! a sum type ([`PartDetail`]) instead of an open map. The JSON shape stays
//! the flat `{type, position, color, marker?, meta: {...}}` record the
//! drawing document stores; [`PartRecord`] is that record, and the
//! conversions between the two are the only place the mapping lives.
//!
//! ## Rust Lesson #24: `#[serde(try_from, into)]`
//!
//! Instead of hand-writing `Serialize`/`Deserialize`, we let serde go through
//! a plain "wire" struct and convert with `From`/`TryFrom`. Validation
//! errors from `TryFrom` surface as ordinary deserialization errors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::geometry::Point;

/// Errors raised when parsing part attributes or loading part records.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PartError {
    #[error("unknown bracket size '{0}' (expected W or S)")]
    UnknownBracketSize(String),
    #[error("unknown color '{0}' (expected white, red, blue or green)")]
    UnknownColor(String),
    #[error("unknown pillar marker '{0}' (expected normal, special or auxiliary)")]
    UnknownMarker(String),
    #[error("{part_type} part is missing meta.{field}")]
    MissingField { part_type: PartType, field: &'static str },
}

/// Unique, immutable identifier of a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(Uuid);

impl PartId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PartId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The closed set of scaffold member kinds.
///
/// Older drawings store the Japanese trade names; those are accepted as
/// aliases when loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartType {
    #[serde(alias = "柱")]
    Pillar,
    #[serde(alias = "布材", alias = "cloth")]
    Ledger,
    #[serde(alias = "ブラケット")]
    Bracket,
    #[serde(alias = "アンチ", alias = "decking")]
    Anti,
    #[serde(alias = "階段")]
    Stair,
    #[serde(alias = "梁枠")]
    Frame,
}

impl PartType {
    pub fn all() -> &'static [PartType] {
        &[
            PartType::Pillar,
            PartType::Ledger,
            PartType::Bracket,
            PartType::Anti,
            PartType::Stair,
            PartType::Frame,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PartType::Pillar => "pillar",
            PartType::Ledger => "ledger",
            PartType::Bracket => "bracket",
            PartType::Anti => "anti",
            PartType::Stair => "stair",
            PartType::Frame => "frame",
        }
    }
}

impl fmt::Display for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display/category tag copied from the drawing color at generation time.
///
/// Purely cosmetic; never changes geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartColor {
    #[default]
    White,
    Red,
    Blue,
    Green,
}

impl PartColor {
    pub fn all() -> &'static [PartColor] {
        &[PartColor::White, PartColor::Red, PartColor::Blue, PartColor::Green]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PartColor::White => "white",
            PartColor::Red => "red",
            PartColor::Blue => "blue",
            PartColor::Green => "green",
        }
    }
}

impl fmt::Display for PartColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PartColor {
    type Err = PartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "white" | "#fff" | "#ffffff" => Ok(PartColor::White),
            "red" | "#f00" | "#ff0000" => Ok(PartColor::Red),
            "blue" | "#00f" | "#0000ff" => Ok(PartColor::Blue),
            "green" | "#0f0" | "#00ff00" | "#008000" => Ok(PartColor::Green),
            _ => Err(PartError::UnknownColor(s.to_string())),
        }
    }
}

/// Pillar sub-classification. Only affects quantity counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PillarMarker {
    #[default]
    Normal,
    Special,
    Auxiliary,
}

impl PillarMarker {
    pub fn name(&self) -> &'static str {
        match self {
            PillarMarker::Normal => "normal",
            PillarMarker::Special => "special",
            PillarMarker::Auxiliary => "auxiliary",
        }
    }

    /// Whether pillars with this marker go into the quantity count.
    pub fn is_counted(&self) -> bool {
        !matches!(self, PillarMarker::Auxiliary)
    }
}

impl FromStr for PillarMarker {
    type Err = PartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(PillarMarker::Normal),
            "special" => Ok(PillarMarker::Special),
            "auxiliary" | "aux" => Ok(PillarMarker::Auxiliary),
            _ => Err(PartError::UnknownMarker(s.to_string())),
        }
    }
}

/// Bracket size: W is 600 mm wide, S is 355 mm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum BracketSize {
    #[default]
    W,
    S,
}

impl BracketSize {
    /// Bracket width in millimeters.
    pub fn width_mm(&self) -> f64 {
        match self {
            BracketSize::W => 600.0,
            BracketSize::S => 355.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BracketSize::W => "W",
            BracketSize::S => "S",
        }
    }
}

impl fmt::Display for BracketSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BracketSize {
    type Err = PartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "W" | "w" => Ok(BracketSize::W),
            "S" | "s" => Ok(BracketSize::S),
            _ => Err(PartError::UnknownBracketSize(s.to_string())),
        }
    }
}

/// Per-type attributes of a part.
///
/// Lengths and widths are millimeters, directions degrees. `index` is the
/// module boundary a generated part belongs to; parts added by hand have
/// none.
#[derive(Debug, Clone, PartialEq)]
pub enum PartDetail {
    Pillar {
        direction: f64,
        index: Option<usize>,
        marker: PillarMarker,
    },
    Ledger {
        length: f64,
        direction: f64,
        index: Option<usize>,
    },
    Bracket {
        bracket_size: BracketSize,
        width: f64,
        direction: f64,
        index: Option<usize>,
    },
    Anti {
        length: f64,
        levels: u32,
        anti_w: u32,
        anti_s: u32,
        direction: f64,
        index: Option<usize>,
    },
    Stair {
        length: f64,
        levels: u32,
        direction: f64,
    },
    Frame {
        length: f64,
        direction: f64,
    },
}

impl PartDetail {
    pub fn part_type(&self) -> PartType {
        match self {
            PartDetail::Pillar { .. } => PartType::Pillar,
            PartDetail::Ledger { .. } => PartType::Ledger,
            PartDetail::Bracket { .. } => PartType::Bracket,
            PartDetail::Anti { .. } => PartType::Anti,
            PartDetail::Stair { .. } => PartType::Stair,
            PartDetail::Frame { .. } => PartType::Frame,
        }
    }

    pub fn direction(&self) -> f64 {
        match *self {
            PartDetail::Pillar { direction, .. }
            | PartDetail::Ledger { direction, .. }
            | PartDetail::Bracket { direction, .. }
            | PartDetail::Anti { direction, .. }
            | PartDetail::Stair { direction, .. }
            | PartDetail::Frame { direction, .. } => direction,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match *self {
            PartDetail::Pillar { index, .. }
            | PartDetail::Ledger { index, .. }
            | PartDetail::Bracket { index, .. }
            | PartDetail::Anti { index, .. } => index,
            PartDetail::Stair { .. } | PartDetail::Frame { .. } => None,
        }
    }

    /// Member length in millimeters, for types that have one.
    pub fn length(&self) -> Option<f64> {
        match *self {
            PartDetail::Ledger { length, .. }
            | PartDetail::Anti { length, .. }
            | PartDetail::Stair { length, .. }
            | PartDetail::Frame { length, .. } => Some(length),
            PartDetail::Pillar { .. } | PartDetail::Bracket { .. } => None,
        }
    }
}

/// A single physical scaffold member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PartRecord", into = "PartRecord")]
pub struct ScaffoldPart {
    pub id: PartId,
    /// Anchor in pixel space. Pillars and brackets sit on it, ledgers start
    /// at it, anti boards are centered on it.
    pub position: Point,
    pub color: PartColor,
    pub detail: PartDetail,
    /// Free-form meta keys this crate does not interpret. Kept so a drawing
    /// reloads exactly as it was saved. Typed keys the part type has no use
    /// for (a `levels` on a ledger, say) end up here too.
    pub extra: Map<String, Value>,
    /// Top-level record keys outside the known set, including a `marker` on
    /// a part that is not a pillar.
    pub record_extra: Map<String, Value>,
}

impl ScaffoldPart {
    /// Create a part with a fresh id.
    pub fn new(position: Point, color: PartColor, detail: PartDetail) -> Self {
        Self {
            id: PartId::new(),
            position,
            color,
            detail,
            extra: Map::new(),
            record_extra: Map::new(),
        }
    }

    #[inline]
    pub fn part_type(&self) -> PartType {
        self.detail.part_type()
    }

    #[inline]
    pub fn direction(&self) -> f64 {
        self.detail.direction()
    }

    /// The pillar marker, or `None` for any other part type.
    pub fn marker(&self) -> Option<PillarMarker> {
        match self.detail {
            PartDetail::Pillar { marker, .. } => Some(marker),
            _ => None,
        }
    }
}

/// Flat meta bag as stored in the drawing JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bracket_size: Option<BracketSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anti_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anti_s: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PartMeta {
    /// Typed keys that are set and will be written as their own fields.
    fn typed_keys(&self) -> Vec<&'static str> {
        [
            ("length", self.length.is_some()),
            ("width", self.width.is_some()),
            ("direction", self.direction.is_some()),
            ("index", self.index.is_some()),
            ("bracketSize", self.bracket_size.is_some()),
            ("levels", self.levels.is_some()),
            ("antiW", self.anti_w.is_some()),
            ("antiS", self.anti_s.is_some()),
        ]
        .into_iter()
        .filter_map(|(key, set)| set.then_some(key))
        .collect()
    }
}

/// Top-level keys of [`PartRecord`] other than `marker`.
const RECORD_KEYS: [&str; 5] = ["id", "type", "position", "color", "meta"];

/// Wire form of [`ScaffoldPart`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRecord {
    pub id: PartId,
    #[serde(rename = "type")]
    pub part_type: PartType,
    pub position: Point,
    #[serde(default)]
    pub color: PartColor,
    /// Kept raw so a marker on a non-pillar survives whatever it holds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Value>,
    #[serde(default)]
    pub meta: PartMeta,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<ScaffoldPart> for PartRecord {
    fn from(part: ScaffoldPart) -> Self {
        let part_type = part.detail.part_type();
        let mut meta = PartMeta {
            direction: Some(part.detail.direction()),
            index: part.detail.index(),
            length: part.detail.length(),
            ..PartMeta::default()
        };
        let mut record_extra = part.record_extra;
        let stray_marker = record_extra.remove("marker");
        record_extra.retain(|key, _| !RECORD_KEYS.contains(&key.as_str()));

        let marker = match part.detail {
            PartDetail::Pillar { marker, .. } => Some(Value::from(marker.name())),
            PartDetail::Bracket { bracket_size, width, .. } => {
                meta.bracket_size = Some(bracket_size);
                meta.width = Some(width);
                stray_marker
            }
            PartDetail::Anti { levels, anti_w, anti_s, .. } => {
                meta.levels = Some(levels);
                meta.anti_w = Some(anti_w);
                meta.anti_s = Some(anti_s);
                stray_marker
            }
            PartDetail::Stair { levels, .. } => {
                meta.levels = Some(levels);
                stray_marker
            }
            PartDetail::Ledger { .. } | PartDetail::Frame { .. } => stray_marker,
        };

        // Typed fields win over free-form keys of the same name
        let typed = meta.typed_keys();
        meta.extra = part.extra;
        meta.extra.retain(|key, _| !typed.contains(&key.as_str()));

        PartRecord {
            id: part.id,
            part_type,
            position: part.position,
            color: part.color,
            marker,
            meta,
            extra: record_extra,
        }
    }
}

fn parse_marker(value: Value) -> Result<PillarMarker, PartError> {
    match value {
        Value::String(s) => s.parse(),
        other => Err(PartError::UnknownMarker(other.to_string())),
    }
}

impl TryFrom<PartRecord> for ScaffoldPart {
    type Error = PartError;

    fn try_from(record: PartRecord) -> Result<Self, Self::Error> {
        let PartRecord {
            id,
            part_type,
            position,
            color,
            mut marker,
            meta,
            extra: mut record_extra,
        } = record;
        let PartMeta {
            mut length,
            mut width,
            direction,
            mut index,
            mut bracket_size,
            mut levels,
            mut anti_w,
            mut anti_s,
            mut extra,
        } = meta;
        let missing = |field: &'static str| PartError::MissingField { part_type, field };

        let direction = direction.ok_or_else(|| missing("direction"))?;

        let detail = match part_type {
            PartType::Pillar => PartDetail::Pillar {
                direction,
                index: index.take(),
                marker: marker.take().map(parse_marker).transpose()?.unwrap_or_default(),
            },
            PartType::Ledger => PartDetail::Ledger {
                length: length.take().ok_or_else(|| missing("length"))?,
                direction,
                index: index.take(),
            },
            PartType::Bracket => {
                let bracket_size = bracket_size.take().ok_or_else(|| missing("bracketSize"))?;
                PartDetail::Bracket {
                    bracket_size,
                    width: width.take().unwrap_or_else(|| bracket_size.width_mm()),
                    direction,
                    index: index.take(),
                }
            }
            PartType::Anti => PartDetail::Anti {
                length: length.take().ok_or_else(|| missing("length"))?,
                levels: levels.take().unwrap_or(1),
                anti_w: anti_w.take().unwrap_or(0),
                anti_s: anti_s.take().unwrap_or(0),
                direction,
                index: index.take(),
            },
            PartType::Stair => PartDetail::Stair {
                length: length.take().ok_or_else(|| missing("length"))?,
                levels: levels.take().unwrap_or(1),
                direction,
            },
            PartType::Frame => PartDetail::Frame {
                length: length.take().ok_or_else(|| missing("length"))?,
                direction,
            },
        };

        // Whatever this part type did not take goes back with the free-form keys
        let unused = [
            ("length", length.map(Value::from)),
            ("width", width.map(Value::from)),
            ("index", index.map(Value::from)),
            ("bracketSize", bracket_size.map(|b| Value::from(b.name()))),
            ("levels", levels.map(Value::from)),
            ("antiW", anti_w.map(Value::from)),
            ("antiS", anti_s.map(Value::from)),
        ];
        for (key, value) in unused {
            if let Some(value) = value {
                extra.insert(key.to_string(), value);
            }
        }
        if let Some(marker) = marker {
            record_extra.insert("marker".to_string(), marker);
        }

        Ok(ScaffoldPart { id, position, color, detail, extra, record_extra })
    }
}
