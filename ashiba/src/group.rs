//! Scaffold groups: the unit of generation and persistence.
//!
//! A group is produced whole by the span generator. After that it belongs to
//! the caller, who may add, edit and remove parts; the generator never
//! touches an existing group. The original line and settings stay in `meta`
//! so a group can be regenerated or flipped later.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::geometry::SpanLine;
use crate::part::{BracketSize, PartColor, PartDetail, PartId, PartType, PillarMarker, ScaffoldPart};
use crate::span::{SpanConfig, SpanError, SpanGenerator, SpanRequest, SpanSettings};

/// Errors from editing a group.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GroupError {
    #[error("no part with id {0} in this group")]
    PartNotFound(PartId),
    #[error("part {id} is a {part_type}, not a pillar")]
    NotAPillar { id: PartId, part_type: PartType },
}

/// Unique identifier of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(Uuid);

impl GroupId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The generation settings a group was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSettings {
    pub bracket_size: BracketSize,
    pub reversed: bool,
}

/// Generation metadata kept with a group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMeta {
    /// Span length in millimeters.
    pub span_length: f64,
    /// The drawn line, in pixel space.
    pub line: SpanLine,
    pub settings: GroupSettings,
}

/// All parts generated for one span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldGroup {
    pub id: GroupId,
    /// Ledgers, then pillars, then brackets, then anti boards as generated;
    /// parts added later are appended.
    pub parts: Vec<ScaffoldPart>,
    pub meta: GroupMeta,
}

impl ScaffoldGroup {
    /// Bundle parts into a new group with a fresh id.
    pub fn new(parts: Vec<ScaffoldPart>, meta: GroupMeta) -> Self {
        Self { id: GroupId::new(), parts, meta }
    }

    /// The span request this group was generated from, drawn in `color`.
    pub fn request(&self, color: PartColor) -> SpanRequest {
        SpanRequest::new(
            self.meta.line.start,
            self.meta.line.end,
            SpanSettings {
                bracket_size: self.meta.settings.bracket_size,
                reversed: self.meta.settings.reversed,
                current_color: color,
            },
        )
    }

    /// Color of the group's parts (taken from the first part).
    pub fn color(&self) -> Option<PartColor> {
        self.parts.first().map(|p| p.color)
    }

    pub fn parts_of_type(&self, part_type: PartType) -> impl Iterator<Item = &ScaffoldPart> {
        self.parts.iter().filter(move |p| p.part_type() == part_type)
    }

    pub fn part(&self, id: PartId) -> Option<&ScaffoldPart> {
        self.parts.iter().find(|p| p.id == id)
    }

    pub fn part_mut(&mut self, id: PartId) -> Option<&mut ScaffoldPart> {
        self.parts.iter_mut().find(|p| p.id == id)
    }

    /// Append a part and return its id.
    pub fn add_part(&mut self, part: ScaffoldPart) -> PartId {
        let id = part.id;
        self.parts.push(part);
        id
    }

    /// Remove a part, keeping the order of the rest.
    pub fn remove_part(&mut self, id: PartId) -> Option<ScaffoldPart> {
        let pos = self.parts.iter().position(|p| p.id == id)?;
        Some(self.parts.remove(pos))
    }

    pub fn set_pillar_marker(
        &mut self,
        id: PartId,
        new_marker: PillarMarker,
    ) -> Result<(), GroupError> {
        let part = self.part_mut(id).ok_or(GroupError::PartNotFound(id))?;
        match &mut part.detail {
            PartDetail::Pillar { marker, .. } => {
                *marker = new_marker;
                Ok(())
            }
            other => Err(GroupError::NotAPillar { id, part_type: other.part_type() }),
        }
    }

    /// Regenerate the group from its stored line with new settings.
    ///
    /// Produces a new group; hand edits on `self` are not carried over.
    pub fn regenerate(
        &self,
        config: &SpanConfig,
        settings: SpanSettings,
    ) -> Result<ScaffoldGroup, SpanError> {
        let request = SpanRequest::new(self.meta.line.start, self.meta.line.end, settings);
        SpanGenerator::new(*config).generate(&request)
    }

    /// Regenerate with members on the other side of the span.
    pub fn flipped(&self, config: &SpanConfig) -> Result<ScaffoldGroup, SpanError> {
        let mut request = self.request(self.color().unwrap_or_default());
        request.settings.reversed = !request.settings.reversed;
        SpanGenerator::new(*config).generate(&request)
    }
}
