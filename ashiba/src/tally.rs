//! Quantity counting over generated parts.
//!
//! The tally is what estimation works from: how many of each member a
//! drawing needs. Pillar markers matter here and nowhere else; auxiliary
//! pillars are drawn but never ordered.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::group::ScaffoldGroup;
use crate::part::{BracketSize, PartDetail, PillarMarker, ScaffoldPart};

/// Member quantities for a set of parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub pillars_normal: usize,
    pub pillars_special: usize,
    pub pillars_auxiliary: usize,
    /// Ledger count keyed by length in whole millimeters.
    pub ledgers: BTreeMap<u32, usize>,
    pub brackets: BTreeMap<BracketSize, usize>,
    /// Anti boards, one per level of each anti part.
    pub anti_boards: usize,
    pub anti_w: usize,
    pub anti_s: usize,
    pub stairs: usize,
    pub frames: usize,
}

impl Tally {
    pub fn from_parts<'a>(parts: impl IntoIterator<Item = &'a ScaffoldPart>) -> Self {
        let mut tally = Tally::default();
        for part in parts {
            tally.add(part);
        }
        tally
    }

    pub fn from_groups<'a>(groups: impl IntoIterator<Item = &'a ScaffoldGroup>) -> Self {
        Self::from_parts(groups.into_iter().flat_map(|g| g.parts.iter()))
    }

    /// Count one more part.
    pub fn add(&mut self, part: &ScaffoldPart) {
        match part.detail {
            PartDetail::Pillar { marker, .. } => match marker {
                PillarMarker::Normal => self.pillars_normal += 1,
                PillarMarker::Special => self.pillars_special += 1,
                PillarMarker::Auxiliary => self.pillars_auxiliary += 1,
            },
            PartDetail::Ledger { length, .. } => {
                *self.ledgers.entry(length.round().max(0.0) as u32).or_insert(0) += 1;
            }
            PartDetail::Bracket { bracket_size, .. } => {
                *self.brackets.entry(bracket_size).or_insert(0) += 1;
            }
            PartDetail::Anti { levels, anti_w, anti_s, .. } => {
                let levels = levels as usize;
                self.anti_boards += levels;
                self.anti_w += anti_w as usize * levels;
                self.anti_s += anti_s as usize * levels;
            }
            PartDetail::Stair { .. } => self.stairs += 1,
            PartDetail::Frame { .. } => self.frames += 1,
        }
    }

    /// Pillars that go into the order (auxiliary ones excluded).
    pub fn counted_pillars(&self) -> usize {
        self.pillars_normal + self.pillars_special
    }

    pub fn ledger_total(&self) -> usize {
        self.ledgers.values().sum()
    }

    pub fn bracket_total(&self) -> usize {
        self.brackets.values().sum()
    }

    /// Merge another tally into this one.
    pub fn merge(&mut self, other: &Tally) {
        self.pillars_normal += other.pillars_normal;
        self.pillars_special += other.pillars_special;
        self.pillars_auxiliary += other.pillars_auxiliary;
        for (length, n) in &other.ledgers {
            *self.ledgers.entry(*length).or_insert(0) += n;
        }
        for (size, n) in &other.brackets {
            *self.brackets.entry(*size).or_insert(0) += n;
        }
        self.anti_boards += other.anti_boards;
        self.anti_w += other.anti_w;
        self.anti_s += other.anti_s;
        self.stairs += other.stairs;
        self.frames += other.frames;
    }
}
