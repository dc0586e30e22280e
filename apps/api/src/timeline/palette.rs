//! Deterministic bar colors: a pure function of (bucket, index).

use std::fmt;

use serde::{Serialize, Serializer};

use crate::timeline::normalize::TaskKind;

const TECHNICAL_PALETTE: [&str; 5] = ["#3B82F6", "#6366F1", "#0EA5E9", "#8B5CF6", "#06B6D4"];
const NON_TECHNICAL_PALETTE: [&str; 5] = ["#10B981", "#F59E0B", "#EC4899", "#84CC16", "#F97316"];

/// Golden angle in degrees; successive indices land far apart on the hue wheel.
const GOLDEN_ANGLE: f64 = 137.5;
const FALLBACK_SATURATION: u8 = 65;
const FALLBACK_LIGHTNESS: u8 = 55;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Hex(&'static str),
    Hsl { hue: f64, saturation: u8, lightness: u8 },
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Hex(hex) => f.write_str(hex),
            Color::Hsl {
                hue,
                saturation,
                lightness,
            } => write!(f, "hsl({hue}, {saturation}%, {lightness}%)"),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Technical and non-technical tasks cycle through their palette by `index mod 5`.
/// Anything else gets a golden-angle hue at fixed saturation and lightness.
pub fn color_for(kind: TaskKind, index: usize) -> Color {
    match kind {
        TaskKind::Technical => Color::Hex(TECHNICAL_PALETTE[index % TECHNICAL_PALETTE.len()]),
        TaskKind::NonTechnical => {
            Color::Hex(NON_TECHNICAL_PALETTE[index % NON_TECHNICAL_PALETTE.len()])
        }
        TaskKind::Other => Color::Hsl {
            hue: (index as f64 * GOLDEN_ANGLE) % 360.0,
            saturation: FALLBACK_SATURATION,
            lightness: FALLBACK_LIGHTNESS,
        },
    }
}
