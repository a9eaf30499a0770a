//! Overlay display settings chosen by the user.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::chess::PieceColor;

/// Which side's outlines/arrows are drawn. Fills always show both sides.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SideFilter {
    White,
    Black,
    #[default]
    Both,
}

impl SideFilter {
    pub const ALL: [SideFilter; 3] = [SideFilter::White, SideFilter::Black, SideFilter::Both];

    pub fn includes(self, color: PieceColor) -> bool {
        match self {
            SideFilter::White => color == PieceColor::White,
            SideFilter::Black => color == PieceColor::Black,
            SideFilter::Both => true,
        }
    }

    /// Side drawn in per-type colors; the other side gets the single fixed color
    pub fn keyed_side(self) -> PieceColor {
        match self {
            SideFilter::Black => PieceColor::Black,
            SideFilter::White | SideFilter::Both => PieceColor::White,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SideFilter::White => "White",
            SideFilter::Black => "Black",
            SideFilter::Both => "Both",
        }
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OverlayStyle {
    /// Dashed rings per attacker plus count badges on contested squares
    #[default]
    Squares,
    /// One glyph per attacked square, one arrow per sliding ray
    Arrows,
}

impl OverlayStyle {
    pub const ALL: [OverlayStyle; 2] = [OverlayStyle::Squares, OverlayStyle::Arrows];

    pub fn label(self) -> &'static str {
        match self {
            OverlayStyle::Squares => "Squares",
            OverlayStyle::Arrows => "Arrows",
        }
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OverlaySettings {
    pub side: SideFilter,
    pub style: OverlayStyle,
}
