//! Glyph placement along a path.
//!
//! Glyph measurement is the caller's job: each glyph is described only by its
//! advance width. A glyph is anchored at the distance where its left edge
//! starts, pushed off the baseline along the normal by the font descent, and
//! rotated to the tangent at its horizontal middle.

use serde::{Deserialize, Serialize};

use crate::geom::{ARC_LENGTH_SAMPLES, ArcLengthTable, Curve2, PathState, PiecewisePath, Point2};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LayoutError {
    #[error("path needs at least two anchors to carry text")]
    EmptyPath,
    #[error("advance width of glyph {index} is not finite")]
    NonFiniteAdvance { index: usize },
    #[error("invalid layout options: {0}")]
    InvalidOptions(String),
}

/// Options for [`layout_along_path`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextOnPathOptions {
    /// Font size in path units.
    pub font_size: f64,
    /// Extra space after every glyph, in thousandths of an em.
    pub letter_spacing: f64,
    /// Baseline offset along the normal, as a fraction of the font size.
    pub descent_ratio: f64,
    /// Distance along the path where the first glyph starts.
    pub start_offset: f64,
}

impl Default for TextOnPathOptions {
    fn default() -> Self {
        Self {
            font_size: 40.0,
            letter_spacing: 10.0,
            descent_ratio: 0.25,
            start_offset: 0.0,
        }
    }
}

impl TextOnPathOptions {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(LayoutError::InvalidOptions(format!(
                "font size must be finite and > 0, got {}",
                self.font_size
            )));
        }
        let fields = [
            ("letter spacing", self.letter_spacing),
            ("descent ratio", self.descent_ratio),
            ("start offset", self.start_offset),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(LayoutError::InvalidOptions(format!("{name} must be finite")));
            }
        }
        Ok(())
    }

    /// Extra advance added after each glyph.
    #[must_use]
    pub fn spacing_px(&self) -> f64 {
        self.letter_spacing / 1000.0 * self.font_size
    }

    #[must_use]
    pub fn descent_px(&self) -> f64 {
        self.font_size * self.descent_ratio
    }
}

/// Where and how to draw one glyph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlyphPlacement {
    pub index: usize,
    pub position: Point2,
    /// Rotation in radians.
    pub angle: f64,
    /// Distance along the path where the glyph starts.
    pub offset: f64,
}

impl GlyphPlacement {
    #[must_use]
    pub fn degrees(&self) -> f64 {
        self.angle.to_degrees()
    }
}

/// Lays out glyphs with the given advance widths one after another along
/// `path`. Negative advances count as zero.
pub fn layout_along_path(
    path: &PiecewisePath,
    advances: &[f64],
    options: &TextOnPathOptions,
) -> Result<Vec<GlyphPlacement>, LayoutError> {
    options.validate()?;
    if path.state() == PathState::Empty {
        return Err(LayoutError::EmptyPath);
    }

    let descent = options.descent_px();
    let spacing = options.spacing_px();
    let mut offset = options.start_offset;
    let mut placements = Vec::with_capacity(advances.len());

    for (index, &advance) in advances.iter().enumerate() {
        if !advance.is_finite() {
            return Err(LayoutError::NonFiniteAdvance { index });
        }
        let width = advance.max(0.0);
        let start = path.locate(offset).ok_or(LayoutError::EmptyPath)?;
        let middle = path.locate(offset + width / 2.0).ok_or(LayoutError::EmptyPath)?;

        placements.push(GlyphPlacement {
            index,
            position: start.position.add_vec(middle.normal.mul_scalar(descent)),
            angle: middle.angle,
            offset,
        });
        offset += width + spacing;
    }

    log::debug!(
        "laid out {} glyphs over {:.3} of {:.3} path units",
        placements.len(),
        offset - options.start_offset,
        path.length()
    );
    Ok(placements)
}

/// Distributes `count` glyph anchors evenly by arc length, each centred in
/// its share of the curve.
#[must_use]
pub fn layout_evenly<C: Curve2 + ?Sized>(curve: &C, count: usize) -> Vec<GlyphPlacement> {
    if count == 0 {
        return Vec::new();
    }
    let table = ArcLengthTable::build(curve, ARC_LENGTH_SAMPLES);
    let total = table.total_length();

    (0..count)
        .map(|index| {
            let u = (index as f64 + 0.5) / count as f64;
            let t = table.param_at_length_fraction(u);
            GlyphPlacement {
                index,
                position: curve.point_at(t),
                angle: curve.angle_at(t),
                offset: u * total,
            }
        })
        .collect()
}
