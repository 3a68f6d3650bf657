//! Per-property lookup tables keyed by a shared time grid.
//!
//! Scanning keyframes every frame costs O(keyframes) per property. Instead the
//! builder lays a grid over the timeline whose step is the greatest common
//! divisor of all keyframe offsets, so every keyframe of every property lands
//! on a grid point. Each property then gets one cell per grid point:
//!
//! ```text
//! grid     0%    20%   40%   60%   80%   100%
//! color    seg→1 seg→4 jump1 jump1 seg→5 end
//! height   seg→5 jump0 jump0 jump0 jump0 end
//! ```
//!
//! A `Segment` cell starts an interpolation segment and points at the cell
//! where it ends. Grid points that fall inside one of the property's segments
//! hold a `Jump` back to the cell that owns the segment. Resolving a frame is
//! then a single index computation plus at most one redirect.

use std::collections::BTreeMap;

use crate::keyframes::{CanonicalKeyframes, MAX_OFFSET, MIN_OFFSET};
use crate::value::KeyframeValue;

/// One keyframe value of a single property.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleValueEntry {
    pub value: KeyframeValue,
    /// Scaled offset (`0..=100`).
    pub offset: u32,
}

impl StyleValueEntry {
    pub fn new(value: KeyframeValue, offset: u32) -> Self {
        Self { value, offset }
    }
}

/// What a grid cell holds for one property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Start of a segment running from this cell to cell `next`, interpolating
    /// between values `value_index` and `value_index + 1`.
    Segment { next: usize, value_index: usize },
    /// Inside a segment owned by the cell at `target`.
    Jump { target: usize },
    /// The final keyframe.
    Terminal,
}

/// A single grid cell for one property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumCell {
    /// Normalized offset (0.0 to 1.0) of this grid point.
    pub offset: f64,
    pub kind: CellKind,
}

impl SpectrumCell {
    /// Index of the cell ending this segment, if this cell starts one.
    pub fn next(&self) -> Option<usize> {
        match self.kind {
            CellKind::Segment { next, .. } => Some(next),
            _ => None,
        }
    }

    /// Index of the owning cell, if this is a jump cell.
    pub fn jump(&self) -> Option<usize> {
        match self.kind {
            CellKind::Jump { target } => Some(target),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == CellKind::Terminal
    }
}

/// Result of resolving a grid index for one property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup {
    /// The timeline is at its last keyframe.
    Final,
    /// Inside segment `value_index`, spanning `lower..upper` (normalized).
    Segment {
        value_index: usize,
        lower: f64,
        upper: f64,
    },
}

/// Lookup tables for every property of a keyframe timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Number of grid points shared by all properties.
    pub total_cells: usize,
    /// Grid cells per property.
    pub cells: BTreeMap<String, Vec<SpectrumCell>>,
    /// Keyframe values per property, in timeline order.
    pub values: BTreeMap<String, Vec<StyleValueEntry>>,
}

impl Spectrum {
    /// Build the spectrum for validated keyframes.
    pub fn build(keyframes: &CanonicalKeyframes) -> Self {
        let values = flatten_values(keyframes);
        let grid = grid_offsets(keyframes.lowest_common_offset);

        let cells = values
            .iter()
            .map(|(property, entries)| (property.clone(), build_cells(&grid, entries)))
            .collect();

        Self {
            total_cells: grid.len(),
            cells,
            values,
        }
    }

    /// Grid cells of a property.
    pub fn cells(&self, property: &str) -> Option<&[SpectrumCell]> {
        self.cells.get(property).map(Vec::as_slice)
    }

    /// Keyframe values of a property.
    pub fn values(&self, property: &str) -> Option<&[StyleValueEntry]> {
        self.values.get(property).map(Vec::as_slice)
    }

    /// Grid index for an eased progress value.
    pub fn grid_index(&self, progress: f64) -> usize {
        let limit = self.total_cells.saturating_sub(1);
        let index = (progress * limit as f64).floor().max(0.0) as usize;
        index.min(limit)
    }

    /// Resolve the segment of `property` at `grid_index`, following jumps.
    pub fn lookup(&self, property: &str, grid_index: usize) -> Option<Lookup> {
        let cells = self.cells.get(property)?;
        let mut cell = *cells.get(grid_index.min(cells.len().checked_sub(1)?))?;
        if let CellKind::Jump { target } = cell.kind {
            cell = *cells.get(target)?;
        }

        match cell.kind {
            CellKind::Segment { next, value_index } => Some(Lookup::Segment {
                value_index,
                lower: cell.offset,
                upper: cells.get(next)?.offset,
            }),
            CellKind::Terminal | CellKind::Jump { .. } => Some(Lookup::Final),
        }
    }
}

/// Shared grid: `0, g, 2g, ...` up to and including 100.
pub fn grid_offsets(lowest_common_offset: u32) -> Vec<u32> {
    let step = lowest_common_offset.clamp(1, MAX_OFFSET);
    let mut offsets: Vec<u32> = (MIN_OFFSET..MAX_OFFSET).step_by(step as usize).collect();
    offsets.push(MAX_OFFSET);
    offsets
}

fn flatten_values(keyframes: &CanonicalKeyframes) -> BTreeMap<String, Vec<StyleValueEntry>> {
    let mut values: BTreeMap<String, Vec<StyleValueEntry>> = BTreeMap::new();
    for (entry, &offset) in keyframes.entries.iter().zip(&keyframes.offsets) {
        for (property, value) in entry {
            values
                .entry(property.clone())
                .or_default()
                .push(StyleValueEntry::new(value.clone(), offset));
        }
    }
    values
}

fn build_cells(grid: &[u32], values: &[StyleValueEntry]) -> Vec<SpectrumCell> {
    let mut cells: Vec<SpectrumCell> = Vec::with_capacity(grid.len());
    let limit = values.len().saturating_sub(1);
    let mut value_index = 0;
    let mut next_offset = values.first().map_or(MIN_OFFSET, |entry| entry.offset);
    let mut previous: Option<usize> = None;

    for (grid_index, &percent) in grid.iter().enumerate() {
        let offset = percent as f64 / MAX_OFFSET as f64;

        let kind = if percent == next_offset {
            previous = Some(grid_index);
            if value_index < limit {
                let kind = CellKind::Segment {
                    next: grid_index + 1,
                    value_index,
                };
                value_index += 1;
                next_offset = values[value_index].offset;
                kind
            } else {
                CellKind::Terminal
            }
        } else if let Some(target) = previous {
            if let CellKind::Segment { next, .. } = &mut cells[target].kind {
                *next += 1;
            }
            CellKind::Jump { target }
        } else {
            // Unreachable for validated keyframes: every property starts at 0.
            CellKind::Terminal
        };

        cells.push(SpectrumCell { offset, kind });
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframes::{normalize, Keyframe};

    fn fixture() -> Spectrum {
        let keyframes = normalize(&[
            Keyframe::at(0.0).set("color", "red").set("height", 0),
            Keyframe::at(0.2).set("color", "blue"),
            Keyframe::at(0.8).set("color", "black"),
            Keyframe::at(1.0).set("color", "white").set("height", 100),
        ])
        .unwrap();
        Spectrum::build(&keyframes)
    }

    fn readable(cells: &[SpectrumCell]) -> Vec<(f64, Option<usize>, Option<usize>)> {
        cells
            .iter()
            .map(|cell| (cell.offset, cell.next(), cell.jump()))
            .collect()
    }

    #[test]
    fn test_grid_offsets() {
        assert_eq!(grid_offsets(20), vec![0, 20, 40, 60, 80, 100]);
        assert_eq!(grid_offsets(50), vec![0, 50, 100]);
        assert_eq!(grid_offsets(100), vec![0, 100]);
        assert_eq!(grid_offsets(1).len(), 101);
    }

    #[test]
    fn test_spectrum_fixture() {
        let spectrum = fixture();
        assert_eq!(spectrum.total_cells, 6);

        assert_eq!(
            readable(spectrum.cells("color").unwrap()),
            vec![
                (0.0, Some(1), None),
                (0.2, Some(4), None),
                (0.4, None, Some(1)),
                (0.6, None, Some(1)),
                (0.8, Some(5), None),
                (1.0, None, None),
            ]
        );

        assert_eq!(
            readable(spectrum.cells("height").unwrap()),
            vec![
                (0.0, Some(5), None),
                (0.2, None, Some(0)),
                (0.4, None, Some(0)),
                (0.6, None, Some(0)),
                (0.8, None, Some(0)),
                (1.0, None, None),
            ]
        );
    }

    #[test]
    fn test_values_skip_absent_properties() {
        let spectrum = fixture();
        let height: Vec<_> = spectrum
            .values("height")
            .unwrap()
            .iter()
            .map(|entry| entry.offset)
            .collect();
        assert_eq!(height, vec![0, 100]);
        assert_eq!(spectrum.values("color").unwrap().len(), 4);
    }

    #[test]
    fn test_value_indices_follow_segments() {
        let spectrum = fixture();
        let color = spectrum.cells("color").unwrap();
        assert_eq!(
            color[1].kind,
            CellKind::Segment {
                next: 4,
                value_index: 1
            }
        );
        assert_eq!(
            color[4].kind,
            CellKind::Segment {
                next: 5,
                value_index: 2
            }
        );
        assert!(color[5].is_terminal());
    }

    #[test]
    fn test_lookup_follows_jumps() {
        let spectrum = fixture();
        assert_eq!(
            spectrum.lookup("color", 3),
            Some(Lookup::Segment {
                value_index: 1,
                lower: 0.2,
                upper: 0.8
            })
        );
        assert_eq!(
            spectrum.lookup("height", 2),
            Some(Lookup::Segment {
                value_index: 0,
                lower: 0.0,
                upper: 1.0
            })
        );
        assert_eq!(spectrum.lookup("height", 5), Some(Lookup::Final));
        assert_eq!(spectrum.lookup("missing", 0), None);
    }

    #[test]
    fn test_grid_index() {
        let spectrum = fixture();
        assert_eq!(spectrum.grid_index(0.0), 0);
        assert_eq!(spectrum.grid_index(0.39), 1);
        assert_eq!(spectrum.grid_index(0.5), 2);
        assert_eq!(spectrum.grid_index(1.0), 5);
        assert_eq!(spectrum.grid_index(1.3), 5);
        assert_eq!(spectrum.grid_index(-0.2), 0);
    }

    #[test]
    fn test_evenly_divisible_property_has_no_jumps() {
        let keyframes = normalize(&[
            Keyframe::new().set("width", "0px"),
            Keyframe::new().set("width", "10px"),
            Keyframe::new().set("width", "20px"),
        ])
        .unwrap();
        let spectrum = Spectrum::build(&keyframes);
        let cells = spectrum.cells("width").unwrap();
        assert_eq!(cells.len(), 3);
        assert!(cells.iter().all(|cell| cell.jump().is_none()));
    }
}
