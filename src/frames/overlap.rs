//! Overlap/intersection matrix between frames
//!
//! For every ordered pair of frames `(a, b)` the matrix records how many cells
//! they share and where the shared run starts inside `a`. Two frames in
//! different directions share at most one cell; two frames on the same line
//! share a contiguous run. Either way the shared cells are the slice
//! `a.cells[first..first + shared]`, so no per-pair cell list is stored.
//!
//! The table is dense (`FRAME_COUNT²` entries, ~2 MB) so lookups on the combo
//! search hot path are a single index. It depends only on geometry and is
//! never mutated after construction.

use crate::board::{Pos, WIN_LENGTH};

use super::{FrameId, FrameTable};

/// Relationship of one frame to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overlap {
    /// Number of shared cells (0 = disjoint)
    pub shared: u8,
    /// Offset in the first frame of the first shared cell
    pub first: u8,
}

impl Overlap {
    #[inline]
    pub fn overlaps(self) -> bool {
        self.shared > 0
    }
}

/// Dense, read-only frame × frame overlap table
#[derive(Debug, Clone)]
pub struct OverlapMatrix {
    size: usize,
    entries: Vec<Overlap>,
    /// Per frame, every other frame it overlaps, in id order
    partners: Vec<Vec<FrameId>>,
}

impl OverlapMatrix {
    /// Build the matrix from the frame table.
    ///
    /// Only frames that cover a common cell can overlap, so the pairs are
    /// gathered cell by cell instead of testing all `F²` combinations.
    #[must_use]
    pub fn new(table: &FrameTable) -> Self {
        let size = table.len();
        let mut entries = vec![
            Overlap {
                shared: 0,
                first: u8::MAX,
            };
            size * size
        ];

        for frame in table.all_frames() {
            for &cell in &frame.cells {
                let offset = frame.offset_of(cell).unwrap_or(0) as u8;
                for &other in table.frames_covering(cell) {
                    let entry = &mut entries[frame.id.index() * size + other.index()];
                    entry.shared += 1;
                    entry.first = entry.first.min(offset);
                }
            }
        }

        let mut partners = vec![Vec::new(); size];
        for (a, list) in partners.iter_mut().enumerate() {
            for b in 0..size {
                let entry = &mut entries[a * size + b];
                if entry.shared == 0 {
                    entry.first = 0;
                } else if a != b {
                    list.push(FrameId(b as u16));
                }
            }
        }

        Self {
            size,
            entries,
            partners,
        }
    }

    /// Raw entry for `(a, b)`.
    ///
    /// Panics if either identifier is outside the table; that means the
    /// caller's data model is corrupt.
    #[inline]
    pub fn get(&self, a: FrameId, b: FrameId) -> Overlap {
        assert!(
            a.index() < self.size && b.index() < self.size,
            "overlap query on unknown frame ({a}, {b})"
        );
        self.entries[a.index() * self.size + b.index()]
    }

    /// Whether the two frames share at least one cell
    #[inline]
    pub fn overlaps(&self, a: FrameId, b: FrameId) -> bool {
        self.get(a, b).overlaps()
    }

    /// The cells shared by `a` and `b`, in `a`'s order
    pub fn shared_cells<'t>(&self, table: &'t FrameTable, a: FrameId, b: FrameId) -> &'t [Pos] {
        let entry = self.get(a, b);
        let start = entry.first as usize;
        &table.frame(a).cells[start..start + entry.shared as usize]
    }

    /// Cells beyond `a` needed to cover `b` as well
    #[inline]
    pub fn extra_cells(&self, a: FrameId, b: FrameId) -> u8 {
        WIN_LENGTH as u8 - self.get(a, b).shared
    }

    /// Every other frame that overlaps `a`
    #[inline]
    pub fn partners(&self, a: FrameId) -> &[FrameId] {
        &self.partners[a.index()]
    }

    /// Number of unordered pairs of distinct overlapping frames
    pub fn pair_count(&self) -> usize {
        self.partners.iter().map(Vec::len).sum::<usize>() / 2
    }
}
