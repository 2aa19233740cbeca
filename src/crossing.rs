use crate::coords::Point2;

/// A geometric intersection shared by two or more lines, unique by coordinate.
#[derive(Clone, Copy, Debug)]
pub struct Crossing {
    pub pt: Point2,
    pub n_lines: u32,
}

/// A directional half-edge: one end of a [`Crossing`] attached to one line.
///
/// Invariant: `line_crossings[lc.i_opposite].i_opposite == lc_index` and the
/// two share `i_crossing` (see `AxialGraph::check_invariants`).
#[derive(Clone, Copy, Debug)]
pub struct LineCrossing {
    pub i_crossing: u32,
    pub i_line: u32,
    pub i_opposite: u32,
    pub line_pos: f32,
}
