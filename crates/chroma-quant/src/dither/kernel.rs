//! Error diffusion kernel definition.
//!
//! The kernel specifies how each pixel's quantization error is spread
//! over neighbouring pixels that have not been processed yet.

/// An error diffusion kernel with direction-relative and literal taps.
///
/// Same-row taps (`ahead`) are expressed in scan-direction steps: on a
/// right-to-left row they point left. Lower-row taps (`below`) use
/// literal column offsets and are NOT mirrored when the scan direction
/// flips — the lower rows receive error in the same left/right pattern
/// regardless of how the current row is being traversed.
///
/// Each neighbour receives `error * weight / divisor`.
#[derive(Debug, Clone, Copy)]
pub struct DiffusionKernel {
    /// (steps-ahead, weight) taps on the current row.
    pub ahead: &'static [(i32, u8)],
    /// (column-offset, row-offset, weight) taps on the rows below.
    pub below: &'static [(i32, i32, u8)],
    /// Total divisor normalizing the weights.
    pub divisor: u8,
    /// Furthest row below that any tap reaches; the lookahead window
    /// needs `max_dy + 1` rows.
    pub max_dy: usize,
}

/// Jarvis-Judice-Ninke kernel: 12 neighbours over 3 rows, 100% of the
/// error propagated (48/48).
///
/// ```text
///            X   7   5
///    3   5   7   5   3
///    1   3   5   3   1
/// ```
pub const JARVIS_JUDICE_NINKE: DiffusionKernel = DiffusionKernel {
    ahead: &[
        (1, 7), // next pixel in scan direction
        (2, 5), // two ahead
    ],
    below: &[
        (-2, 1, 3),
        (-1, 1, 5),
        (0, 1, 7),
        (1, 1, 5),
        (2, 1, 3),
        (-2, 2, 1),
        (-1, 2, 3),
        (0, 2, 5),
        (1, 2, 3),
        (2, 2, 1),
    ],
    divisor: 48,
    max_dy: 2,
};
