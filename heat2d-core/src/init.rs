use crate::field::Field;

pub const AMBIENT_TEMPERATURE: f64 = 0.0;
pub const HOT_TEMPERATURE: f64 = 100.0;

/// Half-open index range `[N/4, 3N/4)` covered by the hot block, on both axes.
pub fn hot_block_range(n: usize) -> std::ops::Range<usize> {
    (n / 4)..(3 * n / 4)
}

/// Resets `field` to the starting state: ambient everywhere, with a hot
/// square block centered in the grid.
///
/// For N < 4 the block is empty or degenerate; that is not an error.
pub fn initialize(field: &mut Field) {
    field.fill(AMBIENT_TEMPERATURE);

    let block = hot_block_range(field.n());
    for i in block.clone() {
        for j in block.clone() {
            field.set(i, j, HOT_TEMPERATURE);
        }
    }
}
