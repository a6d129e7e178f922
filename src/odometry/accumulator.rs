// Tick delta accumulation
//
// Samples arrive at whatever rate the serial link delivers them; the
// integrator consumes at a fixed rate. The accumulator is the hand-off
// point between the two: every observed tick change is drained exactly
// once, no matter how many samples land between two drains.

use super::decoder::EncoderSample;

#[derive(Debug, Default)]
pub struct EncoderAccumulator {
    prev: EncoderSample,
    delta_left: i32,
    delta_right: i32,
}

impl EncoderAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one sample into the pending deltas.
    ///
    /// A sample bit-identical to the previous one means the board
    /// re-sent old data; it is skipped outright. The per-sample
    /// difference wraps (counter rollover shows up as a small wrapped
    /// delta) and accumulation saturates rather than overflowing.
    pub fn observe(&mut self, sample: EncoderSample) {
        if sample == self.prev {
            return;
        }
        self.delta_left = self
            .delta_left
            .saturating_add(sample.left_ticks.wrapping_sub(self.prev.left_ticks));
        self.delta_right = self
            .delta_right
            .saturating_add(sample.right_ticks.wrapping_sub(self.prev.right_ticks));
        self.prev = sample;
    }

    /// Take the accumulated deltas and reset them to zero.
    pub fn drain(&mut self) -> (i32, i32) {
        (
            std::mem::take(&mut self.delta_left),
            std::mem::take(&mut self.delta_right),
        )
    }
}
