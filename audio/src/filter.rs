//! Signal conditioning for the analog microphone path.
//!
//! The MAX4466-class analog front end delivers unsigned samples riding on
//! a half-scale DC bias, plus low-frequency rumble from the servos and the
//! desk itself. The chain here is: centre to signed, subtract the block
//! mean, single-pole high-pass across the whole stream, soft clamp.
//! Digital sources skip all of this.

/// High-pass coefficient. ~160 Hz corner at 16 kHz; keeps the speech band.
pub const HPF_ALPHA: f32 = 0.99;
/// Soft clamp bound, slightly inside i16 range to avoid wrap at the edge.
pub const SOFT_CLAMP: i16 = 32700;

/// Single-pole high-pass IIR: `y[n] = alpha * (y[n-1] + x[n] - x[n-1])`.
/// State is carried across blocks so packet boundaries stay click-free.
#[derive(Debug)]
pub struct HighPass {
    alpha: f32,
    prev_in: f32,
    prev_out: f32,
}

impl HighPass {
    pub fn new(alpha: f32) -> HighPass {
        HighPass {
            alpha,
            prev_in: 0.0,
            prev_out: 0.0,
        }
    }

    /// Filter one block in place, clamping to [`SOFT_CLAMP`].
    pub fn apply(&mut self, block: &mut [i16]) {
        for sample in block {
            let x = *sample as f32;
            let y = self.alpha * (self.prev_out + x - self.prev_in);
            self.prev_in = x;
            self.prev_out = y;
            *sample = y.clamp(-(SOFT_CLAMP as f32), SOFT_CLAMP as f32) as i16;
        }
    }
}

/// Full analog conditioning chain with the filter state it carries
/// between blocks.
#[derive(Debug)]
pub struct SignalChain {
    hpf: HighPass,
}

impl Default for SignalChain {
    fn default() -> SignalChain {
        SignalChain::new()
    }
}

impl SignalChain {
    pub fn new() -> SignalChain {
        SignalChain {
            hpf: HighPass::new(HPF_ALPHA),
        }
    }

    /// Condition one raw unsigned block into signed PCM.
    pub fn condition(&mut self, raw: &[u16]) -> Vec<i16> {
        let mut block: Vec<i16> = raw.iter().map(|&x| centre(x)).collect();
        subtract_mean(&mut block);
        self.hpf.apply(&mut block);
        block
    }
}

/// Unsigned full-scale sample to centred signed 16-bit.
fn centre(x: u16) -> i16 {
    (x as i32 - 0x8000) as i16
}

/// Remove the residual DC offset of one block.
fn subtract_mean(block: &mut [i16]) {
    if block.is_empty() {
        return;
    }
    let mean = (block.iter().map(|&s| s as i64).sum::<i64>() / block.len() as i64) as i32;
    for sample in block {
        *sample = (*sample as i32 - mean).clamp(i16::MIN as i32, i16::MAX as i32) as i16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_maps_full_scale() {
        assert_eq!(centre(0x8000), 0);
        assert_eq!(centre(0), i16::MIN);
        assert_eq!(centre(0xFFFF), i16::MAX);
    }

    #[test]
    fn mean_subtraction_zeroes_a_constant_block() {
        let mut block = vec![500i16; 64];
        subtract_mean(&mut block);
        assert!(block.iter().all(|&s| s == 0));
    }

    #[test]
    fn high_pass_suppresses_dc() {
        let mut hpf = HighPass::new(HPF_ALPHA);
        let mut out = 0i16;
        // Feed a long DC run; the output must decay toward zero.
        for _ in 0..50 {
            let mut block = vec![10_000i16; 64];
            hpf.apply(&mut block);
            out = *block.last().unwrap();
        }
        assert!(out.abs() < 100, "dc leaked through: {out}");
    }

    #[test]
    fn high_pass_clamps_inside_i16() {
        let mut hpf = HighPass::new(HPF_ALPHA);
        // Alternate rail-to-rail to provoke overshoot.
        let mut block: Vec<i16> = (0..64)
            .map(|i| if i % 2 == 0 { i16::MAX } else { i16::MIN })
            .collect();
        hpf.apply(&mut block);
        assert!(block.iter().all(|&s| s.abs() <= SOFT_CLAMP));
    }

    #[test]
    fn chain_removes_bias_from_constant_input() {
        let mut chain = SignalChain::new();
        let out = chain.condition(&[0x9000; 32]);
        assert!(out.iter().all(|&s| s == 0));
    }

    #[test]
    fn chain_preserves_block_length() {
        let mut chain = SignalChain::new();
        assert_eq!(chain.condition(&[0x8123; 512]).len(), 512);
        assert!(chain.condition(&[]).is_empty());
    }
}
