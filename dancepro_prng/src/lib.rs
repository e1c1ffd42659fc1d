// Seeded pseudo-random generator for the dancepro note engine.
//
// xoshiro256++ (Blackman & Vigna, 2019), state expanded from a single `u64`
// seed with SplitMix64. The note engine draws every "uniformly random
// pitch" from this generator: random chord tones in the B/C/Outro sections,
// the tilt-driven register substitutions, and the anti-repetition
// replacement. A session replays bit-for-bit from its seed.
//
// Bounded draws use Lemire's widening multiply: the high half of
// `next_u64() * len` is the index, and the low half decides the rare
// rejections that keep the result unbiased. Almost every call costs one
// multiply and no division.
//
// `dancepro_music` wraps this type behind its `RandomSource` trait so tests
// can swap in a scripted source; see `dancepro_music/src/random.rs`.
//
// **Critical constraint: determinism.** Given the same seed, every method
// must produce identical output on every platform. Keep floating point out
// of the core generator.

use serde::{Deserialize, Serialize};

/// Xoshiro256++ PRNG, one instance per engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeqRng {
    s: [u64; 4],
}

impl SeqRng {
    pub fn new(seed: u64) -> Self {
        let mut mix = seed;
        Self {
            s: std::array::from_fn(|_| splitmix64(&mut mix)),
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let [s0, s1, s2, s3] = &mut self.s;
        let out = s0.wrapping_add(*s3).rotate_left(23).wrapping_add(*s0);

        let shifted = *s1 << 17;
        *s2 ^= *s0;
        *s3 ^= *s1;
        *s1 ^= *s2;
        *s0 ^= *s3;
        *s2 ^= shifted;
        *s3 = s3.rotate_left(45);

        out
    }

    /// Uniform `f64` in [0, 1) built from the top 53 bits of one draw.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform index into a collection of `len` elements. A `len` of 0 or 1
    /// yields 0 without consuming a draw.
    pub fn index(&mut self, len: usize) -> usize {
        let bound = len as u64;
        if bound <= 1 {
            return 0;
        }
        let mut wide = self.widen(bound);
        if (wide as u64) < bound {
            // 2^64 mod bound: low halves below this land in an overfull bucket
            let floor = bound.wrapping_neg() % bound;
            while (wide as u64) < floor {
                wide = self.widen(bound);
            }
        }
        (wide >> 64) as usize
    }

    fn widen(&mut self, bound: u64) -> u128 {
        u128::from(self.next_u64()) * u128::from(bound)
    }
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_zero_matches_reference_stream() {
        let mut rng = SeqRng::new(0);
        assert_eq!(rng.next_u64(), 0x5317_5d61_490b_23df);
        assert_eq!(rng.next_u64(), 0x61da_6f3d_c380_d507);
        assert_eq!(rng.next_u64(), 0x5c0f_df91_ec9a_7bfc);
    }

    #[test]
    fn same_seed_same_output() {
        let mut a = SeqRng::new(42);
        let mut b = SeqRng::new(42);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_different_output() {
        let mut a = SeqRng::new(42);
        let mut b = SeqRng::new(43);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn f64_in_unit_range() {
        let mut rng = SeqRng::new(12345);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "f64 out of range: {v}");
        }
    }

    #[test]
    fn index_sequence_is_pinned() {
        let mut rng = SeqRng::new(42);
        let picks: Vec<usize> = (0..12).map(|_| rng.index(7)).collect();
        assert_eq!(picks, vec![5, 2, 6, 4, 5, 4, 0, 4, 1, 6, 3, 5]);
    }

    #[test]
    fn index_spreads_evenly_over_a_seven_note_scale() {
        let mut rng = SeqRng::new(7);
        let mut counts = [0u32; 7];
        for _ in 0..7_000 {
            counts[rng.index(7)] += 1;
        }
        for (degree, &n) in counts.iter().enumerate() {
            assert!((900..1100).contains(&n), "degree {degree} drawn {n} times");
        }
    }

    #[test]
    fn trivial_lengths_do_not_draw() {
        let mut rng = SeqRng::new(5);
        let mut untouched = rng.clone();
        assert_eq!(rng.index(1), 0);
        assert_eq!(rng.index(0), 0);
        assert_eq!(rng.next_u64(), untouched.next_u64());
    }

    #[test]
    fn index_of_power_of_two_len() {
        let mut rng = SeqRng::new(99);
        for _ in 0..1_000 {
            assert!(rng.index(4) < 4);
        }
    }

    #[test]
    fn serialization_roundtrip_resumes_stream() {
        let mut rng = SeqRng::new(42);
        for _ in 0..100 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: SeqRng = serde_json::from_str(&json).unwrap();
        for _ in 0..100 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }
}
