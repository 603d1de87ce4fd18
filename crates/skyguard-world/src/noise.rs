use fastnoise_lite::{FastNoiseLite, NoiseType};

/// Sum of simplex octaves with explicit per-octave amplitude and frequency.
pub struct OctaveNoise {
    octaves: Vec<(f64, FastNoiseLite)>,
}

impl OctaveNoise {
    /// Octave `i` is seeded with `seed + i`. Extra entries in the longer of
    /// the two coefficient slices are ignored.
    pub fn new(amplitudes: &[f64], frequencies: &[f64], seed: i64) -> Self {
        let base = seed as i32;
        let octaves = amplitudes
            .iter()
            .zip(frequencies)
            .enumerate()
            .map(|(i, (&amp, &freq))| {
                let mut n = FastNoiseLite::with_seed(base.wrapping_add(i as i32));
                n.set_noise_type(Some(NoiseType::OpenSimplex2));
                n.set_frequency(Some(freq as f32));
                (amp, n)
            })
            .collect();
        Self { octaves }
    }

    #[inline]
    pub fn octave_count(&self) -> usize {
        self.octaves.len()
    }

    /// Upper bound of `|sample|`.
    pub fn amplitude(&self) -> f64 {
        self.octaves.iter().map(|(a, _)| a.abs()).sum()
    }

    pub fn sample(&self, x: i32, z: i32) -> f64 {
        let (fx, fz) = (x as f32, z as f32);
        self.octaves
            .iter()
            .map(|(amp, n)| amp * n.get_noise_2d(fx, fz) as f64)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_octaves_is_flat() {
        let n = OctaveNoise::new(&[], &[], 5);
        assert_eq!(n.octave_count(), 0);
        assert_eq!(n.sample(10, -4), 0.0);
    }

    #[test]
    fn stays_within_amplitude() {
        let n = OctaveNoise::new(&[4.0, 2.0], &[0.03, 0.1], 77);
        let bound = n.amplitude() * 1.01;
        for x in -40..40 {
            for z in (-40..40).step_by(7) {
                assert!(n.sample(x, z).abs() <= bound);
            }
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a = OctaveNoise::new(&[1.0, 0.5], &[0.05, 0.2], 123);
        let b = OctaveNoise::new(&[1.0, 0.5], &[0.05, 0.2], 123);
        for x in 0..16 {
            assert_eq!(a.sample(x, x * 3).to_bits(), b.sample(x, x * 3).to_bits());
        }
    }
}
