use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Generates sub-pixel sample positions for anti-aliasing.
///
/// A pixel is split into a `size`-by-`size` grid of equal cells and one
/// sample is taken per cell. Offsets are relative to the pixel center and
/// fall inside `(-0.5, 0.5)` on both axes.
///
/// Without a seed every sample sits in the middle of its cell, so the same
/// offsets come back for every pixel. With a seed each sample is jittered to
/// a random spot inside its cell; the generator is seeded once, so a render
/// with a given seed is reproducible.
#[derive(Clone, Debug)]
pub struct Supersampler {
    size: usize,
    rng: Option<StdRng>,
}

impl Supersampler {
    /// Creates a sampler for a `size`-by-`size` grid.
    ///
    /// A `size` of zero is treated as one.
    pub fn new(size: usize, seed: Option<u64>) -> Supersampler {
        Supersampler {
            size: size.max(1),
            rng: seed.map(StdRng::seed_from_u64),
        }
    }

    /// The number of samples taken per pixel.
    pub fn samples_per_pixel(&self) -> usize {
        self.size * self.size
    }

    /// Fills `offsets` with one pixel's sample offsets, row by row.
    ///
    /// Whatever the buffer held before is discarded, so the same buffer can
    /// serve every pixel of a render.
    pub fn offsets(&mut self, offsets: &mut Vec<(f64, f64)>) {
        let n = self.size as f64;
        offsets.clear();

        for row in 0..self.size {
            for col in 0..self.size {
                let (jx, jy) = match self.rng.as_mut() {
                    Some(rng) => (rng.gen::<f64>(), rng.gen::<f64>()),
                    None => (0.5, 0.5),
                };

                let dx = (col as f64 + jx) / n - 0.5;
                let dy = (row as f64 + jy) / n - 0.5;
                offsets.push((dx, dy));
            }
        }
    }
}

#[test]
fn single_sample_is_pixel_center() {
    let mut s = Supersampler::new(1, None);
    let mut offsets = Vec::new();
    s.offsets(&mut offsets);

    assert_eq!(offsets, vec![(0.0, 0.0)]);
}

#[test]
fn zero_size_is_one_sample() {
    let mut s = Supersampler::new(0, Some(7));
    let mut offsets = Vec::new();
    s.offsets(&mut offsets);

    assert_eq!(s.samples_per_pixel(), 1);
    assert_eq!(offsets.len(), 1);
}

#[test]
fn two_by_two_cell_centers() {
    let mut s = Supersampler::new(2, None);
    let mut offsets = Vec::new();
    s.offsets(&mut offsets);

    assert_eq!(offsets, vec![
        (-0.25, -0.25), (0.25, -0.25),
        (-0.25,  0.25), (0.25,  0.25),
    ]);
}

#[test]
fn jitter_stays_in_its_cell() {
    let mut s = Supersampler::new(3, Some(42));
    let mut offsets = Vec::new();

    for _ in 0..50 {
        s.offsets(&mut offsets);
        assert_eq!(offsets.len(), 9);

        for (i, &(dx, dy)) in offsets.iter().enumerate() {
            let (row, col) = (i / 3, i % 3);
            let lo_x = col as f64 / 3.0 - 0.5;
            let lo_y = row as f64 / 3.0 - 0.5;

            assert!(dx >= lo_x && dx <= lo_x + 1.0 / 3.0 + 1e-12);
            assert!(dy >= lo_y && dy <= lo_y + 1.0 / 3.0 + 1e-12);
        }
    }
}

#[test]
fn seeded_jitter_is_reproducible() {
    let mut a = Supersampler::new(2, Some(1234));
    let mut b = Supersampler::new(2, Some(1234));

    let (mut oa, mut ob) = (Vec::new(), Vec::new());

    for _ in 0..10 {
        a.offsets(&mut oa);
        b.offsets(&mut ob);
        assert_eq!(oa, ob);
    }
}

#[test]
fn buffer_is_refilled_in_place() {
    let mut s = Supersampler::new(2, Some(5));
    let mut offsets = vec![(9.0, 9.0); 7];

    s.offsets(&mut offsets);
    assert_eq!(offsets.len(), 4);
    assert!(offsets.iter().all(|&(dx, dy)| dx.abs() < 0.5 && dy.abs() < 0.5));

    let before = offsets.as_ptr();
    s.offsets(&mut offsets);
    assert_eq!(offsets.len(), 4);
    assert_eq!(offsets.as_ptr(), before);
}
