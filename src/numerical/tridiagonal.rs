use rayon::prelude::*;

/// Tridiagonal linear system `A x = d` with sub-diagonal `a`, main diagonal
/// `b`, super-diagonal `c` and right-hand side `d`, all of length `n`
/// (`a[0]` and `c[n-1]` are unused).
#[derive(Debug, Clone)]
pub struct TridiagonalSystem {
    pub a: Vec<f64>,
    pub b: Vec<f64>,
    pub c: Vec<f64>,
    pub d: Vec<f64>,
}

impl TridiagonalSystem {
    pub fn new(n: usize) -> Self {
        Self {
            a: vec![0.0; n],
            b: vec![0.0; n],
            c: vec![0.0; n],
            d: vec![0.0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    /// Assembles rows `1..n-1` from a per-cell closure, fanned out across a
    /// rayon worker pool. The closure only reads frozen snapshots of the
    /// field arrays and each cell writes a disjoint row, so no
    /// synchronization is needed; the join happens before `solve` runs.
    /// Boundary rows (0 and n-1) are left untouched and must be written by
    /// the caller afterwards.
    pub fn fill_interior<F>(&mut self, row: F)
    where
        F: Fn(usize) -> [f64; 4] + Sync + Send,
    {
        let n = self.len();
        if n < 3 {
            return;
        }
        let rows: Vec<[f64; 4]> = (1..n - 1).into_par_iter().map(row).collect();
        for (k, [sub, diag, sup, rhs]) in rows.into_iter().enumerate() {
            let i = k + 1;
            self.a[i] = sub;
            self.b[i] = diag;
            self.c[i] = sup;
            self.d[i] = rhs;
        }
    }

    /// Thomas algorithm: one forward elimination sweep followed by one
    /// backward substitution sweep, O(n), no pivoting. The sweeps carry a
    /// strict data dependency from cell to cell and are deliberately
    /// sequential.
    ///
    /// The caller must guarantee diagonal dominance: a near-zero pivot
    /// `b[i] - a[i]*c*[i-1]` is not detected and propagates NaN/Inf into the
    /// solution.
    pub fn solve(&self) -> Vec<f64> {
        let n = self.len();
        let mut c_star = vec![0.0; n];
        let mut d_star = vec![0.0; n];
        let mut x = vec![0.0; n];
        if n == 0 {
            return x;
        }

        c_star[0] = self.c[0] / self.b[0];
        d_star[0] = self.d[0] / self.b[0];

        for i in 1..n {
            let m = self.b[i] - self.a[i] * c_star[i - 1];
            c_star[i] = self.c[i] / m;
            d_star[i] = (self.d[i] - self.a[i] * d_star[i - 1]) / m;
        }

        x[n - 1] = d_star[n - 1];
        for i in (0..n - 1).rev() {
            x[i] = d_star[i] - c_star[i] * x[i + 1];
        }

        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Small deterministic LCG so the dominance tests are reproducible.
    struct Lcg(u64);

    impl Lcg {
        fn next_f64(&mut self) -> f64 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (self.0 >> 11) as f64 / (1u64 << 53) as f64
        }
    }

    fn random_dominant_system(n: usize, seed: u64) -> TridiagonalSystem {
        let mut rng = Lcg(seed);
        let mut sys = TridiagonalSystem::new(n);
        for i in 0..n {
            if i > 0 {
                sys.a[i] = 2.0 * rng.next_f64() - 1.0;
            }
            if i < n - 1 {
                sys.c[i] = 2.0 * rng.next_f64() - 1.0;
            }
            // Strict diagonal dominance with a margin.
            sys.b[i] = sys.a[i].abs() + sys.c[i].abs() + 1.0 + rng.next_f64();
            sys.d[i] = 10.0 * (2.0 * rng.next_f64() - 1.0);
        }
        sys
    }

    fn reconstruct_rhs(sys: &TridiagonalSystem, x: &[f64]) -> Vec<f64> {
        let n = sys.len();
        (0..n)
            .map(|i| {
                let mut r = sys.b[i] * x[i];
                if i > 0 {
                    r += sys.a[i] * x[i - 1];
                }
                if i < n - 1 {
                    r += sys.c[i] * x[i + 1];
                }
                r
            })
            .collect()
    }

    #[test]
    fn test_identity_system() {
        let mut sys = TridiagonalSystem::new(4);
        sys.b = vec![1.0; 4];
        sys.d = vec![3.0, -1.0, 0.5, 2.0];
        let x = sys.solve();
        for i in 0..4 {
            assert_relative_eq!(x[i], sys.d[i], epsilon = 1e-14);
        }
    }

    #[test]
    fn test_laplacian_system() {
        // [2 -1; -1 2 -1; ...] with known RHS, verified by reconstruction.
        let n = 6;
        let mut sys = TridiagonalSystem::new(n);
        for i in 0..n {
            sys.a[i] = if i > 0 { -1.0 } else { 0.0 };
            sys.c[i] = if i < n - 1 { -1.0 } else { 0.0 };
            sys.b[i] = 2.0;
            sys.d[i] = i as f64;
        }
        let x = sys.solve();
        let r = reconstruct_rhs(&sys, &x);
        for i in 0..n {
            assert_relative_eq!(r[i], sys.d[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_random_dominant_systems_residual() {
        for (n, seed) in [(1usize, 7u64), (2, 11), (5, 13), (50, 17), (313, 19), (1000, 23)] {
            let sys = random_dominant_system(n, seed);
            let x = sys.solve();
            let r = reconstruct_rhs(&sys, &x);
            let scale = sys.d.iter().map(|v| v.abs()).fold(1.0f64, f64::max);
            for i in 0..n {
                assert!(
                    (r[i] - sys.d[i]).abs() / scale < 1e-9,
                    "n={} row {}: residual {} too large",
                    n,
                    i,
                    (r[i] - sys.d[i]).abs() / scale
                );
            }
        }
    }

    #[test]
    fn test_fill_interior_leaves_boundary_rows() {
        let mut sys = TridiagonalSystem::new(5);
        sys.b[0] = 1.0;
        sys.d[0] = 42.0;
        sys.b[4] = 1.0;
        sys.d[4] = -42.0;
        sys.fill_interior(|i| [-1.0, 4.0, -1.0, i as f64]);
        assert_eq!(sys.b[0], 1.0);
        assert_eq!(sys.d[0], 42.0);
        assert_eq!(sys.d[4], -42.0);
        assert_eq!(sys.d[2], 2.0);
        assert_eq!(sys.a[3], -1.0);
        assert_eq!(sys.c[1], -1.0);
    }
}
