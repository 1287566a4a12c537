use half::f16;
use num_traits::Zero;

use super::CpuBackend;
use crate::element::{Element, IntElement};
use crate::layout::VectorLayout;

impl CpuBackend {
    pub(super) fn strided_sum<T: Element>(&self, x: &[T], layout: VectorLayout) -> T::Acc {
        #[cfg(feature = "parallel")]
        if let Some(pool) = self.pool_for(layout.n) {
            use rayon::prelude::*;
            return pool.install(|| {
                (0..layout.n)
                    .into_par_iter()
                    .map(|i| x[layout.index(i)].widen())
                    .sum::<T::Acc>()
            });
        }
        lane_sum(x, layout)
    }

    pub(super) fn strided_int_sum<T: IntElement>(&self, x: &[T], layout: VectorLayout) -> i64 {
        #[cfg(feature = "parallel")]
        if let Some(pool) = self.pool_for(layout.n) {
            use rayon::prelude::*;
            return pool.install(|| {
                (0..layout.n)
                    .into_par_iter()
                    .map(|i| x[layout.index(i)].to_i64())
                    .reduce(|| 0, i64::wrapping_add)
            });
        }
        (0..layout.n).fold(0i64, |acc, i| acc.wrapping_add(x[layout.index(i)].to_i64()))
    }

    /// Reduce every lane `a[i][..][l]` of a contiguous [m, n, k] array into
    /// `b[i][l]`.
    ///
    /// `f` receives the buffer starting at the lane's first element and the
    /// lane as an `n`-element vector with stride `k`.
    pub(super) fn middle_axis<T, O, F>(
        &self,
        m: usize,
        n: usize,
        k: usize,
        a: &[T],
        b: &mut [O],
        f: F,
    ) where
        T: Sync,
        O: Send,
        F: Fn(&[T], VectorLayout) -> O + Sync + Send,
    {
        if m == 0 || k == 0 {
            return;
        }
        let lane = VectorLayout::new(n, k as isize);
        let reduce_row = |i: usize, row: &mut [O]| {
            let base = i * n * k;
            for (l, out) in row.iter_mut().enumerate() {
                *out = f(a.get(base + l..).unwrap_or(&[]), lane);
            }
        };

        #[cfg(feature = "parallel")]
        if let Some(pool) = self.pool_for(m.saturating_mul(n).saturating_mul(k)) {
            use rayon::prelude::*;
            pool.install(|| {
                b.par_chunks_mut(k)
                    .take(m)
                    .enumerate()
                    .for_each(|(i, row)| reduce_row(i, row))
            });
            return;
        }
        b.chunks_mut(k)
            .take(m)
            .enumerate()
            .for_each(|(i, row)| reduce_row(i, row));
    }
}

pub(super) fn lane_sum<T: Element>(x: &[T], layout: VectorLayout) -> T::Acc {
    let mut acc = <T::Acc as Zero>::zero();
    for i in 0..layout.n {
        acc += x[layout.index(i)].widen();
    }
    acc
}

pub(super) fn half_sum(x: &[f16], layout: VectorLayout) -> f64 {
    (0..layout.n).map(|i| x[layout.index(i)].to_f64()).sum()
}

pub(super) fn count_nonzero(x: &[u8], layout: VectorLayout) -> i64 {
    (0..layout.n).filter(|&i| x[layout.index(i)] != 0).count() as i64
}

/// Index of the first element that beats every earlier one under `better`.
///
/// An element for which `is_nan` holds is returned immediately. The caller
/// guarantees `layout.n >= 1`.
pub(super) fn arg_best<T, B, N>(x: &[T], layout: VectorLayout, better: B, is_nan: N) -> usize
where
    T: Copy,
    B: Fn(T, T) -> bool,
    N: Fn(T) -> bool,
{
    let mut best_idx = 0;
    let mut best = x[layout.index(0)];
    if is_nan(best) {
        return 0;
    }
    for i in 1..layout.n {
        let v = x[layout.index(i)];
        if is_nan(v) {
            return i;
        }
        if better(v, best) {
            best = v;
            best_idx = i;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_best_first_occurrence() {
        let layout = VectorLayout::new(4, 1);
        let x = [2, 5, 5, 1];
        assert_eq!(arg_best(&x, layout, |v, b| v > b, |_| false), 1);
        assert_eq!(arg_best(&x, layout, |v, b| v < b, |_| false), 3);
    }

    #[test]
    fn test_arg_best_reverse_stride() {
        // Logical order under inc=-1 is [1, 5, 5, 2].
        let layout = VectorLayout::new(4, -1);
        let x = [2, 5, 5, 1];
        assert_eq!(arg_best(&x, layout, |v, b| v > b, |_| false), 1);
        assert_eq!(arg_best(&x, layout, |v, b| v < b, |_| false), 0);
    }

    #[test]
    fn test_count_nonzero_strided() {
        let layout = VectorLayout::new(3, 2);
        assert_eq!(count_nonzero(&[1, 0, 0, 1, 1], layout), 2);
    }

    #[test]
    fn test_middle_axis_lanes() {
        let b = CpuBackend::sequential();
        // shape [2, 3, 2]; each lane collects a[i][..][l] as a list of values.
        let a: Vec<u32> = (0..12).collect();
        let mut out = vec![Vec::new(); 4];
        b.middle_axis(2, 3, 2, &a, &mut out, |x, lane| {
            (0..lane.n).map(|j| x[lane.index(j)]).collect::<Vec<_>>()
        });
        assert_eq!(
            out,
            vec![vec![0, 2, 4], vec![1, 3, 5], vec![6, 8, 10], vec![7, 9, 11]]
        );
    }

    #[test]
    fn test_middle_axis_empty_lanes() {
        let b = CpuBackend::sequential();
        let mut out = vec![9.0f64; 3];
        b.middle_axis(1, 0, 3, &[], &mut out, |x: &[f64], lane| lane_sum(x, lane));
        assert_eq!(out, vec![0.0; 3]);
    }
}
