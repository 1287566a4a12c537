use super::CpuBackend;
use crate::element::Element;
use crate::layout::{MatrixLayout, VectorLayout};
use crate::transpose::Transpose;

impl CpuBackend {
    /// Apply `f(a[i][j], op(x)[..])` across the matrix.
    ///
    /// Operands are already validated and `a` is cut to the matrix span. In
    /// transpose modes row `i` pairs with `x[i]`, otherwise column `j` pairs
    /// with `x[j]`.
    pub(super) fn broadcast<T, F>(
        &self,
        trans: Transpose,
        x: &[T],
        xl: VectorLayout,
        a: &mut [T],
        al: MatrixLayout,
        f: F,
    ) where
        T: Element,
        F: Fn(&mut T, T) + Sync + Send,
    {
        if al.is_empty() {
            return;
        }
        let conj = trans.is_conj();
        let load = move |i: usize| {
            let v = x[xl.index(i)];
            if conj {
                v.conj()
            } else {
                v
            }
        };
        if trans.is_trans() {
            self.for_each_row(al, a, |i, row| {
                let v = load(i);
                row.iter_mut().for_each(|e| f(e, v));
            });
        } else {
            self.for_each_row(al, a, |_, row| {
                for (j, e) in row.iter_mut().enumerate() {
                    f(e, load(j));
                }
            });
        }
    }

    /// Call `f(i, row_i)` for every row, where `row_i` holds exactly `n`
    /// elements and excludes the leading-dimension padding.
    fn for_each_row<T, F>(&self, al: MatrixLayout, a: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync + Send,
    {
        let n = al.n;

        #[cfg(feature = "parallel")]
        if let Some(pool) = self.pool_for(al.elements()) {
            use rayon::prelude::*;
            pool.install(|| {
                a.par_chunks_mut(al.ld)
                    .take(al.m)
                    .enumerate()
                    .for_each(|(i, row)| f(i, &mut row[..n]))
            });
            return;
        }
        a.chunks_mut(al.ld)
            .take(al.m)
            .enumerate()
            .for_each(|(i, row)| f(i, &mut row[..n]));
    }
}
