use super::CpuBackend;
use crate::layout::VectorLayout;

impl CpuBackend {
    /// Apply `f` in place to each of the `n` strided elements of `window`,
    /// which starts at the vector's first buffer element.
    ///
    /// Element-wise updates do not depend on traversal order, so a negative
    /// stride visits the same window front to back.
    pub(super) fn for_each_strided<T, F>(&self, window: &mut [T], layout: VectorLayout, f: F)
    where
        T: Send,
        F: Fn(&mut T) + Sync + Send,
    {
        if layout.n == 0 {
            return;
        }
        let step = layout.inc.unsigned_abs();

        #[cfg(feature = "parallel")]
        if let Some(pool) = self.pool_for(layout.n) {
            use rayon::prelude::*;
            pool.install(|| window.par_iter_mut().step_by(step).take(layout.n).for_each(&f));
            return;
        }
        window.iter_mut().step_by(step).take(layout.n).for_each(f);
    }
}
