//! Parallel/sequential execution helpers
//!
//! The `cfg` switch on the `parallel` feature lives here so call sites stay
//! free of it. Results are always returned in index order, so a parallel run
//! produces exactly what the sequential run does.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Map `f` over `0..n`, in parallel unless `force_sequential` is set
pub fn map_indexed<F, R>(n: usize, f: F, force_sequential: bool) -> Vec<R>
where
    F: Fn(usize) -> R + Sync + Send,
    R: Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            (0..n).map(f).collect()
        } else {
            (0..n).into_par_iter().map(f).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        (0..n).map(f).collect()
    }
}

/// True when the crate was built with rayon support
pub const fn is_available() -> bool {
    cfg!(feature = "parallel")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_preserved() {
        let parallel = map_indexed(100, |i| i * 2, false);
        let sequential = map_indexed(100, |i| i * 2, true);
        assert_eq!(parallel, sequential);
        assert_eq!(parallel[7], 14);
    }
}
