//! Walking the `source()` chain of an error.

use std::error::Error;
use std::fmt;

use crate::dont_log::DontLog;

/// Maximum number of links visited when walking an error chain.
pub const MAX_CHAIN_DEPTH: usize = 32;

/// Iterator over an error and its sources, outermost first.
///
/// Stops after [`MAX_CHAIN_DEPTH`] links.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn Error + 'static)>,
    depth: usize,
}

impl<'a> Chain<'a> {
    /// Starts a chain at `err`.
    pub fn new(err: &'a (dyn Error + 'static)) -> Self {
        Self {
            next: Some(err),
            depth: 0,
        }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        if self.depth >= MAX_CHAIN_DEPTH {
            return None;
        }
        let current = self.next?;
        self.depth += 1;
        self.next = current.source();
        Some(current)
    }
}

/// Returns the first link of type `T` in the chain of `err`.
pub fn find<'a, T>(err: &'a (dyn Error + 'static)) -> Option<&'a T>
where
    T: Error + 'static,
{
    Chain::new(err).find_map(|link| link.downcast_ref::<T>())
}

/// Displays every link of the chain joined with `": "`.
pub(crate) struct DisplayChain<'a>(pub(crate) &'a (dyn Error + 'static));

impl fmt::Display for DisplayChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for link in Chain::new(self.0).filter(|link| !link.is::<DontLog>()) {
            if !first {
                f.write_str(": ")?;
            }
            first = false;
            write!(f, "{link}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Layer {
        depth: usize,
        inner: Option<Box<Layer>>,
    }

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "layer {}", self.depth)
        }
    }

    impl Error for Layer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            self.inner.as_deref().map(|inner| inner as &(dyn Error + 'static))
        }
    }

    #[derive(Debug)]
    struct Wrapper(Layer);

    impl fmt::Display for Wrapper {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("wrapped")
        }
    }

    impl Error for Wrapper {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    fn nested(depth: usize) -> Layer {
        (1..depth).fold(Layer { depth: 0, inner: None }, |inner, d| Layer {
            depth: d,
            inner: Some(Box::new(inner)),
        })
    }

    #[test]
    fn test_chain_visits_outermost_first() {
        let err = nested(3);
        let depths: Vec<_> = Chain::new(&err)
            .map(|link| link.downcast_ref::<Layer>().unwrap().depth)
            .collect();
        assert_eq!(depths, vec![2, 1, 0]);
    }

    #[test]
    fn test_chain_is_bounded() {
        let err = nested(MAX_CHAIN_DEPTH * 2);
        assert_eq!(Chain::new(&err).count(), MAX_CHAIN_DEPTH);
    }

    #[test]
    fn test_find_inner_type() {
        let err = Wrapper(nested(2));
        let found = find::<Layer>(&err).expect("layer should be found");
        assert_eq!(found.depth, 1);
    }

    #[test]
    fn test_display_chain_joins_links() {
        let err = nested(3);
        assert_eq!(DisplayChain(&err).to_string(), "layer 2: layer 1: layer 0");
    }
}
