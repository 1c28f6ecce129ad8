//! Resource limits shared by the parser and the evaluator.

/// Default bound on packet nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Hard ceiling on [Limits::max_depth]. Larger requests are clamped to it.
pub const MAX_DEPTH_CEILING: usize = 512;

/// Limits applied while parsing and evaluating packet trees.
///
/// Both the parser and the evaluator recurse once per nesting level, so
/// `max_depth` is what keeps a hostile input from exhausting the stack. It
/// never exceeds [MAX_DEPTH_CEILING].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Limits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deepest allowed nesting. A lone literal has depth 1.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Sets the deepest allowed nesting, clamped to [MAX_DEPTH_CEILING].
    pub fn set_max_depth(&mut self, max_depth: usize) -> &mut Self {
        self.max_depth = max_depth.min(MAX_DEPTH_CEILING);
        self
    }
}

#[cfg(feature = "serde")]
impl From<crate::serde::LimitsDef> for Limits {
    fn from(value: crate::serde::LimitsDef) -> Self {
        let mut limits = Limits::default();
        if let Some(max_depth) = value.max_depth {
            limits.set_max_depth(max_depth);
        }
        limits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        assert_eq!(Limits::new().max_depth(), DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_set_max_depth() {
        let mut limits = Limits::new();
        limits.set_max_depth(4);
        assert_eq!(limits.max_depth(), 4);
    }

    #[test]
    fn test_max_depth_is_clamped() {
        let mut limits = Limits::new();
        assert_eq!(limits.set_max_depth(usize::MAX).max_depth(), MAX_DEPTH_CEILING);
        assert_eq!(
            limits.set_max_depth(MAX_DEPTH_CEILING + 1).max_depth(),
            MAX_DEPTH_CEILING
        );
        assert_eq!(limits.set_max_depth(MAX_DEPTH_CEILING).max_depth(), MAX_DEPTH_CEILING);
    }
}
