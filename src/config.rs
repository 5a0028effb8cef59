/// Whether a [`crate::dict::Dict`] is allowed to grow automatically when its
/// load factor crosses 1.0.
///
/// The forced threshold (`force_resize_ratio`) always overrides this switch,
/// exactly as the original's `dict_force_resize_ratio` overrides
/// `dict_can_resize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    Enabled,
    Disabled,
}

impl Default for ResizeMode {
    fn default() -> Self {
        ResizeMode::Enabled
    }
}

/// Per-dictionary resize policy.
///
/// The original keeps `dict_can_resize` and `dict_force_resize_ratio` as
/// process-wide globals toggled by higher layers (e.g. to suppress resizing
/// during a fork-based snapshot). This crate promotes that to an explicit
/// value owned by each [`crate::dict::Dict`], per the translation spec.md §9
/// recommends for global state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizePolicy {
    mode: ResizeMode,
    /// Load ratio (`used / capacity`) above which a resize is forced even
    /// when `mode` is `Disabled`. Default 5.0, matching the original.
    pub force_resize_ratio: f64,
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self {
            mode: ResizeMode::default(),
            force_resize_ratio: 5.0,
        }
    }
}

impl ResizePolicy {
    #[inline(always)]
    pub fn enable_resize(&mut self) {
        self.mode = ResizeMode::Enabled;
    }

    #[inline(always)]
    pub fn disable_resize(&mut self) {
        self.mode = ResizeMode::Disabled;
    }

    #[inline(always)]
    pub fn is_resize_enabled(&self) -> bool {
        self.mode == ResizeMode::Enabled
    }
}

/// Quicklist-wide knobs that aren't per-node state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuicklistConfig {
    /// Elements whose encoded size alone exceeds this are stored as their
    /// own PLAIN node, bypassing listpack packing. Default 1 GiB.
    pub packed_threshold: usize,
}

impl Default for QuicklistConfig {
    fn default() -> Self {
        Self {
            packed_threshold: 1 << 30,
        }
    }
}
