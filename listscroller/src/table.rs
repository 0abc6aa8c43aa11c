#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

/// Measured heights keyed by item index.
#[cfg(feature = "std")]
pub(crate) type HeightTable = HashMap<usize, u32>;
#[cfg(not(feature = "std"))]
pub(crate) type HeightTable = BTreeMap<usize, u32>;
