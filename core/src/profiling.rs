//! Optional Tracy instrumentation.
//!
//! Tessellation hot paths (segment snapshots, mesh assembly, shape
//! generation) are wrapped in spans. Enable the `profiling` feature to send
//! them to a running [Tracy](https://github.com/wolfpld/tracy) client:
//!
//! ```bash
//! cargo bench -p tessellator-core --features profiling
//! ```
//!
//! Without the feature every macro expands to nothing.

#[cfg(feature = "profiling")]
pub use tracy_client::{self, plot as tracy_plot, span};

/// Create a profiling span that ends with the enclosing scope.
///
/// ```ignore
/// {
///     profile_scope!("snapshot_segment");
///     // ...
/// }
/// ```
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_scope {
    ($name:expr) => {
        let _profile_span = $crate::profiling::span!($name);
    };
}

#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_scope {
    ($name:expr) => {};
}

/// Create a profiling span named after the enclosing function.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_function {
    () => {
        let _profile_span = $crate::profiling::span!();
    };
}

#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_function {
    () => {};
}

/// Plot a value over time, e.g. the vertex count of each finished segment.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_plot {
    ($name:expr, $value:expr) => {
        $crate::profiling::tracy_plot!($name, $value as f64)
    };
}

#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_plot {
    ($name:expr, $value:expr) => {
        let _ = $value;
    };
}
