//! Module re-exporting used types and polyfill to help with feature support.

#[cfg(feature = "no_std")]
mod nostd_imports {
    pub use ::alloc::vec;
    pub use ::alloc::vec::Vec;
}
#[cfg(feature = "no_std")]
pub use nostd_imports::*;

#[cfg(feature = "error_in_core")]
pub use core::error::Error;
#[cfg(all(not(feature = "error_in_core"), not(feature = "no_std")))]
pub use std::error::Error;
