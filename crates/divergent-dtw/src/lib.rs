//! Dynamic time warping alignment of multichannel series.
//!
//! Pure math library, zero I/O. Computes the full accumulated cost matrix,
//! the normalized alignment cost and the optimal warping path, and can
//! re-index both series along that path.

mod cost;
mod dtw;
mod error;
mod path;

pub use cost::CostMatrix;
pub use dtw::{Alignment, Dtw, dtw};
pub use error::DtwError;
pub use path::{WarpingPath, WarpingStep};
