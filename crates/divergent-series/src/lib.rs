//! Validated multichannel time series, broadcast checks, and standardization.
//!
//! Leaf crate of the workspace. Every comparison starts from a [`Series`]:
//! a non-empty, all-finite `(time, channels)` table. Two series are only
//! compared after [`are_broadcastable`] accepts their shapes.

mod error;
mod preprocess;
mod series;
mod shape;

pub use error::{ErrorKind, SeriesError};
pub use preprocess::{ChannelMoments, channel_moments, standardize};
pub use series::{Series, broadcast_pair};
pub use shape::{are_broadcastable, broadcast_shape, check_broadcastable};
