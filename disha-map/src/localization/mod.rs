//! UWB-style range localization.
//!
//! A [`UwbTag`] reports noisy ranges to the three anchors of an
//! [`AnchorSet`]; [`trilaterate`] turns one set of ranges into a fix, and
//! [`EmaTracker`] smooths fixes over time.
//!
//! ```rust,ignore
//! let anchors = AnchorSet::default_triangle();
//! let tag = UwbTag::new(TagId(1), 0.1);
//! let fix = trilaterate(&tag.bearing(true_position, &anchors, &mut rng))?;
//! let smoothed = tracker.observe(robot_id, fix);
//! ```

mod anchor;
mod error;
mod smoothing;
mod tag;
mod trilateration;

pub use anchor::{Anchor, AnchorSet};
pub use error::LocalizationError;
pub use smoothing::{EmaTracker, smooth};
pub use tag::{TagBearing, UwbTag};
pub use trilateration::{DEGENERATE_DETERMINANT, averaged_estimate, trilaterate};
