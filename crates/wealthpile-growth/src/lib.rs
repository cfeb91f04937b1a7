//! Wealthpile Growth Model
//!
//! Turns a wealth profile and a wall-clock offset into the numbers the scene
//! animates: current wealth, growth since the profile was bound, and how many
//! whole visual units that growth buys.
//!
//! Accrual is a straight line. `daily_increase` dollars are spread evenly over
//! every millisecond of a day; there is no compounding and no mid-session rate
//! change. A new unit only appears once a full `brick_value` has accrued.

mod comparison;
mod epoch;
mod error;
mod growth;
mod profile;

pub use comparison::Comparison;
pub use epoch::GrowthEpoch;
pub use error::{Error, Result};
pub use growth::{calculate_units, compute_growth, GrowthState};
pub use profile::{UnitKind, WealthProfile, AVERAGE_HOUSEHOLD_ID, BILLIONAIRE_ID};

/// Milliseconds in the 24 hour period `daily_increase` is quoted over.
pub const MS_PER_DAY: f64 = 86_400_000.0;
