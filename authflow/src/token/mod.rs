//! Signed session tokens.
//!
//! Tokens are JSON Web Tokens signed with HS256. The payload carries the
//! session fields plus `timestamp` (issue instant) and `expires` (absolute
//! expiry, `0` for never), both in milliseconds since the Unix epoch.

mod claims;
mod clock;
mod service;

pub use claims::{Claims, Session, NEVER_EXPIRES};
pub use clock::{Clock, ManualClock, SystemClock};
pub use service::{issue, verify, TokenService};
