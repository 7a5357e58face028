pub mod cache;
pub mod countdown;
pub mod refresher;
pub mod schedule;
pub mod timer;

pub use cache::{CachedEntry, WidgetCache};
pub use countdown::{CountdownState, countdown_at};
pub use refresher::{Refresher, Resolution};
pub use schedule::RefreshSchedule;
pub use timer::TimerSlot;
