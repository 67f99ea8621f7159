pub mod countdown;

pub use countdown::{CountdownTimer, TimerEvent, TimerKind};
