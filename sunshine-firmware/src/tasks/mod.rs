//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod display;
pub mod face;
pub mod link_rx;
pub mod link_tx;
pub mod power;
pub mod tick;
pub mod time_tick;

pub use display::display_task;
pub use face::face_task;
pub use link_rx::link_rx_task;
pub use link_tx::link_tx_task;
pub use power::power_task;
pub use tick::tick_task;
pub use time_tick::time_tick_task;
