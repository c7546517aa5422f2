pub mod dtos;
pub mod handlers;
pub mod trigger;

pub use handlers::{
    create_monitor, delete_monitor, get_monitor, list_monitors, list_runs, update_monitor,
};
pub use trigger::trigger_monitor;
