pub mod error;
pub mod monitor;
pub mod user;

pub use error::PersistenceError;
pub use monitor::{MonitorRepository, MonitorRepositoryTrait};
pub use user::{UserRepository, UserRepositoryTrait};

#[cfg(test)]
pub use monitor::MockMonitorRepositoryTrait;
#[cfg(test)]
pub use user::MockUserRepositoryTrait;
