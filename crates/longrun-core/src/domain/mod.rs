//! Domain model (ids, status state machine, records, errors).

pub mod errors;
pub mod ids;
pub mod state;
pub mod task;

pub use self::errors::{StoreError, TaskError};
pub use self::ids::TaskId;
pub use self::state::{ParseStatusError, TaskStatus};
pub use self::task::TaskRecord;
