//! ORCA client engine: HTTP access, the polling loop and user mutations.
mod api;
mod effects;
mod mutation;
mod scheduler;
mod types;
mod wire;

pub use api::{ApiSettings, OrcaApi, ReqwestApi};
pub use effects::EffectRunner;
pub use mutation::MutationCoordinator;
pub use scheduler::{PollOutcome, PollScheduler, SchedulerPhase};
pub use types::{lock_store, shared_store, ApiError, FailureKind, SharedStore};
pub use wire::decode_status;
