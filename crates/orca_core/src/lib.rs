//! ORCA client core: snapshot store, change detection, backoff policy and the
//! pure UI update function. Nothing here performs IO.
mod backoff;
mod change;
mod effect;
mod fingerprint;
mod model;
mod msg;
mod prompt;
mod snapshot;
mod state;
mod store;
mod update;
mod validate;
mod view_model;

pub use backoff::{Backoff, ConfigError, PollSettings};
pub use change::{ChangeSet, RecordDiff};
pub use effect::Effect;
pub use fingerprint::{data_fingerprint, derive_record_checksum};
pub use model::{
    normalize_filetype, CorpusStatus, JobStatus, MegadocRecord, SearchRecord, UnknownStatus,
};
pub use msg::Msg;
pub use prompt::PendingDelete;
pub use snapshot::{Field, StateSnapshot, StateUpdate};
pub use state::{Controls, Rejection};
pub use store::{Listener, StateStore};
pub use update::update;
pub use validate::{validate_search_str, validate_uid, ValidationError};
pub use view_model::{format_filesize, ClientView, MegadocView, SearchRowView};
