/// Session layer: hidden-set ownership, page-agent sync and orchestration.
///
/// ```text
///   UI ──SessionRequest──▶ worker ──▶ SessionController
///                                       │        │
///                        HiddenSetManager        AgentHandle (GET_MODULES)
///                        (store read/write)      SyncNotifier (SYNC_MODULES)
///                                       │
///                                       ▼
///                              data::filter::process ──▶ View
/// ```

pub mod controller;
pub mod hidden;
pub mod notifier;
pub mod worker;

pub use controller::{SessionController, SessionEvent, SessionUpdate, View};
pub use hidden::HiddenSetManager;
pub use notifier::SyncNotifier;
pub use worker::{session_loop, SessionRequest, SessionResult};
