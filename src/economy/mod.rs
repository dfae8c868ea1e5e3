//! Player economy: the document store, the per-user record, rewards and
//! progression.

pub mod ledger;
pub mod progression;
pub mod reward;
pub mod store;
pub mod watch;

pub use ledger::{LedgerEntry, UserEconomy};
pub use reward::{award_once, has_played_today, AwardOutcome, AwardRequest};
pub use store::{DocumentStore, JsonFileStore, MemoryStore};
pub use watch::EconomyView;
