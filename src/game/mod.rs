//! Game module - World state, the store that mutates it, and time

pub mod error;
pub mod ids;
pub mod state;
pub mod store;
pub mod time;

pub use error::ActionError;
pub use state::{
    BenchSource, CraftSummary, CraftingBench, Currency, Hero, HeroId, MapRun, MapStatus, WorldState,
};
pub use store::{Listener, MapRewards, Store, StoreBuilder, Subscription};
pub use time::{Clock, ManualClock, SystemClock, TickTimer, Timestamp};
