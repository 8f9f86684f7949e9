//! The matching engine
//!
//! Tickets flow from a [`TicketProvider`] into a matching pass spawned by a
//! matcher variant. The pass buckets tickets by size and builds matches
//! with [`MatchBuilder`], or groups them with [`GroupShaper`] when the rules
//! ask for a fixed shape.

pub mod base;
pub mod builder;
pub mod cancel;
pub mod crew;
pub mod dispatch;
pub mod game;
pub mod logic;
pub mod provider;
pub mod queue;
pub mod shaper;

pub use base::BaseMatchmaker;
pub use builder::{build_all, MatchBuilder};
pub use cancel::{cancellation, CancelHandle, CancelSignal};
pub use crew::CrewMatchmaker;
pub use dispatch::Matchmaker;
pub use game::GameMatchmaker;
pub use logic::{spawn_matching, MatchLogic, MatchOptions, DEFAULT_OUTPUT_BUFFER};
pub use provider::{ChannelTicketProvider, StaticTicketProvider, TicketProvider, TicketStream};
pub use queue::TicketQueue;
pub use shaper::{GroupShaper, Grouping};
