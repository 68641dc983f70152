//! Type-safe wrappers and enums for league data.

pub mod ids;
pub mod position;
pub mod roster;
pub mod time;

pub use ids::{EspnId, LineupId, NflTeamId, PlayerId, TeamId};
pub use position::{format_slot_label, PositionType, RosterPosition, SlotLabel};
pub use roster::{parse_keeper_flag, AcquisitionType};
pub use time::{Season, Week};
