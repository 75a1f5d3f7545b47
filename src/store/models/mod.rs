pub mod account;
pub mod event;
pub mod reward;
pub mod status;

pub use account::Account;
pub use event::Event;
pub use reward::{Reward, RewardPatch, RewardType};
pub use status::{ClaimAttempt, ClaimOutcome, StatusKey, UserRewardStatus};
