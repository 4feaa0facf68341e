mod membership_event;
mod membership_service;

pub use membership_event::*;
pub use membership_service::*;
