/// Announcement board reads and gamemaster publishing.
pub mod announcement_service;
/// Game listing, editing, and optimistic seat registration.
pub mod game_service;
/// Admin invite workflow and invite redemption.
pub mod invite_service;
/// Member administration.
pub mod member_service;
/// Inbox reads and direct messages.
pub mod message_service;
/// Schedule editing backed by the recurrence calculator.
pub mod schedule_service;
/// Session refresh from the API.
pub mod session_service;
