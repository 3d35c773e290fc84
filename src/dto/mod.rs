pub mod announcement;
pub mod game;
pub mod invite;
pub mod member;
pub mod message;
pub mod table;
pub mod validation;
