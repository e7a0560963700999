pub mod authorization;
pub mod credential;
