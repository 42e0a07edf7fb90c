pub mod accounts;
pub mod events;
pub mod tickets;
pub mod validation;
