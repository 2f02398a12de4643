pub mod appointments;
pub mod biddings;
pub mod clients;
pub mod documents;
pub mod filter;
pub mod lookup;
pub mod processes;
pub mod tasks;
pub mod users;
