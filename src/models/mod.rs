pub mod appointment;
pub mod bidding;
pub mod client;
pub mod document;
pub mod process;
pub mod task;
pub mod user;

pub use appointment::{Appointment, AppointmentInput};
pub use bidding::{BiddingInput, BiddingRecord, BiddingStatus};
pub use client::{Client, ClientInput, ClientType};
pub use document::{Document, NewDocument};
pub use process::{Process, ProcessInput, ProcessStatus};
pub use task::{Task, TaskInput, TaskStatus};
pub use user::{Role, User, UserChanges};
