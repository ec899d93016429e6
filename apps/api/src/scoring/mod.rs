pub mod ats;
pub mod handlers;
pub mod impact;
