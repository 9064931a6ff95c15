// Outreach: LinkedIn messages under a character budget, recruiter emails,
// and job ↔ recruiter matching.

pub mod budget;
pub mod email;
pub mod handlers;
pub mod matching;
pub mod message;
pub mod models;
pub mod prompts;
