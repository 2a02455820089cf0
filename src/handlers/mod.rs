pub mod auth;
pub mod candidates;
pub mod dashboard;
pub mod feedback;
pub mod health;
pub mod interviewers;
pub mod interviews;
pub mod organisations;
pub mod users;
