pub mod account;
pub mod conversation;
pub mod flights;
pub mod health;
pub mod llm;
