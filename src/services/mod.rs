pub mod ai;
pub mod amadeus;
pub mod conversation;
pub mod extractor;
pub mod generator;
pub mod supabase;
pub mod tracker;
