pub mod generate;
pub mod health;
pub mod recording;
