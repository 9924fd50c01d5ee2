//! HTTP API handlers for lateshow-api

pub mod appearances;
pub mod episodes;
pub mod guests;
pub mod health;
pub mod home;

pub use appearances::create_appearance;
pub use episodes::{delete_episode, get_episode, list_episodes};
pub use guests::{get_guest, list_guests};
pub use health::health_check;
pub use home::home;
