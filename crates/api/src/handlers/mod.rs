pub mod auth;
pub mod personas;
pub mod verify_id;
