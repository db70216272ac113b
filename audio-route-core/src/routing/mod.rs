pub mod handle;
pub mod router;
