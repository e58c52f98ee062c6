pub mod app;

pub use app::{Seeded, make_test_app, seed, send, with_connect_info};
