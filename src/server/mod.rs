// Server module entry point
// Listener setup, accept loop and per-connection serving

pub mod connection;
pub mod listener;

// `loop` is a keyword, so the module is exposed as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::{bind_listener, LISTEN_BACKLOG};
pub use server_loop::{start_server_loop, ServerLoopConfig};
