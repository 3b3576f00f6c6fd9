pub mod runloop;

pub use runloop::run_chat_loop;
