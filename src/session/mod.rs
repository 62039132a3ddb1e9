pub(crate) mod app;
pub(crate) mod render_loop;
pub(crate) mod scheduler;
pub(crate) mod shared;
pub(crate) mod state;
