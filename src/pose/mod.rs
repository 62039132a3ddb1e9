pub(crate) mod emotion;
pub(crate) mod state;
