pub(crate) mod multipart;
pub(crate) mod png;
