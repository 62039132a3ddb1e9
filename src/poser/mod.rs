pub(crate) mod backend;
pub(crate) mod output;
pub(crate) mod passthrough;
pub(crate) mod tensor;
