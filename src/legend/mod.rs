pub(crate) mod entry;
pub(crate) mod flow;
pub(crate) mod strings;
pub(crate) mod text;
