pub(crate) mod composer;
