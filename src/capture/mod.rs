pub(crate) mod desaturate;
pub(crate) mod host;
pub(crate) mod raster;
pub(crate) mod service;
pub(crate) mod tiles;
