pub static VERSION: &str = env!("CARGO_PKG_VERSION");
pub static NAME: &str = env!("CARGO_PKG_NAME");

pub static JSON_UTF8: &str = "application/json; charset=UTF-8";
