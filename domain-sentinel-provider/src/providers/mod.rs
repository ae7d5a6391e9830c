//! Lookup provider implementations.

mod whoapi;
mod whois;
mod whoisjson;

pub use whoapi::WhoApiProvider;
pub use whois::WhoisProvider;
pub use whoisjson::WhoisJsonProvider;
