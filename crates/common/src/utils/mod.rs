mod encoding;
mod headers;
mod time;

pub use encoding::{decode_body, decode_header_token, encode_basic_credentials};
pub use headers::{join_header_values, map_to_headers};
pub use time::iso_timestamp;
