//! Boundary to the handball4all federation API.
//!
//! - `url`: browser URL → API endpoint
//! - `http`: the fetch collaborator and its reqwest implementation
//! - `json`: null-sentinel handling for numeric fields
//! - `types`: strict wire schema and mapping into `models`

pub mod http;
pub mod json;
pub mod types;
pub mod url;

pub use http::{JsonFetcher, ReqwestFetcher};
pub use json::{int_or_null, DEFAULT_NULL_SENTINELS};
pub use types::{parse_league_data, parse_league_data_with};
pub use url::{api_url_for_cup, api_url_for_league, Endpoints, FEDERATION_API_URL};
