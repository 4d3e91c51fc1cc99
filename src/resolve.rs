// Copyright 2026 Viktor Reusch
//
// This file is part of places_gpx_convert.
//
// places_gpx_convert is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// places_gpx_convert is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License
// for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with places_gpx_convert. If not, see <https://www.gnu.org/licenses/>.

//! Lookup of place details by feature identifier.
//!
//! The [`PlaceResolver`] trait is the seam between the converter and the
//! lookup service. [`PlacesClient`] implements it on top of the Places
//! _details_ endpoint, which accepts an undocumented `ftid` parameter in place
//! of a regular place ID.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::decode::Ftid;

/// Fields requested for every lookup.
// https://developers.google.com/maps/documentation/places/web-service/details#Place
pub const DETAIL_FIELDS: &[&str] = &[
    "name",
    "website",
    "place_id",
    "geometry/location",
    "formatted_address",
];

/// Default host of the lookup service.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";
/// Path of the details endpoint below the base URL.
const DETAILS_PATH: &str = "/maps/api/place/details/json";
/// Default for [`ClientConfig::timeout`].
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// `status` of a successful response.
const STATUS_OK: &str = "OK";

/// Error returned when place details cannot be obtained.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The request failed or returned an HTTP error status.
    #[error("request to the places service failed")]
    Http(#[from] reqwest::Error),
    /// The response body is not a valid details response.
    #[error("invalid response from the places service")]
    Decode(#[from] serde_json::Error),
    /// The service knows no place for this identifier.
    #[error("no place found ({status})")]
    NotFound { status: String },
    /// The service rejected the request.
    #[error("places service answered {status}{}", message_suffix(.message))]
    Status {
        status: String,
        message: Option<String>,
    },
    /// The response reported success but carried no result.
    #[error("places service returned no result")]
    NoResult,
    /// A field required for a [`Place`](crate::Place) is absent.
    #[error("place details lack `{0}`")]
    MissingField(&'static str),
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// Resolves feature identifiers to place details.
pub trait PlaceResolver {
    /// Look up the place identified by `ftid`, requesting `fields`.
    fn lookup(&self, ftid: &Ftid, fields: &[&str]) -> Result<PlaceDetails, LookupError>;
}

impl<R: PlaceResolver + ?Sized> PlaceResolver for &R {
    fn lookup(&self, ftid: &Ftid, fields: &[&str]) -> Result<PlaceDetails, LookupError> {
        (**self).lookup(ftid, fields)
    }
}

/// The `result` object of a details response.
///
/// Every field is optional here because the service omits fields it has no
/// data for.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlaceDetails {
    /// Canonical name according to the service.
    pub name: Option<String>,
    /// Website of the place. Only logged.
    pub website: Option<String>,
    pub place_id: Option<String>,
    pub geometry: Option<Geometry>,
    pub formatted_address: Option<String>,
}

impl PlaceDetails {
    /// Shortcut for `geometry.location`.
    pub fn location(&self) -> Option<LatLng> {
        self.geometry.as_ref().and_then(|g| g.location)
    }
}

/// The `geometry` object of [`PlaceDetails`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Geometry {
    pub location: Option<LatLng>,
}

/// A position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Envelope around [`PlaceDetails`].
#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<PlaceDetails>,
    error_message: Option<String>,
}

/// Extract the [`PlaceDetails`] from a details response `body`.
pub fn parse_response(body: &str) -> Result<PlaceDetails, LookupError> {
    let response: DetailsResponse = serde_json::from_str(body)?;
    match response.status.as_str() {
        STATUS_OK => response.result.ok_or(LookupError::NoResult),
        "ZERO_RESULTS" | "NOT_FOUND" => Err(LookupError::NotFound {
            status: response.status,
        }),
        _ => Err(LookupError::Status {
            status: response.status,
            message: response.error_message,
        }),
    }
}

/// Settings for [`PlacesClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Key for the Places API.
    pub api_key: String,
    /// Scheme and host the details path is appended to.
    pub base_url: String,
    /// Timeout for a single request.
    pub timeout: Duration,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl ClientConfig {
    /// Default settings using `api_key`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    fn details_url(&self) -> String {
        format!("{}{DETAILS_PATH}", self.base_url.trim_end_matches('/'))
    }
}

/// Blocking client for the Places details endpoint.
#[derive(Debug)]
pub struct PlacesClient {
    http: reqwest::blocking::Client,
    config: ClientConfig,
}

impl PlacesClient {
    /// Create a client with the settings in `config`.
    pub fn new(config: ClientConfig) -> Result<Self, LookupError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { http, config })
    }

    /// Prepare the details request for `ftid` with the comma-separated
    /// `fields`.
    fn request(&self, ftid: &Ftid, fields: &str) -> reqwest::blocking::RequestBuilder {
        self.http.get(self.config.details_url()).query(&[
            ("ftid", ftid.as_str()),
            ("fields", fields),
            ("key", self.config.api_key.as_str()),
        ])
    }
}

impl PlaceResolver for PlacesClient {
    fn lookup(&self, ftid: &Ftid, fields: &[&str]) -> Result<PlaceDetails, LookupError> {
        let fields = fields.join(",");
        debug!(%ftid, %fields, "requesting place details");

        // The URL contains the API key, so it is stripped from errors.
        let body = self
            .request(ftid, &fields)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| LookupError::Http(e.without_url()))?;

        parse_response(&body)
    }
}
