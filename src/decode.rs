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

//! Extraction of feature identifiers from place-sharing URLs.
//!
//! A saved place is exported as a URL like
//! `https://www.google.com/maps/place/<name>/data=<payload>`. The payload is an
//! undocumented, versioned blob which somewhere contains the feature
//! identifier `0x<hex>:0x<hex>` of the place. Decoding happens in two separate
//! steps, [`parse_place_url`] and [`find_ftid`], so that each can be adapted on
//! its own once the URL format changes.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Shape of a place URL. `name` is everything up to the next slash, `data`
/// everything after `data=`.
static PLACE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://www\.google\.com/maps/place/(?P<name>[^/]*?)/data=(?P<data>.*)")
        .expect("place URL pattern is valid")
});

/// A feature identifier anywhere inside the payload.
// https://stackoverflow.com/questions/47017387/decoding-the-google-maps-embedded-parameters/47042514#47042514
static FTID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"0x[0-9a-fA-F]+:0x[0-9a-fA-F]+").expect("ftid pattern is valid"));

/// Error returned when a URL cannot be decoded into an [`Ftid`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedUrlError {
    /// The URL lacks the place prefix or the `data=` segment.
    #[error("not a place URL with a data segment: {url}")]
    NotAPlaceUrl { url: String },
    /// The payload does not contain a `0x...:0x...` token.
    #[error("no feature identifier in URL payload: {payload}")]
    NoFeatureId { payload: String },
}

/// Feature identifier of a place, e.g. `0x47c1234abcd:0x9f0987654321`.
///
/// It can only be obtained from [`decode`] or [`find_ftid`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ftid(String);

impl Ftid {
    /// The identifier as sent to the lookup service.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ftid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two parts of a place URL matched by [`parse_place_url`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceUrl<'a> {
    /// URL-encoded place name. Not used for lookups.
    pub name: &'a str,
    /// Everything after `data=`.
    pub data: &'a str,
}

/// Decode the feature identifier from a place `url`.
///
/// # Example
/// ```
/// # use places_gpx_convert::decode::decode;
/// #
/// let url = "https://www.google.com/maps/place/Cafe/data=!4m2!3m1!1s0x47c1234abcd:0x9f0987654321";
/// assert_eq!(decode(url).unwrap().as_str(), "0x47c1234abcd:0x9f0987654321");
/// ```
pub fn decode(url: &str) -> Result<Ftid, MalformedUrlError> {
    let place_url = parse_place_url(url)?;
    let (_, ftid) = find_ftid(place_url.data)?;
    Ok(ftid)
}

/// First step: split a place `url` into name and payload.
pub fn parse_place_url(url: &str) -> Result<PlaceUrl<'_>, MalformedUrlError> {
    let captures = PLACE_URL
        .captures(url)
        .ok_or_else(|| MalformedUrlError::NotAPlaceUrl {
            url: url.to_string(),
        })?;

    // Both groups are not optional, so they are present on every match.
    let group = |name| captures.name(name).map_or("", |m| m.as_str());
    Ok(PlaceUrl {
        name: group("name"),
        data: group("data"),
    })
}

/// Second step: find the first feature identifier in `payload`.
///
/// Returns the discarded part in front of the identifier together with the
/// identifier itself.
pub fn find_ftid(payload: &str) -> Result<(&str, Ftid), MalformedUrlError> {
    let token = FTID
        .find(payload)
        .ok_or_else(|| MalformedUrlError::NoFeatureId {
            payload: payload.to_string(),
        })?;

    Ok((
        &payload[..token.start()],
        Ftid(token.as_str().to_string()),
    ))
}
