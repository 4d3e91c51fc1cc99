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

//! Library for converting saved places from a
//! [Google Takeout](https://takeout.google.com/) CSV export to
//! [GPX](https://www.topografix.com/gpx.asp) waypoints.
//!
//! Every row of the export carries a title, a note, and a place URL. The
//! feature identifier hidden in the URL is [decoded](decode), looked up with a
//! [`PlaceResolver`] to obtain coordinates and address, and finally
//! [rendered](mod@render) as a waypoint.
//!
//! See [`convert`] for information on how to use this library.

use std::io::{self, Read};

use thiserror::Error;

pub mod decode;
mod place;
pub mod render;
pub mod resolve;
pub mod row;

pub use decode::{Ftid, MalformedUrlError};
pub use place::Place;
pub use render::{render, ConfigurationError, OutputFormat};
pub use resolve::{ClientConfig, LookupError, PlaceDetails, PlaceResolver, PlacesClient};
pub use row::{read_rows, Row, RowConverter};

/// Error returned from the [`convert`] function.
///
/// The wrapped error is available through [`std::error::Error::source`].
#[derive(Error, Debug)]
pub enum Error {
    /// The URL of a row could not be decoded.
    #[error("malformed place URL")]
    MalformedUrl(#[from] MalformedUrlError),
    /// The place of a row could not be looked up.
    #[error("place lookup failed")]
    Lookup(#[from] LookupError),
    /// The requested output is not supported.
    #[error("invalid configuration")]
    Configuration(#[from] ConfigurationError),
    /// Converting the row with 1-based `index` failed.
    #[error("converting row {index} ({title:?}) failed")]
    Row {
        index: usize,
        title: String,
        source: Box<Error>,
    },
    /// CSV reading failed.
    #[error("reading CSV failed")]
    Csv(#[from] csv::Error),
    /// GPX writing failed.
    #[error("writing GPX failed")]
    Xml(#[from] xml::writer::Error),
    #[error("I/O failed")]
    Io(#[from] io::Error),
}

/// Read a CSV export and return one [`Place`] per row.
///
/// Rows are converted one after another using `resolver`. The first failing
/// row aborts the conversion.
pub fn convert_places(source: impl Read, resolver: impl PlaceResolver) -> Result<Vec<Place>, Error> {
    RowConverter::new(resolver).convert_all(read_rows(source))
}

/// Read a CSV export and write a waypoint document.
///
/// A complete CSV export is read from `source`, every row is resolved using
/// `resolver`, and the places are written as a complete document in `format`
/// to `sink`.
///
/// Nothing is written to `sink` unless all rows were converted.
///
/// # Example
/// ```
/// # use places_gpx_convert::{convert, Ftid, LookupError, OutputFormat, PlaceDetails, PlaceResolver};
/// # use places_gpx_convert::resolve::{Geometry, LatLng};
/// #
/// struct Fixed;
///
/// impl PlaceResolver for Fixed {
///     fn lookup(&self, _: &Ftid, _: &[&str]) -> Result<PlaceDetails, LookupError> {
///         Ok(PlaceDetails {
///             place_id: Some("ChIJLU7jZClu5kcR4PcOOO6p3I0".to_string()),
///             geometry: Some(Geometry {
///                 location: Some(LatLng { lat: 48.858222, lng: 2.2945 }),
///             }),
///             formatted_address: Some("Champ de Mars, 75007 Paris".to_string()),
///             ..Default::default()
///         })
///     }
/// }
///
/// let source = "Title,Note,URL
/// Eiffel Tower,,https://www.google.com/maps/place/Tour+Eiffel/data=!4m2!3m1!1s0x47e66e2964e34e2d:0x8ddca9ee380ef7e0
/// ";
/// let mut sink = vec![];
///
/// convert(source.as_bytes(), Fixed, OutputFormat::Gpx, &mut sink).expect("conversion failed");
///
/// let gpx = String::from_utf8(sink).expect("GPX data is not valid UTF-8");
/// assert!(gpx.contains("<gpx"));
/// assert!(gpx.contains("48.858222"));
/// assert!(gpx.contains("2.2945"));
/// assert!(gpx.contains("Eiffel Tower"));
/// assert!(gpx.contains("<address>Champ de Mars, 75007 Paris</address>"));
/// ```
pub fn convert(
    source: impl Read,
    resolver: impl PlaceResolver,
    format: OutputFormat,
    sink: impl io::Write,
) -> Result<(), Error> {
    let places = convert_places(source, resolver)?;
    render(format, &places, sink)
}
