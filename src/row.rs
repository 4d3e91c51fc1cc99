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

//! Conversion of CSV rows into [`Place`]s.

use std::io::Read;

use serde::Deserialize;
use tracing::{debug, info};

use crate::decode::{find_ftid, parse_place_url};
use crate::resolve::{LookupError, PlaceDetails, PlaceResolver, DETAIL_FIELDS};
use crate::{Error, Place};

/// A single row of a saved-places export.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Row {
    #[serde(rename = "Title")]
    pub title: String,
    /// Free text of the user. Only logged.
    #[serde(rename = "Note")]
    pub note: String,
    #[serde(rename = "URL")]
    pub url: String,
}

/// Read [`Row`]s from CSV data with a header row.
///
/// Columns are matched by name; additional columns are ignored.
pub fn read_rows<R: Read>(source: R) -> impl Iterator<Item = Result<Row, csv::Error>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source)
        .into_deserialize()
}

/// Converts rows one at a time using a [`PlaceResolver`].
#[derive(Debug)]
pub struct RowConverter<R> {
    resolver: R,
}

impl<R: PlaceResolver> RowConverter<R> {
    /// Create a converter looking up places with `resolver`.
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// Decode the URL of `row`, look up the place, and build a [`Place`].
    ///
    /// The name of the place is always the title of the row, never the name
    /// known to the lookup service.
    pub fn convert(&self, row: &Row) -> Result<Place, Error> {
        debug!(title = %row.title, note = %row.note, "converting row");

        let place_url = parse_place_url(&row.url)?;
        debug!(name = place_url.name, data = place_url.data, "matched place URL");

        let (prefix, ftid) = find_ftid(place_url.data)?;
        debug!(prefix, %ftid, "found feature identifier");

        let details = self.resolver.lookup(&ftid, DETAIL_FIELDS)?;
        debug!(canonical_name = ?details.name, website = ?details.website, "resolved place");

        Ok(place_from_details(&row.title, details)?)
    }

    /// Convert all `rows` in order.
    ///
    /// Stops at the first row which cannot be read or converted. No places are
    /// returned in this case.
    pub fn convert_all(
        &self,
        rows: impl IntoIterator<Item = Result<Row, csv::Error>>,
    ) -> Result<Vec<Place>, Error> {
        let mut places = vec![];
        for (index, row) in rows.into_iter().enumerate() {
            let row = row?;
            let place = self.convert(&row).map_err(|source| Error::Row {
                index: index + 1,
                title: row.title,
                source: Box::new(source),
            })?;
            places.push(place);
        }

        info!(count = places.len(), "converted all rows");
        Ok(places)
    }
}

/// Build a [`Place`] named `title` from the looked-up `details`.
pub fn place_from_details(title: &str, details: PlaceDetails) -> Result<Place, LookupError> {
    let location = details
        .location()
        .ok_or(LookupError::MissingField("geometry/location"))?;
    let place_id = details
        .place_id
        .ok_or(LookupError::MissingField("place_id"))?;
    let address = details
        .formatted_address
        .ok_or(LookupError::MissingField("formatted_address"))?;

    Ok(Place::new(
        title,
        location.lat,
        location.lng,
        place_id,
        address,
    ))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::decode::{Ftid, MalformedUrlError};
    use crate::resolve::{Geometry, LatLng};

    /// Answers lookups from a fixed table and records the requests.
    #[derive(Default)]
    struct FakeResolver {
        places: HashMap<String, PlaceDetails>,
        requests: RefCell<Vec<String>>,
    }

    impl FakeResolver {
        fn with(mut self, ftid: &str, details: PlaceDetails) -> Self {
            self.places.insert(ftid.to_string(), details);
            self
        }
    }

    impl PlaceResolver for FakeResolver {
        fn lookup(&self, ftid: &Ftid, fields: &[&str]) -> Result<PlaceDetails, LookupError> {
            assert_eq!(fields, DETAIL_FIELDS);
            self.requests.borrow_mut().push(ftid.to_string());
            self.places
                .get(ftid.as_str())
                .cloned()
                .ok_or_else(|| LookupError::NotFound {
                    status: "NOT_FOUND".to_string(),
                })
        }
    }

    fn details(lat: f64, lng: f64, place_id: &str, address: &str) -> PlaceDetails {
        PlaceDetails {
            name: Some("Canonical Name".to_string()),
            website: None,
            place_id: Some(place_id.to_string()),
            geometry: Some(Geometry {
                location: Some(LatLng { lat, lng }),
            }),
            formatted_address: Some(address.to_string()),
        }
    }

    fn row(title: &str, url: &str) -> Row {
        Row {
            title: title.to_string(),
            note: String::new(),
            url: url.to_string(),
        }
    }

    fn url(ftid: &str) -> String {
        format!("https://www.google.com/maps/place/Somewhere/data=!4m2!3m1!1s{ftid}!8m2")
    }

    #[test]
    fn uses_row_title() {
        let resolver = FakeResolver::default().with("0x1:0xa", details(37.1, -122.1, "p123", "1 Main St"));
        let converter = RowConverter::new(&resolver);

        let place = converter.convert(&row("My Cafe", &url("0x1:0xa"))).unwrap();
        assert_eq!(place, Place::new("My Cafe", 37.1, -122.1, "p123", "1 Main St"));
        assert_eq!(*resolver.requests.borrow(), ["0x1:0xa"]);
    }

    #[test]
    fn maps_json_details() {
        let details: PlaceDetails = serde_json::from_str(
            r#"{"geometry": {"location": {"lat": 37.1, "lng": -122.1}}, "place_id": "p123", "formatted_address": "1 Main St"}"#,
        )
        .unwrap();

        let place = place_from_details("My Cafe", details).unwrap();
        assert_eq!(place.name(), "My Cafe");
        assert_eq!(place.latitude(), 37.1);
        assert_eq!(place.longitude(), -122.1);
        assert_eq!(place.place_id(), "p123");
        assert_eq!(place.address(), "1 Main St");
    }

    #[test]
    fn requires_all_fields() {
        let full = details(1.0, 2.0, "p", "a");

        let mut missing = full.clone();
        missing.formatted_address = None;
        assert!(matches!(
            place_from_details("t", missing),
            Err(LookupError::MissingField("formatted_address"))
        ));

        let mut missing = full.clone();
        missing.place_id = None;
        assert!(matches!(
            place_from_details("t", missing),
            Err(LookupError::MissingField("place_id"))
        ));

        let mut missing = full.clone();
        missing.geometry = Some(Geometry { location: None });
        assert!(matches!(
            place_from_details("t", missing),
            Err(LookupError::MissingField("geometry/location"))
        ));

        let mut missing = full;
        missing.geometry = None;
        assert!(matches!(
            place_from_details("t", missing),
            Err(LookupError::MissingField("geometry/location"))
        ));
    }

    #[test]
    fn fails_without_lookup_on_bad_url() {
        let resolver = FakeResolver::default();
        let converter = RowConverter::new(&resolver);

        let err = converter
            .convert(&row("A", "https://www.google.com/maps/place/A"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedUrl(MalformedUrlError::NotAPlaceUrl { .. })
        ));

        let err = converter
            .convert(&row("A", "https://www.google.com/maps/place/A/data=!4m2"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedUrl(MalformedUrlError::NoFeatureId { .. })
        ));

        assert!(resolver.requests.borrow().is_empty());
    }

    #[test]
    fn propagates_lookup_failure() {
        let converter = RowConverter::new(FakeResolver::default());
        let err = converter.convert(&row("A", &url("0x1:0x2"))).unwrap_err();
        assert!(matches!(err, Error::Lookup(LookupError::NotFound { .. })));
    }

    #[test]
    fn reads_export() {
        let csv = "Title,Note,URL,Comment\n\
                   My Cafe,best coffee,https://www.google.com/maps/place/x/data=!1s0x1:0x2,\n\
                   \n\
                   \"Bar, Grill\",,https://www.google.com/maps/place/y/data=!1s0x3:0x4,\n";

        let rows = read_rows(csv.as_bytes()).collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "My Cafe");
        assert_eq!(rows[0].note, "best coffee");
        assert_eq!(rows[1].title, "Bar, Grill");
        assert_eq!(rows[1].note, "");
        assert_eq!(rows[1].url, "https://www.google.com/maps/place/y/data=!1s0x3:0x4");
    }

    #[test]
    fn rejects_missing_column() {
        let csv = "Title,Note\nA,b\n";
        let mut rows = read_rows(csv.as_bytes());
        assert!(rows.next().unwrap().is_err());
    }

    #[test]
    fn converts_in_order() {
        let resolver = FakeResolver::default()
            .with("0x1:0x1", details(1.0, 1.0, "p1", "One"))
            .with("0x2:0x2", details(2.0, 2.0, "p2", "Two"));
        let converter = RowConverter::new(&resolver);
        let rows = vec![
            Ok(row("second", &url("0x2:0x2"))),
            Ok(row("first", &url("0x1:0x1"))),
            Ok(row("again", &url("0x2:0x2"))),
        ];

        let places = converter.convert_all(rows).unwrap();
        let names: Vec<_> = places.iter().map(Place::name).collect();
        assert_eq!(names, ["second", "first", "again"]);
        assert_eq!(places[1].address(), "One");
    }

    #[test]
    fn stops_at_first_failure() {
        let resolver = FakeResolver::default().with("0x1:0x1", details(1.0, 1.0, "p1", "One"));
        let converter = RowConverter::new(&resolver);
        let rows = vec![
            Ok(row("good", &url("0x1:0x1"))),
            Ok(row("bad", "not a url")),
            Ok(row("never", &url("0x1:0x1"))),
        ];

        match converter.convert_all(rows) {
            Err(Error::Row { index, title, source }) => {
                assert_eq!(index, 2);
                assert_eq!(title, "bad");
                assert!(matches!(*source, Error::MalformedUrl(_)));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(resolver.requests.borrow().len(), 1);
    }
}
