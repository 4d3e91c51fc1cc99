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

//! The [`Place`] record produced for every converted row.

/// A saved place with the user's label and the resolved location.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    name: String,
    latitude: f64,
    longitude: f64,
    place_id: String,
    address: String,
}

impl Place {
    /// Create a place named `name` at the given position.
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        place_id: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            place_id: place_id.into(),
            address: address.into(),
        }
    }

    /// Label taken from the _Title_ column of the input.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latitude in decimal degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Identifier of the place in the lookup service.
    pub fn place_id(&self) -> &str {
        &self.place_id
    }

    /// Formatted postal address.
    pub fn address(&self) -> &str {
        &self.address
    }
}
