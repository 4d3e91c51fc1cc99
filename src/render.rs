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

//! Serialization of [`Place`]s into waypoint documents.

use std::fmt;
use std::io;
use std::str::FromStr;

use xml::common::XmlVersion;
use xml::writer::{EmitterConfig, EventWriter, XmlEvent};

use crate::{Error, Place};

/// Namespace of GPX 1.1 documents.
const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";
const GPX_VERSION: &str = "1.1";
/// Value of the _creator_ attribute of the `<gpx>` tag.
const CREATOR: &str = env!("CARGO_PKG_NAME");

/// Error for settings which are rejected before any row is processed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unsupported output format {0:?} (supported: gpx)")]
    UnsupportedFormat(String),
}

/// Format of the written document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// [GPX 1.1](https://www.topografix.com/gpx.asp) with one waypoint per
    /// place.
    #[default]
    Gpx,
}

impl FromStr for OutputFormat {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("gpx") {
            Ok(Self::Gpx)
        } else {
            Err(ConfigurationError::UnsupportedFormat(s.to_string()))
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpx => f.write_str("gpx"),
        }
    }
}

/// Write `places` to `sink` in the given `format`.
pub fn render(format: OutputFormat, places: &[Place], sink: impl io::Write) -> Result<(), Error> {
    match format {
        OutputFormat::Gpx => render_gpx(places, sink),
    }
}

/// Write `places` as a complete GPX document to `sink`.
///
/// Every place becomes a _wpt_ in the order of `places`. The address is stored
/// in an `<address>` element below the _extensions_ of the waypoint.
pub fn render_gpx(places: &[Place], mut sink: impl io::Write) -> Result<(), Error> {
    {
        let mut writer = EmitterConfig::new()
            .perform_indent(true)
            .create_writer(&mut sink);

        writer.write(XmlEvent::StartDocument {
            version: XmlVersion::Version10,
            encoding: Some("UTF-8"),
            standalone: None,
        })?;
        writer.write(
            XmlEvent::start_element("gpx")
                .default_ns(GPX_NAMESPACE)
                .attr("version", GPX_VERSION)
                .attr("creator", CREATOR),
        )?;
        for place in places {
            write_waypoint(&mut writer, place)?;
        }
        writer.write(XmlEvent::end_element())?;
    }
    writeln!(sink)?;
    sink.flush()?;

    Ok(())
}

/// Write a single `place` as _wpt_.
fn write_waypoint(writer: &mut EventWriter<impl io::Write>, place: &Place) -> Result<(), Error> {
    let lat = place.latitude().to_string();
    let lon = place.longitude().to_string();
    writer.write(XmlEvent::start_element("wpt").attr("lat", &lat).attr("lon", &lon))?;

    write_text_element(writer, "name", place.name())?;

    writer.write(XmlEvent::start_element("extensions"))?;
    write_text_element(writer, "address", place.address())?;
    writer.write(XmlEvent::end_element())?;

    writer.write(XmlEvent::end_element())?;
    Ok(())
}

/// Write an element `name` containing only `text`.
fn write_text_element(
    writer: &mut EventWriter<impl io::Write>,
    name: &str,
    text: &str,
) -> Result<(), Error> {
    writer.write(XmlEvent::start_element(name))?;
    writer.write(XmlEvent::characters(text))?;
    writer.write(XmlEvent::end_element())?;
    Ok(())
}
