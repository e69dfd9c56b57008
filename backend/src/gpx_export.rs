use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use geo_types::Point;
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};

use crate::error::RouteError;
use crate::models::{Coordinate, Landmark};

const CREATOR: &str = "doon-route-planner";

/// Base64 GPX 1.1 document: one named waypoint per landmark stop and a
/// single-segment track following `track`.
pub fn encode_route_as_gpx(
    title: &str,
    stops: &[Landmark],
    track: &[Coordinate],
) -> Result<String, RouteError> {
    let mut gpx = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some(CREATOR.into()),
        ..Default::default()
    };

    for stop in stops {
        let mut waypoint = to_waypoint(&stop.coordinate);
        waypoint.name = Some(stop.name.clone());
        gpx.waypoints.push(waypoint);
    }

    let mut segment = TrackSegment::new();
    segment.points.extend(track.iter().map(to_waypoint));

    let mut gpx_track = Track {
        name: Some(title.into()),
        ..Default::default()
    };
    gpx_track.segments.push(segment);
    gpx.tracks.push(gpx_track);

    let mut buffer = Vec::new();
    gpx::write(&gpx, &mut buffer)?;
    Ok(BASE64.encode(buffer))
}

fn to_waypoint(coord: &Coordinate) -> Waypoint {
    Waypoint::new(Point::new(coord.lon, coord.lat))
}
