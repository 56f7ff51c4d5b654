//! Protobuf schema of the road network map
//!
//! Messages are declared with `prost` derives so the document can be decoded
//! without a build step. Field tags are part of the on-disk format and must not
//! be renumbered.

/// Root of a serialized map: an ordered list of elements
#[derive(Clone, PartialEq, prost::Message)]
pub struct MapFragment {
    #[prost(message, repeated, tag = "1")]
    pub elements: Vec<MapElement>,
}

/// Opaque element identifier, stored as raw bytes
#[derive(Clone, PartialEq, Eq, Hash, prost::Message)]
pub struct GlobalId {
    #[prost(bytes = "vec", tag = "1")]
    pub id: Vec<u8>,
}

impl GlobalId {
    pub fn new(id: impl Into<Vec<u8>>) -> Self {
        Self { id: id.into() }
    }
}

/// A single map element with an optional payload
#[derive(Clone, PartialEq, prost::Message)]
pub struct MapElement {
    #[prost(message, optional, tag = "1")]
    pub id: Option<GlobalId>,
    #[prost(oneof = "map_element::Element", tags = "2, 3")]
    pub element: Option<map_element::Element>,
}

pub mod map_element {
    /// Element payload. Variants unknown to this schema decode as `None`.
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Element {
        #[prost(message, tag = "2")]
        Lane(super::Lane),
        #[prost(message, tag = "3")]
        TrafficControlElement(super::TrafficControlElement),
    }
}

impl MapElement {
    /// Raw identifier bytes (empty if the element carries no id)
    pub fn id_bytes(&self) -> &[u8] {
        self.id.as_ref().map(|id| id.id.as_slice()).unwrap_or_default()
    }

    pub fn lane(&self) -> Option<&Lane> {
        match &self.element {
            Some(map_element::Element::Lane(lane)) => Some(lane),
            _ => None,
        }
    }

    pub fn traffic_control_element(&self) -> Option<&TrafficControlElement> {
        match &self.element {
            Some(map_element::Element::TrafficControlElement(tce)) => Some(tce),
            _ => None,
        }
    }
}

/// Local ENU frame anchored at a geographic origin
#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct GeoFrame {
    #[prost(message, optional, tag = "1")]
    pub origin: Option<GeoLocation>,
}

/// Latitude and longitude in degrees scaled by 1e7
#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct GeoLocation {
    #[prost(sfixed32, tag = "1")]
    pub lat_e7: i32,
    #[prost(sfixed32, tag = "2")]
    pub lng_e7: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Lane {
    #[prost(message, optional, tag = "1")]
    pub geo_frame: Option<GeoFrame>,
    #[prost(message, optional, tag = "2")]
    pub left_boundary: Option<LaneBoundary>,
    #[prost(message, optional, tag = "3")]
    pub right_boundary: Option<LaneBoundary>,
    /// Traffic control elements governing this lane
    #[prost(message, repeated, tag = "4")]
    pub traffic_controls: Vec<GlobalId>,
}

/// Boundary polyline as centimeter deltas in the lane's frame
#[derive(Clone, PartialEq, prost::Message)]
pub struct LaneBoundary {
    #[prost(sint32, repeated, tag = "1")]
    pub vertex_deltas_x_cm: Vec<i32>,
    #[prost(sint32, repeated, tag = "2")]
    pub vertex_deltas_y_cm: Vec<i32>,
    #[prost(sint32, repeated, tag = "3")]
    pub vertex_deltas_z_cm: Vec<i32>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TrafficControlElement {
    #[prost(message, optional, tag = "1")]
    pub geo_frame: Option<GeoFrame>,
    #[prost(sint32, repeated, tag = "2")]
    pub points_x_deltas_cm: Vec<i32>,
    #[prost(sint32, repeated, tag = "3")]
    pub points_y_deltas_cm: Vec<i32>,
    #[prost(sint32, repeated, tag = "4")]
    pub points_z_deltas_cm: Vec<i32>,
    #[prost(
        oneof = "traffic_control_element::Type",
        tags = "10, 20, 21, 22, 23, 24, 30, 31, 32, 33, 34, 40, 41, 42, 43, 44"
    )]
    pub r#type: Option<traffic_control_element::Type>,
}

/// Marker payload for a pedestrian crosswalk
#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct PedestrianCrosswalk {}

/// Marker payload for a single signal face
#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct SignalFace {}

pub mod traffic_control_element {
    use super::{PedestrianCrosswalk, SignalFace};

    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Type {
        #[prost(message, tag = "10")]
        PedestrianCrosswalk(PedestrianCrosswalk),

        #[prost(message, tag = "20")]
        SignalRedFace(SignalFace),
        #[prost(message, tag = "21")]
        SignalLeftArrowRedFace(SignalFace),
        #[prost(message, tag = "22")]
        SignalRightArrowRedFace(SignalFace),
        #[prost(message, tag = "23")]
        SignalUpperLeftArrowRedFace(SignalFace),
        #[prost(message, tag = "24")]
        SignalUpperRightArrowRedFace(SignalFace),

        #[prost(message, tag = "30")]
        SignalYellowFace(SignalFace),
        #[prost(message, tag = "31")]
        SignalLeftArrowYellowFace(SignalFace),
        #[prost(message, tag = "32")]
        SignalRightArrowYellowFace(SignalFace),
        #[prost(message, tag = "33")]
        SignalUpperLeftArrowYellowFace(SignalFace),
        #[prost(message, tag = "34")]
        SignalUpperRightArrowYellowFace(SignalFace),

        #[prost(message, tag = "40")]
        SignalGreenFace(SignalFace),
        #[prost(message, tag = "41")]
        SignalLeftArrowGreenFace(SignalFace),
        #[prost(message, tag = "42")]
        SignalRightArrowGreenFace(SignalFace),
        #[prost(message, tag = "43")]
        SignalUpperLeftArrowGreenFace(SignalFace),
        #[prost(message, tag = "44")]
        SignalUpperRightArrowGreenFace(SignalFace),
    }
}
