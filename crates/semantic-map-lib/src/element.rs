//! Element lookup keys and payload classifiers

use crate::MapError;
use crate::proto::traffic_control_element::Type;
use crate::proto::{MapElement, TrafficControlElement, map_element};
use std::fmt;
use std::str::FromStr;

/// The three ways an element can be addressed in the index
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKey<'a> {
    /// Position in document order
    Position(usize),
    /// Canonical text id
    Id(&'a str),
    /// Raw identifier bytes, canonicalized before lookup
    Bytes(&'a [u8]),
}

impl From<usize> for ElementKey<'_> {
    fn from(position: usize) -> Self {
        ElementKey::Position(position)
    }
}

impl<'a> From<&'a str> for ElementKey<'a> {
    fn from(id: &'a str) -> Self {
        ElementKey::Id(id)
    }
}

impl<'a> From<&'a String> for ElementKey<'a> {
    fn from(id: &'a String) -> Self {
        ElementKey::Id(id.as_str())
    }
}

impl<'a> From<&'a [u8]> for ElementKey<'a> {
    fn from(raw: &'a [u8]) -> Self {
        ElementKey::Bytes(raw)
    }
}

/// Signal light color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FaceColor {
    Red,
    Yellow,
    Green,
}

impl FromStr for FaceColor {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(FaceColor::Red),
            "yellow" => Ok(FaceColor::Yellow),
            "green" => Ok(FaceColor::Green),
            _ => Err(MapError::UnknownColor(s.to_string())),
        }
    }
}

impl fmt::Display for FaceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FaceColor::Red => "red",
            FaceColor::Yellow => "yellow",
            FaceColor::Green => "green",
        };
        f.write_str(name)
    }
}

/// Shape of a signal face
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceDirection {
    Solid,
    LeftArrow,
    RightArrow,
    UpperLeftArrow,
    UpperRightArrow,
}

impl Type {
    /// Color and shape if this is a signal face, `None` otherwise
    pub fn signal_face(&self) -> Option<(FaceColor, FaceDirection)> {
        use FaceColor::*;
        use FaceDirection::*;

        let face = match self {
            Type::PedestrianCrosswalk(_) => return None,

            Type::SignalRedFace(_) => (Red, Solid),
            Type::SignalLeftArrowRedFace(_) => (Red, LeftArrow),
            Type::SignalRightArrowRedFace(_) => (Red, RightArrow),
            Type::SignalUpperLeftArrowRedFace(_) => (Red, UpperLeftArrow),
            Type::SignalUpperRightArrowRedFace(_) => (Red, UpperRightArrow),

            Type::SignalYellowFace(_) => (Yellow, Solid),
            Type::SignalLeftArrowYellowFace(_) => (Yellow, LeftArrow),
            Type::SignalRightArrowYellowFace(_) => (Yellow, RightArrow),
            Type::SignalUpperLeftArrowYellowFace(_) => (Yellow, UpperLeftArrow),
            Type::SignalUpperRightArrowYellowFace(_) => (Yellow, UpperRightArrow),

            Type::SignalGreenFace(_) => (Green, Solid),
            Type::SignalLeftArrowGreenFace(_) => (Green, LeftArrow),
            Type::SignalRightArrowGreenFace(_) => (Green, RightArrow),
            Type::SignalUpperLeftArrowGreenFace(_) => (Green, UpperLeftArrow),
            Type::SignalUpperRightArrowGreenFace(_) => (Green, UpperRightArrow),
        };
        Some(face)
    }
}

/// True iff the element's payload is a lane
#[inline]
pub fn is_lane(element: &MapElement) -> bool {
    matches!(element.element, Some(map_element::Element::Lane(_)))
}

/// True iff the element is a pedestrian crosswalk with polygon geometry
pub fn is_crosswalk(element: &MapElement) -> bool {
    match &element.element {
        Some(map_element::Element::TrafficControlElement(tce)) => {
            matches!(tce.r#type, Some(Type::PedestrianCrosswalk(_)))
                && !tce.points_x_deltas_cm.is_empty()
        }
        _ => false,
    }
}

/// True iff the traffic control element carries any face of the given color
pub fn has_face_color(element: &TrafficControlElement, color: FaceColor) -> bool {
    element
        .r#type
        .as_ref()
        .and_then(Type::signal_face)
        .is_some_and(|(face_color, _)| face_color == color)
}
