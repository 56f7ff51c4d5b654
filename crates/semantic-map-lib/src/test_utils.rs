//! Document builders shared by unit tests

use crate::element::FaceColor;
use crate::proto::traffic_control_element::Type;
use crate::proto::{
    GeoFrame, GeoLocation, GlobalId, Lane, LaneBoundary, MapElement, MapFragment,
    PedestrianCrosswalk, SignalFace, TrafficControlElement, map_element,
};

pub fn null_island_frame() -> Option<GeoFrame> {
    Some(GeoFrame {
        origin: Some(GeoLocation {
            lat_e7: 0,
            lng_e7: 0,
        }),
    })
}

/// Boundary with flat (z = 0) centimeter deltas
pub fn boundary(dx: Vec<i32>, dy: Vec<i32>) -> LaneBoundary {
    LaneBoundary {
        vertex_deltas_z_cm: vec![0; dx.len()],
        vertex_deltas_x_cm: dx,
        vertex_deltas_y_cm: dy,
    }
}

pub fn lane(
    id: &str,
    left: LaneBoundary,
    right: LaneBoundary,
    traffic_controls: &[&str],
) -> MapElement {
    MapElement {
        id: Some(GlobalId::new(id)),
        element: Some(map_element::Element::Lane(Lane {
            geo_frame: null_island_frame(),
            left_boundary: Some(left),
            right_boundary: Some(right),
            traffic_controls: traffic_controls.iter().map(|tc| GlobalId::new(*tc)).collect(),
        })),
    }
}

/// Two-vertex lane whose left and right boundaries share the same deltas
pub fn lane_element(id: &str, dx: [i32; 2], dy: [i32; 2]) -> MapElement {
    lane(
        id,
        boundary(dx.to_vec(), dy.to_vec()),
        boundary(dx.to_vec(), dy.to_vec()),
        &[],
    )
}

pub fn crosswalk_element(id: &str, dx: Vec<i32>, dy: Vec<i32>) -> MapElement {
    traffic_control(
        id,
        Type::PedestrianCrosswalk(PedestrianCrosswalk {}),
        dx,
        dy,
    )
}

/// Solid signal face of the given color, without geometry
pub fn face_element(id: &str, color: FaceColor) -> MapElement {
    let kind = match color {
        FaceColor::Red => Type::SignalRedFace(SignalFace {}),
        FaceColor::Yellow => Type::SignalYellowFace(SignalFace {}),
        FaceColor::Green => Type::SignalGreenFace(SignalFace {}),
    };
    traffic_control(id, kind, Vec::new(), Vec::new())
}

fn traffic_control(id: &str, kind: Type, dx: Vec<i32>, dy: Vec<i32>) -> MapElement {
    MapElement {
        id: Some(GlobalId::new(id)),
        element: Some(map_element::Element::TrafficControlElement(
            TrafficControlElement {
                geo_frame: null_island_frame(),
                points_z_deltas_cm: vec![0; dx.len()],
                points_x_deltas_cm: dx,
                points_y_deltas_cm: dy,
                r#type: Some(kind),
            },
        )),
    }
}

/// Small map anchored at (0, 0):
///
/// - `L1`: left goes 1 m east then 1 m north, right starts 3 m east;
///   references `TL_RED` and `C1`
/// - `C1`: triangular crosswalk
/// - `TL_RED`, `TL_GREEN`: solid signal faces
/// - `L2`: left is 10 m long over 3 vertices, right 4 m long over 2
pub fn sample_fragment() -> MapFragment {
    MapFragment {
        elements: vec![
            lane(
                "L1",
                boundary(vec![100, 0], vec![0, 100]),
                boundary(vec![300, 0], vec![0, 100]),
                &["TL_RED", "C1"],
            ),
            crosswalk_element("C1", vec![0, 100, 0], vec![0, 0, 100]),
            face_element("TL_RED", FaceColor::Red),
            face_element("TL_GREEN", FaceColor::Green),
            lane(
                "L2",
                boundary(vec![0, 500, 500], vec![0, 0, 0]),
                boundary(vec![0, 400], vec![300, 0]),
                &[],
            ),
        ],
    }
}
