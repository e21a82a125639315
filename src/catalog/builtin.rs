use crate::catalog::model::ComponentDescriptor;
use crate::foundation::error::{QuizSceneError, QuizSceneResult};

/// Built-in component files, embedded at compile time, in registration order.
pub const BUILTIN_FILES: [(&str, &str); 6] = [
    (
        "vehicle_sedan.json",
        include_str!("../../catalog/vehicle_sedan.json"),
    ),
    (
        "vehicle_motorcycle.json",
        include_str!("../../catalog/vehicle_motorcycle.json"),
    ),
    ("sign_stop.json", include_str!("../../catalog/sign_stop.json")),
    ("sign_yield.json", include_str!("../../catalog/sign_yield.json")),
    (
        "road_segment_straight.json",
        include_str!("../../catalog/road_segment_straight.json"),
    ),
    (
        "pedestrian_walking.json",
        include_str!("../../catalog/pedestrian_walking.json"),
    ),
];

/// Parse and validate the embedded catalog.
pub fn builtin_components() -> QuizSceneResult<Vec<ComponentDescriptor>> {
    BUILTIN_FILES
        .iter()
        .map(|(name, text)| {
            crate::schema::decode_component_str(text)
                .map_err(|e| QuizSceneError::catalog(format!("built-in {name}: {e}")))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/builtin.rs"]
mod tests;
