#[allow(dead_code)]
/// Builds a tiny axial graph straight from world-space line endpoints, with
/// no unlinks, points, or polygons — the shape nearly every integration test
/// in this directory starts from.
pub fn build_graph(lines: &[((f64, f64), (f64, f64))]) -> spacesyntax::AxialGraph {
    spacesyntax::AxialGraph::build(lines, &[], &[], &[] as &[spacesyntax::point::Polygon], 1.0)
}

#[allow(dead_code)]
/// Rounds a float to `decimal_places`.
pub fn round(number: f64, decimal_places: u32) -> f64 {
    let scale = 10f64.powi(decimal_places as i32);
    (number * scale).round() / scale
}
