use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};

/// Trace the external boundaries of a binary mask's foreground regions.
///
/// Returns zero or more closed pixel-coordinate polygons in tracing order.
/// Interior holes are not reported: the polygon label format cannot represent
/// them, so a donut-shaped instance yields only its outer boundary. Contours
/// enclosing less than `min_area` px^2 are dropped as annotation noise.
pub fn extract_contours(mask: &GrayImage, min_area: f64) -> Vec<Vec<(f64, f64)>> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|contour| contour.border_type == BorderType::Outer)
        .map(|contour| {
            contour
                .points
                .iter()
                .map(|p| (f64::from(p.x), f64::from(p.y)))
                .collect::<Vec<_>>()
        })
        .filter(|points| polygon_area(points) >= min_area)
        .collect()
}

/// Enclosed area of a closed polygon via the shoelace formula.
///
/// Computed on boundary coordinates, so a single pixel encloses zero area;
/// this matches how the speck filter is meant to behave.
pub fn polygon_area(points: &[(f64, f64)]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice_area: f64 = (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            points[i].0 * points[j].1 - points[j].0 * points[i].1
        })
        .sum();
    (twice_area / 2.0).abs()
}
