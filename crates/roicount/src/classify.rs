//! Point-in-region classification.

use log::trace;

use roicount_core::section::{Marker, Region};

use crate::MembershipMatrix;

/// Tests every marker against every region outline.
///
/// Returns an N x M matrix where cell (i, r) is true if marker `i` lies inside
/// region `r` or on its outline (see
/// [`geometry`](roicount_core::geometry) for the boundary policy). Regions
/// sharing a name are merged into one column. With no regions the result is
/// an N x 0 matrix; deciding whether that is an error is left to
/// [`resolve`](crate::resolve).
///
/// # Examples
///
/// ```
/// use roicount::classify;
/// use roicount_core::{
///     geometry::{Point, Polygon},
///     section::Region,
/// };
///
/// let square = Polygon::new(vec![
///     Point::new(0.0, 0.0),
///     Point::new(10.0, 0.0),
///     Point::new(10.0, 10.0),
///     Point::new(0.0, 10.0),
/// ])
/// .unwrap();
/// let regions = [Region::new("CTX", square)];
/// let markers = [Point::new(5.0, 5.0), Point::new(20.0, 5.0)];
///
/// let matrix = classify(&markers, &regions);
/// assert_eq!(matrix.get(0, "CTX"), Some(true));
/// assert_eq!(matrix.get(1, "CTX"), Some(false));
/// ```
pub fn classify(markers: &[Marker], regions: &[Region]) -> MembershipMatrix {
    let mut matrix = MembershipMatrix::new(markers.len());

    for region in regions {
        let polygon = region.polygon();
        let column: Vec<bool> = markers.iter().map(|&m| polygon.contains(m)).collect();
        trace!(
            region = region.name(),
            markers_inside = column.iter().filter(|&&inside| inside).count();
            "Region classified"
        );
        matrix.union_column(region.name(), column);
    }

    matrix
}
