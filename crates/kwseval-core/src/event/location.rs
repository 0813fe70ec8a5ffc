//! Spatial and symbolic locations of events.
//!
//! Every event carries a location implementing [`Location`]. The matching
//! pipeline only needs the capability set defined by the trait (ordering,
//! area, intersection and union areas, an optional document scope and a text
//! encoding), so it stays generic over the concrete kind:
//!
//! | Type | Text form | Overlap |
//! |------|-----------|---------|
//! | [`BoundingBox`] | `x y w h` | rectangle intersection |
//! | [`DocumentBoundingBox`] | `document x y w h` | rectangle intersection within the same document |
//! | [`IdentityLocation`] | `label` | 1 if labels are equal, 0 otherwise |

use crate::error::ParseLocationError;
use std::cmp::Ordering;
use std::fmt;

/// Capability set required from an event location.
///
/// The ordering is only used to make sets of events deterministic; it does
/// not need any geometric meaning.
pub trait Location: Clone + Eq + Ord + fmt::Debug + fmt::Display {
    /// Number of whitespace-separated fields in the text encoding.
    const FIELDS: usize;

    /// Parses a location from exactly [`Self::FIELDS`] text fields.
    fn from_fields(fields: &[&str]) -> Result<Self, ParseLocationError>;

    /// Document this location is scoped to, if any.
    ///
    /// Locations in different documents never intersect, which lets the
    /// [`EventIndex`](crate::matching::EventIndex) bucket them separately.
    fn document(&self) -> Option<&str> {
        None
    }

    /// Area of the location.
    fn area(&self) -> f64;

    /// Area shared with another location.
    fn intersection_area(&self, other: &Self) -> f64;

    /// Area covered by either location.
    fn union_area(&self, other: &Self) -> f64 {
        self.area() + other.area() - self.intersection_area(other)
    }
}

fn check_field_count(fields: &[&str], expected: usize) -> Result<(), ParseLocationError> {
    if fields.len() != expected {
        return Err(ParseLocationError::FieldCount {
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

fn parse_coordinate(field: &str) -> Result<u32, ParseLocationError> {
    field
        .parse()
        .map_err(|_| ParseLocationError::InvalidCoordinate(field.to_string()))
}

// ============================================================================
// BoundingBox
// ============================================================================

/// Axis-aligned rectangle with integer pixel coordinates.
///
/// `(x, y)` is the top-left corner, `w` and `h` the width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge, widened so `x + w` cannot overflow.
    fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.w)
    }

    fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.h)
    }
}

/// Boxes are ordered top-to-bottom, then left-to-right, then by size.
impl Ord for BoundingBox {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x, self.w, self.h).cmp(&(other.y, other.x, other.w, other.h))
    }
}

impl PartialOrd for BoundingBox {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Location for BoundingBox {
    const FIELDS: usize = 4;

    fn from_fields(fields: &[&str]) -> Result<Self, ParseLocationError> {
        check_field_count(fields, Self::FIELDS)?;
        Ok(Self::new(
            parse_coordinate(fields[0])?,
            parse_coordinate(fields[1])?,
            parse_coordinate(fields[2])?,
            parse_coordinate(fields[3])?,
        ))
    }

    fn area(&self) -> f64 {
        (u64::from(self.w) * u64::from(self.h)) as f64
    }

    fn intersection_area(&self, other: &Self) -> f64 {
        let x1 = u64::from(self.x.max(other.x));
        let x2 = self.right().min(other.right());
        let y1 = u64::from(self.y.max(other.y));
        let y2 = self.bottom().min(other.bottom());
        if x1 > x2 || y1 > y2 {
            0.0
        } else {
            ((x2 - x1) * (y2 - y1)) as f64
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x, self.y, self.w, self.h)
    }
}

// ============================================================================
// DocumentBoundingBox
// ============================================================================

/// Bounding box scoped to a named document (page image, file, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentBoundingBox {
    pub document: String,
    pub bbox: BoundingBox,
}

impl DocumentBoundingBox {
    pub fn new(document: impl Into<String>, x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            document: document.into(),
            bbox: BoundingBox::new(x, y, w, h),
        }
    }
}

impl Location for DocumentBoundingBox {
    const FIELDS: usize = 5;

    fn from_fields(fields: &[&str]) -> Result<Self, ParseLocationError> {
        check_field_count(fields, Self::FIELDS)?;
        Ok(Self {
            document: fields[0].to_string(),
            bbox: BoundingBox::from_fields(&fields[1..])?,
        })
    }

    fn document(&self) -> Option<&str> {
        Some(&self.document)
    }

    fn area(&self) -> f64 {
        self.bbox.area()
    }

    fn intersection_area(&self, other: &Self) -> f64 {
        if self.document == other.document {
            self.bbox.intersection_area(&other.bbox)
        } else {
            0.0
        }
    }
}

impl fmt::Display for DocumentBoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.document, self.bbox)
    }
}

// ============================================================================
// IdentityLocation
// ============================================================================

/// Opaque location that only supports exact comparison.
///
/// Used for segmentation-based evaluation, where a detection either names the
/// same segment as the reference or not. The area is 1 and two locations
/// "overlap" with area 1 exactly when they are equal, so the generic overlap
/// machinery reduces to an identity lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityLocation(pub String);

impl IdentityLocation {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Location for IdentityLocation {
    const FIELDS: usize = 1;

    fn from_fields(fields: &[&str]) -> Result<Self, ParseLocationError> {
        check_field_count(fields, Self::FIELDS)?;
        Ok(Self::new(fields[0]))
    }

    fn area(&self) -> f64 {
        1.0
    }

    fn intersection_area(&self, other: &Self) -> f64 {
        if self == other {
            1.0
        } else {
            0.0
        }
    }
}

impl fmt::Display for IdentityLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
