use glam::IVec2;
use serde::Serialize;

/// A 2D axis-aligned bounding box in raster pixel space.
///
/// `min` is the top-left corner and `max` the bottom-right corner, with y
/// growing downward as in image coordinates. Width and height are derived
/// from the two corners and are never negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Bbox {
    /// The top-left corner.
    pub min: IVec2,
    /// The bottom-right corner.
    pub max: IVec2,
}

impl Bbox {
    /// Creates a bounding box from its two corners.
    ///
    /// The corners are normalized so that `min <= max` on both axes.
    ///
    /// # Example
    /// ```
    /// use glam::IVec2;
    /// use limitcheck_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::new(IVec2::new(10, 5), IVec2::new(0, 0));
    /// assert_eq!(bbox.min, IVec2::ZERO);
    /// ```
    pub fn new(min: IVec2, max: IVec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Creates a bounding box from OCR-style `(x, y, w, h)` values.
    ///
    /// Negative sizes are clamped to zero, which yields a degenerate box.
    ///
    /// # Example
    /// ```
    /// use glam::IVec2;
    /// use limitcheck_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::from_xywh(1, 2, 5, 3);
    /// assert_eq!(bbox.max, IVec2::new(6, 5));
    /// ```
    pub fn from_xywh(x: i32, y: i32, w: i32, h: i32) -> Self {
        let min = IVec2::new(x, y);
        Self {
            min,
            max: min + IVec2::new(w.max(0), h.max(0)),
        }
    }

    pub fn x(&self) -> i32 {
        self.min.x
    }

    pub fn y(&self) -> i32 {
        self.min.y
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    /// Right edge (`x + w`).
    pub fn right(&self) -> i32 {
        self.max.x
    }

    /// Bottom edge (`y + h`).
    pub fn bottom(&self) -> i32 {
        self.max.y
    }

    /// Calculates the area of the bounding box.
    ///
    /// Computed in `i64` so that boxes on large upscaled pages cannot overflow.
    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    /// Twice the horizontal midpoint, kept integral so that midpoint
    /// comparisons stay exact.
    pub fn double_center_x(&self) -> i64 {
        self.min.x as i64 + self.max.x as i64
    }

    /// Returns a copy grown by `margin` pixels on every side.
    pub fn expand(&self, margin: i32) -> Self {
        Self {
            min: self.min - IVec2::splat(margin),
            max: self.max + IVec2::splat(margin),
        }
    }

    /// Standard rectangle overlap test.
    ///
    /// Touching edges count as overlapping: the boxes only fail the test when
    /// they are strictly separated on the x axis or on the y axis.
    pub fn intersects(&self, other: &Self) -> bool {
        let separated_x = self.min.x > other.max.x || other.min.x > self.max.x;
        let separated_y = self.min.y > other.max.y || other.min.y > self.max.y;
        !(separated_x || separated_y)
    }

    /// Checks whether `other` overlaps this box once this box is grown by
    /// `margin` pixels on every side.
    ///
    /// # Example
    /// ```
    /// use limitcheck_core::analysis::bbox::Bbox;
    /// let a = Bbox::from_xywh(0, 0, 10, 10);
    /// let b = Bbox::from_xywh(15, 0, 10, 10);
    /// assert!(a.overlaps_or_close(&b, 5));
    /// assert!(!a.overlaps_or_close(&b, 4));
    /// ```
    pub fn overlaps_or_close(&self, other: &Self, margin: i32) -> bool {
        self.expand(margin).intersects(other)
    }

    /// Creates the smallest bounding box that encompasses both boxes.
    ///
    /// # Example
    /// ```
    /// use glam::IVec2;
    /// use limitcheck_core::analysis::bbox::Bbox;
    ///
    /// let bbox1 = Bbox::from_xywh(0, 0, 5, 5);
    /// let bbox2 = Bbox::from_xywh(3, 3, 5, 5);
    /// let union = bbox1.union(&bbox2);
    ///
    /// assert_eq!(union.min, IVec2::new(0, 0));
    /// assert_eq!(union.max, IVec2::new(8, 8));
    /// ```
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Checks if this bounding box completely contains another one.
    pub fn contains(&self, other: &Self) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
    }

    /// Clamps the box to `[min_bounds, max_bounds]`, typically the image.
    pub fn clamp(&self, min_bounds: IVec2, max_bounds: IVec2) -> Self {
        let min = self.min.max(min_bounds).min(max_bounds);
        let max = self.max.min(max_bounds).max(min);
        Self { min, max }
    }
}
