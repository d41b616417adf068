//! Decoding glyph outlines into control-point geometry.
//!
//! The decoder resolves a glyph through the loca and glyf tables and
//! flattens it into one [`Outline`] per simple glyph, recursing through
//! composite components and applying their transforms along the way.

use types::{GlyphId, Point};

use crate::read::ReadError;
use crate::tables::glyf::{Anchor, Glyf, Glyph, SimpleGlyph, Transform};
use crate::tables::loca::Loca;

/// Scale applied to every output coordinate.
///
/// The consuming renderer works in design units divided by 256; this
/// constant is part of that contract and must match on both sides.
pub const COORDINATE_SCALE: f32 = 1.0 / 256.0;

/// Maximum depth when recursing into composite components.
///
/// Fonts may nest composites, but any well-formed nesting is shallow;
/// the limit turns reference cycles into an error instead of unbounded
/// recursion.
pub const COMPOSITE_RECURSION_LIMIT: usize = 32;

/// Errors that may occur when decoding an outline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutlineError {
    /// Exceeded the recursion limit while loading a composite glyph.
    RecursionLimitExceeded(GlyphId),
    /// Error occurred while reading glyph data.
    Read(ReadError),
}

impl From<ReadError> for OutlineError {
    fn from(value: ReadError) -> Self {
        Self::Read(value)
    }
}

impl std::fmt::Display for OutlineError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::RecursionLimitExceeded(gid) => write!(
                f,
                "Recursion limit ({COMPOSITE_RECURSION_LIMIT}) exceeded when loading composite component {gid}",
            ),
            Self::Read(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for OutlineError {}

/// The decoded outline of one simple glyph.
///
/// Contours are consecutive runs of `points`, delimited by
/// `contour_ends`; between on-curve points, off-curve points act as
/// quadratic controls.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outline {
    /// The index of the last point of each contour; strictly increasing.
    pub contour_ends: Vec<u16>,
    /// Control points, scaled by [`COORDINATE_SCALE`].
    pub points: Vec<Point<f32>>,
    /// Whether the point at the same index lies on the curve.
    pub on_curve: Vec<bool>,
}

impl Outline {
    /// The number of control points.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }
}

/// Decodes glyph outlines from the loca and glyf tables.
#[derive(Clone)]
pub struct OutlineDecoder<'a> {
    loca: Loca<'a>,
    glyf: Glyf<'a>,
    num_glyphs: u16,
}

impl<'a> OutlineDecoder<'a> {
    /// Create a decoder; `num_glyphs` comes from the maximum profile.
    pub fn new(loca: Loca<'a>, glyf: Glyf<'a>, num_glyphs: u16) -> Self {
        OutlineDecoder {
            loca,
            glyf,
            num_glyphs,
        }
    }

    /// Decode the outlines for `gid`.
    ///
    /// A simple glyph produces one [`Outline`]; a composite produces
    /// one per leaf simple glyph it ultimately references, transformed
    /// into the composite's coordinate space. Glyph ids outside the
    /// font's glyph count and glyphs without outline data produce
    /// nothing.
    pub fn decode(&self, gid: GlyphId) -> Result<Vec<Outline>, OutlineError> {
        let mut result = Vec::new();
        if gid.to_u32() >= self.num_glyphs as u32 {
            log::warn!(
                "glyph id {gid} is out of range for a font with {} glyphs",
                self.num_glyphs
            );
            return Ok(result);
        }
        self.decode_into(gid, &Affine::IDENTITY, 0, &mut result)?;
        Ok(result)
    }

    fn decode_into(
        &self,
        gid: GlyphId,
        transform: &Affine,
        recurse_depth: usize,
        result: &mut Vec<Outline>,
    ) -> Result<(), OutlineError> {
        if recurse_depth > COMPOSITE_RECURSION_LIMIT {
            return Err(OutlineError::RecursionLimitExceeded(gid));
        }
        let Some(glyph) = self.loca.get_glyf(gid, &self.glyf)? else {
            // equal loca offsets: no outline, not an error
            return Ok(());
        };
        match glyph {
            Glyph::Simple(simple) => {
                if simple.number_of_contours() == 0 {
                    log::warn!("glyph {gid} has zero contours; omitting its outline");
                    return Ok(());
                }
                result.push(decode_simple(&simple, transform)?);
                Ok(())
            }
            Glyph::Composite(composite) => {
                for component in composite.components() {
                    if component.glyph.to_u32() >= self.num_glyphs as u32 {
                        log::warn!(
                            "composite glyph {gid} references out of range glyph {}",
                            component.glyph
                        );
                        continue;
                    }
                    let offset = match component.anchor {
                        Anchor::Offset { x, y } => Point::new(x as f32, y as f32),
                        Anchor::Point { .. } => {
                            // point matching needs the points placed so
                            // far; we have no support for it and anchor
                            // the component at the origin instead
                            log::warn!(
                                "composite glyph {gid} uses point-matching anchors; using a zero offset"
                            );
                            Point::new(0.0, 0.0)
                        }
                    };
                    let child_transform = transform.compose(&component.transform, offset);
                    self.decode_into(component.glyph, &child_transform, recurse_depth + 1, result)?;
                }
                Ok(())
            }
        }
    }
}

fn decode_simple(glyph: &SimpleGlyph, transform: &Affine) -> Result<Outline, OutlineError> {
    let n_points = glyph.num_points();
    let mut raw_points = vec![Point::new(0i32, 0i32); n_points];
    let mut flags = vec![0u8; n_points];
    glyph.read_points_fast(&mut raw_points, &mut flags)?;
    let contour_ends = glyph
        .end_pts_of_contours()
        .iter()
        .map(|end| end.get())
        .collect();
    let points = raw_points
        .iter()
        .map(|point| {
            let point = transform.apply(point.map(|coord| coord as f32));
            point.map(|coord| coord * COORDINATE_SCALE)
        })
        .collect();
    let on_curve = flags.iter().map(|flag| flag & 1 != 0).collect();
    Ok(Outline {
        contour_ends,
        points,
        on_curve,
    })
}

/// An affine transform in design units: `p -> M * p + t`.
///
/// Accumulated while descending composite components, so leaf points
/// can be emitted directly in the outermost coordinate space.
#[derive(Clone, Copy, Debug)]
struct Affine {
    xx: f32,
    yx: f32,
    xy: f32,
    yy: f32,
    dx: f32,
    dy: f32,
}

impl Affine {
    const IDENTITY: Affine = Affine {
        xx: 1.0,
        yx: 0.0,
        xy: 0.0,
        yy: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    fn apply(&self, point: Point<f32>) -> Point<f32> {
        Point::new(
            self.xx * point.x + self.xy * point.y + self.dx,
            self.yx * point.x + self.yy * point.y + self.dy,
        )
    }

    /// The transform for a child component: the component's matrix and
    /// offset apply first, then `self`.
    fn compose(&self, transform: &Transform, offset: Point<f32>) -> Affine {
        let (xx, yx) = (transform.xx.to_f32(), transform.yx.to_f32());
        let (xy, yy) = (transform.xy.to_f32(), transform.yy.to_f32());
        let delta = self.apply(offset);
        Affine {
            xx: self.xx * xx + self.xy * yx,
            yx: self.yx * xx + self.yy * yx,
            xy: self.xx * xy + self.xy * yy,
            yy: self.yx * xy + self.yy * yy,
            dx: delta.x,
            dy: delta.y,
        }
    }
}
