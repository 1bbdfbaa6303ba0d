use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};

/// Length of each axis when an axis is given only as a cell count.
pub const UNIT_DIMENSIONS: [f64; 3] = [1.0, 1.0, 1.0];

/// One piece of a padded tensor description
///
/// Deserialises from a bare number, a `[width, count]` pair or a
/// `[width, count, factor]` triple.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Segment {
    /// A single cell of the given width
    Width(f64),
    /// `count` cells of equal width
    Uniform(f64, usize),
    /// `count` cells growing geometrically: `width·|factor|^k` for k = 1..=count.
    /// A negative factor reverses the run so it grows towards the low end.
    Padding(f64, usize, f64),
}

impl Segment {
    fn expand_into(&self, out: &mut Vec<f64>) {
        match *self {
            Segment::Width(h) => out.push(h),
            Segment::Uniform(h, n) => out.extend(std::iter::repeat(h).take(n)),
            Segment::Padding(h, n, factor) => {
                let growth = factor.abs();
                let start = out.len();
                let mut width = h;
                for _ in 0..n {
                    width *= growth;
                    out.push(width);
                }
                if factor < 0.0 {
                    out[start..].reverse();
                }
            }
        }
    }
}

/// Expand a padded tensor description into cell widths.
///
/// ```
/// use tensor_mesh::{mesh_tensor, Segment};
/// let h = mesh_tensor(&[Segment::Padding(10.0, 2, -2.0), Segment::Uniform(10.0, 3)]);
/// assert_eq!(h, vec![40.0, 20.0, 10.0, 10.0, 10.0]);
/// ```
pub fn mesh_tensor(segments: &[Segment]) -> Vec<f64> {
    let mut widths = Vec::new();
    for segment in segments {
        segment.expand_into(&mut widths);
    }
    widths
}

/// Width specification for a single axis
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AxisSpec {
    /// `n` equal cells spanning the unit length of the axis
    Count(usize),
    /// Explicit cell widths
    Widths(Vec<f64>),
    /// Padded tensor description, see [`mesh_tensor`]
    Padded(Vec<Segment>),
}

impl AxisSpec {
    /// Reduce the specification to cell widths along `axis`.
    pub fn widths(&self, axis: usize) -> Result<Vec<f64>> {
        let widths = match self {
            AxisSpec::Count(n) => {
                if *n == 0 {
                    return Err(MeshError::InvalidWidths {
                        axis,
                        reason: "cell count must be at least 1".to_string(),
                    });
                }
                let length = UNIT_DIMENSIONS[axis.min(2)];
                vec![length / *n as f64; *n]
            }
            AxisSpec::Widths(h) => h.clone(),
            AxisSpec::Padded(segments) => mesh_tensor(segments),
        };

        if widths.is_empty() {
            return Err(MeshError::InvalidWidths {
                axis,
                reason: "no cells".to_string(),
            });
        }
        if let Some(bad) = widths.iter().find(|w| !(w.is_finite() && **w > 0.0)) {
            return Err(MeshError::InvalidWidths {
                axis,
                reason: format!("width {} is not strictly positive", bad),
            });
        }
        Ok(widths)
    }
}

impl From<usize> for AxisSpec {
    fn from(n: usize) -> Self {
        AxisSpec::Count(n)
    }
}

impl From<Vec<f64>> for AxisSpec {
    fn from(h: Vec<f64>) -> Self {
        AxisSpec::Widths(h)
    }
}

impl From<&[f64]> for AxisSpec {
    fn from(h: &[f64]) -> Self {
        AxisSpec::Widths(h.to_vec())
    }
}

impl From<Vec<Segment>> for AxisSpec {
    fn from(segments: Vec<Segment>) -> Self {
        AxisSpec::Padded(segments)
    }
}

/// Origin anchor for one axis
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "OriginRepr", into = "OriginRepr")]
pub enum Origin {
    /// Used verbatim as the first node coordinate
    Value(f64),
    /// `"0"`: first node at 0
    Zero,
    /// `"C"`: axis centred on 0
    Center,
    /// `"N"`: last node at 0
    Negative,
}

impl Origin {
    /// Resolve the anchor to the first node coordinate of an axis.
    pub fn resolve(&self, widths: &[f64]) -> f64 {
        let length: f64 = widths.iter().sum();
        match *self {
            Origin::Value(x) => x,
            Origin::Zero => 0.0,
            Origin::Center => -0.5 * length,
            Origin::Negative => -length,
        }
    }

    /// Parse `"0"`, `"C"`, `"N"` or a finite number
    fn parse(code: &str) -> Option<Self> {
        match code.trim() {
            "0" => Some(Origin::Zero),
            "C" => Some(Origin::Center),
            "N" => Some(Origin::Negative),
            other => other
                .parse::<f64>()
                .ok()
                .filter(|x| x.is_finite())
                .map(Origin::Value),
        }
    }

    fn parse_code(axis: usize, code: &str) -> Result<Self> {
        Origin::parse(code).ok_or_else(|| MeshError::OriginCode {
            axis,
            code: code.to_string(),
        })
    }
}

impl FromStr for Origin {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self> {
        Origin::parse(s).ok_or_else(|| MeshError::InvalidOrigin(s.to_string()))
    }
}

impl From<f64> for Origin {
    fn from(x: f64) -> Self {
        Origin::Value(x)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Value(x) => write!(f, "{}", x),
            Origin::Zero => write!(f, "0"),
            Origin::Center => write!(f, "C"),
            Origin::Negative => write!(f, "N"),
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum OriginRepr {
    Value(f64),
    Code(String),
}

impl TryFrom<OriginRepr> for Origin {
    type Error = MeshError;

    fn try_from(repr: OriginRepr) -> Result<Self> {
        match repr {
            OriginRepr::Value(x) if x.is_finite() => Ok(Origin::Value(x)),
            OriginRepr::Value(x) => Err(MeshError::InvalidOrigin(x.to_string())),
            OriginRepr::Code(code) => code.parse(),
        }
    }
}

impl From<Origin> for OriginRepr {
    fn from(origin: Origin) -> Self {
        match origin {
            Origin::Value(x) => OriginRepr::Value(x),
            code => OriginRepr::Code(code.to_string()),
        }
    }
}

/// Canonical per-axis widths and origin of a tensor mesh
#[derive(Debug, Clone, PartialEq)]
pub struct TensorSpec {
    pub h: Vec<Vec<f64>>,
    pub x0: Vec<f64>,
}

impl TensorSpec {
    /// Validate and normalise a width specification and optional origin.
    ///
    /// # Arguments
    /// * `h_in` - One width specification per axis (1 to 3 axes)
    /// * `x0_in` - Optional origin anchor per axis; defaults to 0 on every axis
    pub fn new(h_in: &[AxisSpec], x0_in: Option<&[Origin]>) -> Result<Self> {
        if !(1..=3).contains(&h_in.len()) {
            return Err(MeshError::Dimension(h_in.len()));
        }

        let h = h_in
            .iter()
            .enumerate()
            .map(|(axis, spec)| spec.widths(axis))
            .collect::<Result<Vec<_>>>()?;

        let x0 = match x0_in {
            None => vec![0.0; h.len()],
            Some(origins) => {
                if origins.len() != h.len() {
                    return Err(MeshError::OriginLength {
                        expected: h.len(),
                        got: origins.len(),
                    });
                }
                origins
                    .iter()
                    .zip(&h)
                    .enumerate()
                    .map(|(axis, (origin, widths))| {
                        let x0 = origin.resolve(widths);
                        if x0.is_finite() {
                            Ok(x0)
                        } else {
                            Err(MeshError::OriginCode {
                                axis,
                                code: origin.to_string(),
                            })
                        }
                    })
                    .collect::<Result<Vec<_>>>()?
            }
        };

        Ok(Self { h, x0 })
    }

    /// Like [`TensorSpec::new`] but with origin codes given as strings
    /// (`"0"`, `"C"`, `"N"` or a number).
    pub fn with_origin_codes(h_in: &[AxisSpec], codes: &[&str]) -> Result<Self> {
        let origins = codes
            .iter()
            .enumerate()
            .map(|(axis, code)| Origin::parse_code(axis, code))
            .collect::<Result<Vec<_>>>()?;
        Self::new(h_in, Some(&origins))
    }

    pub fn dim(&self) -> usize {
        self.h.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_count_spans_unit_length() {
        let spec = TensorSpec::new(&[AxisSpec::Count(4)], None).unwrap();
        assert_eq!(spec.h[0], vec![0.25; 4]);
        assert_eq!(spec.x0, vec![0.0]);
    }

    #[test]
    fn test_padding_expansion() {
        let h = mesh_tensor(&[
            Segment::Padding(10.0, 3, -1.5),
            Segment::Uniform(10.0, 2),
            Segment::Width(5.0),
            Segment::Padding(10.0, 2, 2.0),
        ]);
        let expected = [33.75, 22.5, 15.0, 10.0, 10.0, 5.0, 20.0, 40.0];
        assert_eq!(h.len(), expected.len());
        for (a, b) in h.iter().zip(expected.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_origin_codes() {
        let h = vec![AxisSpec::Widths(vec![1.0, 2.0, 3.0]); 3];
        let spec = TensorSpec::with_origin_codes(&h, &["0", "C", "N"]).unwrap();
        assert_eq!(spec.x0, vec![0.0, -3.0, -6.0]);

        let spec = TensorSpec::with_origin_codes(&h[..1], &["-2.5"]).unwrap();
        assert_eq!(spec.x0, vec![-2.5]);
    }

    #[test]
    fn test_construction_errors() {
        assert!(matches!(TensorSpec::new(&[], None), Err(MeshError::Dimension(0))));

        let four = vec![AxisSpec::Count(2); 4];
        assert!(matches!(TensorSpec::new(&four, None), Err(MeshError::Dimension(4))));

        let bad = [AxisSpec::Widths(vec![1.0, 0.0])];
        assert!(matches!(
            TensorSpec::new(&bad, None),
            Err(MeshError::InvalidWidths { axis: 0, .. })
        ));

        let empty = [AxisSpec::Count(2), AxisSpec::Widths(vec![])];
        assert!(matches!(
            TensorSpec::new(&empty, None),
            Err(MeshError::InvalidWidths { axis: 1, .. })
        ));

        let two = [AxisSpec::Count(2), AxisSpec::Count(2)];
        assert!(matches!(
            TensorSpec::new(&two, Some(&[Origin::Zero])),
            Err(MeshError::OriginLength { expected: 2, got: 1 })
        ));

        assert!(matches!(
            TensorSpec::with_origin_codes(&two, &["C", "X"]),
            Err(MeshError::OriginCode { axis: 1, .. })
        ));
    }

    #[test]
    fn test_non_finite_origins_rejected() {
        let h = [AxisSpec::Count(2)];
        for code in ["inf", "-inf", "nan", "NaN"] {
            assert!(matches!(
                TensorSpec::with_origin_codes(&h, &[code]),
                Err(MeshError::OriginCode { axis: 0, .. })
            ));
            assert!(matches!(code.parse::<Origin>(), Err(MeshError::InvalidOrigin(_))));
        }

        let three = [AxisSpec::Count(2), AxisSpec::Count(2), AxisSpec::Count(2)];
        for bad in [f64::NAN, f64::INFINITY] {
            let x0 = [Origin::Zero, Origin::Center, Origin::Value(bad)];
            assert!(matches!(
                TensorSpec::new(&three, Some(&x0)),
                Err(MeshError::OriginCode { axis: 2, .. })
            ));
        }
    }

    #[test]
    fn test_origin_parse_error_has_no_axis() {
        let err = "X".parse::<Origin>().unwrap_err();
        assert!(matches!(&err, MeshError::InvalidOrigin(code) if code == "X"));
        assert!(!err.to_string().contains("x0["));
    }
}
