use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    #[error(
        "Invalid curve parameters: width={width}, height={height}, segments={segments} \
         (width and height must be finite and positive, segments at least 1)"
    )]
    InvalidCurveParameters {
        width: f32,
        height: f32,
        segments: usize,
    },
}
