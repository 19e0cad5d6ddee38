//! Per-pixel majority voting across independent segmentation results.

use image::{Rgba, RgbaImage};

use crate::error::{Error, Result};

/// Merge segmentation results by strict per-pixel majority vote.
///
/// A pixel is foreground in the merged image only when strictly more than half
/// of the inputs kept it (alpha above zero there). Each RGBA channel of a
/// foreground pixel is the integer-truncated average over exactly the inputs
/// that voted for it; everything else becomes fully transparent `(0,0,0,0)`.
/// A pixel nobody kept is simply transparent, not an error.
///
/// # Errors
///
/// Returns [`Error::EmptyConsensus`] when `results` is empty and
/// [`Error::DimensionMismatch`] when the inputs disagree on dimensions.
pub fn majority_merge(results: &[RgbaImage]) -> Result<RgbaImage> {
    let first = results.first().ok_or(Error::EmptyConsensus)?;
    let (width, height) = first.dimensions();
    for candidate in results {
        if candidate.dimensions() != (width, height) {
            return Err(Error::DimensionMismatch {
                expected_width: width,
                expected_height: height,
                width: candidate.width(),
                height: candidate.height(),
            });
        }
    }

    let majority = results.len() / 2;
    let mut out = RgbaImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mut votes = 0u32;
            let mut sums = [0u32; 4];
            for result in results {
                let px = result.get_pixel(x, y);
                if px[3] > 0 {
                    votes += 1;
                    for (sum, &channel) in sums.iter_mut().zip(px.0.iter()) {
                        *sum += u32::from(channel);
                    }
                }
            }

            if votes as usize > majority {
                #[allow(clippy::cast_possible_truncation)]
                let merged = [
                    (sums[0] / votes) as u8,
                    (sums[1] / votes) as u8,
                    (sums[2] / votes) as u8,
                    (sums[3] / votes) as u8,
                ];
                out.put_pixel(x, y, Rgba(merged));
            } else {
                out.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_of(pixels: &[[u8; 4]]) -> RgbaImage {
        #[allow(clippy::cast_possible_truncation)]
        let width = pixels.len() as u32;
        let mut img = RgbaImage::new(width, 1);
        for (x, px) in pixels.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            img.put_pixel(x as u32, 0, Rgba(*px));
        }
        img
    }

    #[test]
    fn two_of_three_votes_win() {
        let a = image_of(&[[100, 0, 0, 255]]);
        let b = image_of(&[[0, 50, 0, 255]]);
        let c = image_of(&[[0, 0, 0, 0]]);
        let merged = majority_merge(&[a, b, c]).unwrap();
        assert_eq!(merged.get_pixel(0, 0), &Rgba([50, 25, 0, 255]));
    }

    #[test]
    fn single_vote_is_discarded() {
        let a = image_of(&[[200, 200, 200, 255]]);
        let b = image_of(&[[0, 0, 0, 0]]);
        let c = image_of(&[[0, 0, 0, 0]]);
        let merged = majority_merge(&[a, b, c]).unwrap();
        assert_eq!(merged.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn averaging_truncates_toward_zero() {
        let a = image_of(&[[3, 0, 0, 255]]);
        let b = image_of(&[[4, 0, 0, 255]]);
        let c = image_of(&[[0, 0, 0, 0]]);
        let merged = majority_merge(&[a, b, c]).unwrap();
        // (3 + 4) / 2 truncates to 3.
        assert_eq!(merged.get_pixel(0, 0)[0], 3);
    }

    #[test]
    fn unanimous_zero_votes_produce_transparent_output() {
        let blank = image_of(&[[0, 0, 0, 0], [0, 0, 0, 0]]);
        let merged =
            majority_merge(&[blank.clone(), blank.clone(), blank]).unwrap();
        assert!(merged.pixels().all(|px| *px == Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn averages_only_the_voting_inputs() {
        let a = image_of(&[[10, 20, 30, 255]]);
        let b = image_of(&[[20, 40, 60, 255]]);
        let c = image_of(&[[90, 90, 90, 255]]);
        let merged = majority_merge(&[a, b, c]).unwrap();
        // All three vote: channel averages run over all of them.
        assert_eq!(merged.get_pixel(0, 0), &Rgba([40, 50, 60, 255]));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(majority_merge(&[]).is_err());
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let a = RgbaImage::new(2, 2);
        let b = RgbaImage::new(2, 3);
        assert!(matches!(
            majority_merge(&[a, b]),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
