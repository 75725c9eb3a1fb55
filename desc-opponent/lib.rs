use desc_core::{ColorImage, DescError, DescResult, Image};
use rayon::prelude::*;

/// The three opponent color planes of an image, each row-major 8-bit
#[derive(Debug, Clone, PartialEq)]
pub struct OpponentChannels {
    pub width: usize,
    pub height: usize,
    /// Red-green: (R - G + 255) / 2
    pub o1: Image,
    /// Yellow-blue: (R + G - 2B + 510) / 4
    pub o2: Image,
    /// Intensity: (R + G + B) / 3
    pub o3: Image,
}

impl OpponentChannels {
    /// Plane by index (0, 1 or 2)
    pub fn channel(&self, index: usize) -> Option<&Image> {
        match index {
            0 => Some(&self.o1),
            1 => Some(&self.o2),
            2 => Some(&self.o3),
            _ => None,
        }
    }

    pub fn into_channels(self) -> [Image; 3] {
        [self.o1, self.o2, self.o3]
    }
}

/// Opponent color transform of a single pixel, floor-rounded and saturated
#[inline]
pub fn opponent_pixel(r: u8, g: u8, b: u8) -> [u8; 3] {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    // Every numerator is non-negative, so integer division floors
    let o1 = (r - g + 255) / 2;
    let o2 = (r + g - 2 * b + 510) / 4;
    let o3 = (r + g + b) / 3;
    [saturate(o1), saturate(o2), saturate(o3)]
}

#[inline]
fn saturate(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Splits a 3-channel image into opponent color planes.
///
/// The channel order stored in the image decides which byte is red, green
/// and blue. Rows are converted in parallel.
pub fn convert_to_opponent(img: &ColorImage) -> DescResult<OpponentChannels> {
    if img.channels() != 3 {
        return Err(DescError::InvalidInput(format!(
            "opponent conversion needs a 3-channel 8-bit image, got {} channels",
            img.channels()
        )));
    }

    let (w, h) = (img.width(), img.height());
    let (ri, gi, bi) = img.order().rgb_offsets();
    let mut o1 = vec![0u8; w * h];
    let mut o2 = vec![0u8; w * h];
    let mut o3 = vec![0u8; w * h];

    if w > 0 && h > 0 {
        img.as_raw()
            .par_chunks_exact(w * 3)
            .zip(o1.par_chunks_exact_mut(w))
            .zip(o2.par_chunks_exact_mut(w))
            .zip(o3.par_chunks_exact_mut(w))
            .for_each(|(((src, d1), d2), d3)| {
                for (x, px) in src.chunks_exact(3).enumerate() {
                    let [a, b, c] = opponent_pixel(px[ri], px[gi], px[bi]);
                    d1[x] = a;
                    d2[x] = b;
                    d3[x] = c;
                }
            });
    }

    Ok(OpponentChannels { width: w, height: h, o1, o2, o3 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use desc_core::ChannelOrder;
    use proptest::prelude::*;

    #[test]
    fn test_pure_red_pixel() {
        assert_eq!(opponent_pixel(255, 0, 0), [255, 191, 85]);
    }

    #[test]
    fn test_reference_pixels() {
        assert_eq!(opponent_pixel(0, 0, 0), [127, 127, 0]);
        assert_eq!(opponent_pixel(255, 255, 255), [127, 127, 255]);
        assert_eq!(opponent_pixel(0, 255, 0), [0, 191, 85]);
        assert_eq!(opponent_pixel(0, 0, 255), [127, 0, 85]);
    }

    #[test]
    fn test_bgr_image_conversion() {
        // Pure red in BGR order
        let img = ColorImage::filled(3, 2, ChannelOrder::Bgr, [0, 0, 255]);
        let out = convert_to_opponent(&img).unwrap();
        assert_eq!((out.width, out.height), (3, 2));
        assert!(out.o1.iter().all(|&v| v == 255));
        assert!(out.o2.iter().all(|&v| v == 191));
        assert!(out.o3.iter().all(|&v| v == 85));
    }

    #[test]
    fn test_channel_order_respected() {
        let bgr = ColorImage::filled(2, 2, ChannelOrder::Bgr, [10, 20, 30]);
        let rgb = ColorImage::filled(2, 2, ChannelOrder::Rgb, [30, 20, 10]);
        assert_eq!(convert_to_opponent(&bgr).unwrap(), convert_to_opponent(&rgb).unwrap());
    }

    #[test]
    fn test_non_three_channel_rejected() {
        let gray = ColorImage::new(4, 4, 1, ChannelOrder::Bgr, vec![0; 16]).unwrap();
        assert!(matches!(convert_to_opponent(&gray), Err(DescError::InvalidInput(_))));

        let rgba = ColorImage::new(2, 2, 4, ChannelOrder::Rgb, vec![0; 16]).unwrap();
        assert!(matches!(convert_to_opponent(&rgba), Err(DescError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_image() {
        let img = ColorImage::new(0, 0, 3, ChannelOrder::Bgr, Vec::new()).unwrap();
        let out = convert_to_opponent(&img).unwrap();
        assert!(out.o1.is_empty() && out.o2.is_empty() && out.o3.is_empty());
    }

    #[test]
    fn test_channel_access() {
        let out = convert_to_opponent(&ColorImage::filled(1, 1, ChannelOrder::Rgb, [255, 0, 0])).unwrap();
        assert_eq!(out.channel(1), Some(&vec![191]));
        assert_eq!(out.channel(3), None);
        let [a, _, c] = out.into_channels();
        assert_eq!((a[0], c[0]), (255, 85));
    }

    proptest! {
        #[test]
        fn prop_pixel_matches_formulas(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let [o1, o2, o3] = opponent_pixel(r, g, b);
            let (rf, gf, bf) = (r as f64, g as f64, b as f64);
            prop_assert_eq!(o1 as f64, ((rf - gf + 255.0) / 2.0).floor().clamp(0.0, 255.0));
            prop_assert_eq!(o2 as f64, ((rf + gf - 2.0 * bf + 510.0) / 4.0).floor().clamp(0.0, 255.0));
            prop_assert_eq!(o3 as f64, ((rf + gf + bf) / 3.0).floor().clamp(0.0, 255.0));
        }

        #[test]
        fn prop_image_matches_pixelwise(
            (w, h, data) in (1usize..9, 1usize..9)
                .prop_flat_map(|(w, h)| (Just(w), Just(h), prop::collection::vec(any::<u8>(), w * h * 3)))
        ) {
            let img = ColorImage::new(w, h, 3, ChannelOrder::Bgr, data.clone()).unwrap();
            let out = convert_to_opponent(&img).unwrap();
            for (i, px) in data.chunks_exact(3).enumerate() {
                let expected = opponent_pixel(px[2], px[1], px[0]);
                prop_assert_eq!([out.o1[i], out.o2[i], out.o3[i]], expected);
            }
        }
    }
}
