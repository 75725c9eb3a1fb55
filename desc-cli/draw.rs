use desc_core::Keypoint;
use desc_eval::{Verdict, VerifiedMatch};
use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};

const KEYPOINT_COLOR: Rgb<u8> = Rgb([255, 200, 0]);
const CORRECT_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const INCORRECT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Places `a` and `b` side by side, circles every keypoint and joins the given matches.
///
/// Keypoints of `b` are shifted right by the width of `a`. Correct matches are
/// green, incorrect ones red; out-of-bounds matches are not drawn.
pub fn draw_matches(
    a: &RgbImage,
    b: &RgbImage,
    kps_a: &[Keypoint],
    kps_b: &[Keypoint],
    matches: &[&VerifiedMatch],
) -> RgbImage {
    let offset = a.width() as f32;
    let mut canvas = RgbImage::new(a.width() + b.width(), a.height().max(b.height()));
    imageops::replace(&mut canvas, a, 0, 0);
    imageops::replace(&mut canvas, b, a.width() as i64, 0);

    for kp in kps_a {
        draw_keypoint(&mut canvas, kp, 0.0);
    }
    for kp in kps_b {
        draw_keypoint(&mut canvas, kp, offset);
    }

    for m in matches {
        let (Some(p), Some(q)) = (kps_a.get(m.matched.query_idx), kps_b.get(m.matched.train_idx)) else {
            continue;
        };
        let color = match m.verdict {
            Verdict::Correct => CORRECT_COLOR,
            Verdict::Incorrect => INCORRECT_COLOR,
            Verdict::OutOfBounds => continue,
        };
        draw_line_segment_mut(&mut canvas, (p.x, p.y), (q.x + offset, q.y), color);
    }

    canvas
}

fn draw_keypoint(canvas: &mut RgbImage, kp: &Keypoint, offset: f32) {
    let radius = (kp.size / 2.0).round().max(1.0) as i32;
    draw_hollow_circle_mut(
        canvas,
        ((kp.x + offset).round() as i32, kp.y.round() as i32),
        radius,
        KEYPOINT_COLOR,
    );
}
