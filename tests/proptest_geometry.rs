use labelscope::figure::histogram;
use labelscope::geometry::NormalizedBox;
use labelscope::summary::Describe;
use proptest::prelude::*;

mod proptest_helpers;

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn pixel_rect_spans_scaled_box_size(
        x in proptest_helpers::arb_unit(),
        y in proptest_helpers::arb_unit(),
        w in proptest_helpers::arb_unit(),
        h in proptest_helpers::arb_unit(),
        image_w in proptest_helpers::arb_image_side(),
        image_h in proptest_helpers::arb_image_side(),
    ) {
        let (iw, ih) = (f64::from(image_w), f64::from(image_h));
        let rect = NormalizedBox::new(x, y, w, h).to_pixel(iw, ih);
        let eps = iw.max(ih) * 1e-9;

        prop_assert!((rect.width() - w * iw).abs() <= eps);
        prop_assert!((rect.height() - h * ih).abs() <= eps);
        prop_assert!(((rect.x0 + rect.x1) / 2.0 - x * iw).abs() <= eps);
        prop_assert!(((rect.y0 + rect.y1) / 2.0 - y * ih).abs() <= eps);
    }

    #[test]
    fn histogram_counts_every_sample(
        samples in proptest_helpers::arb_samples(200),
        bins in 1usize..=64,
    ) {
        let hist = histogram(&samples, bins);
        prop_assert_eq!(hist.len(), bins);
        prop_assert_eq!(hist.iter().map(|b| b.count).sum::<usize>(), samples.len());
        for pair in hist.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
        }
    }

    #[test]
    fn describe_quantiles_are_ordered(samples in proptest_helpers::arb_samples(100)) {
        let d = Describe::from_samples(&samples).expect("non-empty samples");
        prop_assert_eq!(d.count, samples.len());
        prop_assert!(d.min <= d.q25);
        prop_assert!(d.q25 <= d.median);
        prop_assert!(d.median <= d.q75);
        prop_assert!(d.q75 <= d.max);
        prop_assert!(d.min <= d.mean + 1e-6 && d.mean <= d.max + 1e-6);
        prop_assert_eq!(d.std.is_some(), samples.len() > 1);
    }
}
