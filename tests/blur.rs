use gaussblur::{blur, blur_with, BlurParams, BoundaryPolicy, Kernel, PixelBuffer, MAX_RADIUS};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn uniform(width: usize, height: usize, c: u8) -> PixelBuffer {
    PixelBuffer::from_planes(
        width,
        height,
        255,
        vec![c; width * height],
        vec![c; width * height],
        vec![c; width * height],
    )
    .unwrap()
}

#[test]
fn single_bright_pixel_radius_one() {
    init_logger();
    let mut image = PixelBuffer::new(5, 5, 255);
    image.set_pixel(2, 2, [255, 255, 255]);

    let out = blur(image, 1, 2).unwrap();
    let center = out.pixel(2, 2)[0];
    for (col, row) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
        let v = out.pixel(col, row);
        assert!(v[0] > 0, "neighbour ({col},{row}) is zero");
        assert!(v[0] < center, "neighbour ({col},{row}) not below center");
        assert_eq!(v[0], v[1]);
        assert_eq!(v[1], v[2]);
    }
    for (col, row) in [(0, 0), (4, 0), (0, 4), (4, 4)] {
        assert_eq!(out.pixel(col, row), [0; 3], "corner ({col},{row})");
    }
    assert_eq!(out.pixel(2, 0), [0; 3]);
    assert_eq!(out.pixel(0, 2), [0; 3]);
}

#[test]
fn constant_field_is_preserved() {
    init_logger();
    for c in [0, 1, 77, 128, 254, 255] {
        for radius in [1, 3, 10, 40] {
            let image = uniform(13, 9, c);
            for policy in [BoundaryPolicy::SkipRenormalize, BoundaryPolicy::ClampToEdge] {
                let params = BlurParams::new()
                    .with_radius(radius)
                    .with_threads(3)
                    .with_boundary(policy);
                assert_eq!(
                    blur_with(image.clone(), &params).unwrap(),
                    image,
                    "c={c} radius={radius} {policy}"
                );
            }
        }
    }
}

#[test]
fn more_threads_than_columns_and_rows() {
    init_logger();
    let mut image = PixelBuffer::new(3, 2, 255);
    image.set_pixel(1, 1, [10, 200, 90]);
    let reference = blur(image.clone(), 2, 1).unwrap();
    assert_eq!(blur(image, 2, 8).unwrap(), reference);
}

#[test]
fn absurd_thread_count_is_capped_by_work() {
    init_logger();
    let mut image = PixelBuffer::new(5, 4, 255);
    image.set_pixel(2, 1, [255, 0, 128]);
    let reference = blur(image.clone(), 1, 1).unwrap();
    assert_eq!(blur(image, 1, i64::MAX).unwrap(), reference);
}

#[test]
fn radius_larger_than_image() {
    init_logger();
    let mut image = PixelBuffer::new(4, 3, 255);
    image.set_pixel(0, 0, [255, 0, 0]);
    let out = blur(image, 200, 2).unwrap();
    for row in 0..3 {
        for col in 0..4 {
            assert!(out.pixel(col, row)[0] > 0);
            assert_eq!(out.pixel(col, row)[1], 0);
        }
    }
}

#[test]
fn color_max_is_carried_through() {
    let mut image = PixelBuffer::new(4, 4, 15);
    image.set_pixel(1, 1, [15, 15, 15]);
    let out = blur(image, 2, 2).unwrap();
    assert_eq!(out.color_max(), 15);
    assert!(out.planes().iter().all(|p| p.iter().all(|&v| v <= 15)));
}

#[test]
fn max_radius_is_accepted() {
    let image = uniform(6, 6, 40);
    assert_eq!(blur(image.clone(), MAX_RADIUS as i64, 2).unwrap(), image);
    assert_eq!(Kernel::gaussian(MAX_RADIUS as i64).unwrap().radius(), MAX_RADIUS);
}
