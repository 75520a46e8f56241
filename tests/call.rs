use kaze_mex::{
    call, DescriptorMatrix, Error, FeatureExtractor, GrayFloatImage, HostValue, KazeOptions,
    KeyPoint,
};
use ndarray::{arr2, Array2};

/// Deterministic stand-in for the real pipeline: hands back a fixed
/// keypoint list and descriptor matrix, recording what it was asked.
struct FakeExtractor {
    keypoints: Vec<KeyPoint>,
    descriptors: DescriptorMatrix,
    detect_calls: usize,
    describe_calls: usize,
    described_points: Vec<(f32, f32)>,
    seen_options: Option<KazeOptions>,
    seen_dimensions: Option<(usize, usize)>,
}

impl FakeExtractor {
    fn new(keypoints: Vec<KeyPoint>, descriptors: DescriptorMatrix) -> Self {
        Self {
            keypoints,
            descriptors,
            detect_calls: 0,
            describe_calls: 0,
            described_points: Vec::new(),
            seen_options: None,
            seen_dimensions: None,
        }
    }
}

impl FeatureExtractor for FakeExtractor {
    fn detect(&mut self, image: &GrayFloatImage, options: &KazeOptions) -> Vec<KeyPoint> {
        self.detect_calls += 1;
        self.seen_options = Some(*options);
        self.seen_dimensions = Some((image.width(), image.height()));
        self.keypoints.clone()
    }

    fn describe(&mut self, keypoints: &[KeyPoint], _options: &KazeOptions) -> DescriptorMatrix {
        self.describe_calls += 1;
        self.described_points = keypoints.iter().map(|kp| kp.point).collect();
        self.descriptors.clone()
    }
}

fn keypoint(x: f32, y: f32) -> KeyPoint {
    KeyPoint {
        point: (x, y),
        response: 0.002,
        size: 4.8,
        octave: 0,
        class_id: 0,
        angle: 0.0,
    }
}

fn image_arg(rows: usize, columns: usize) -> HostValue {
    HostValue::Uint8(Array2::zeros((rows, columns)))
}

fn pair(name: &str, value: f64) -> [HostValue; 2] {
    [HostValue::text(name), HostValue::Scalar(value)]
}

#[test]
fn no_arguments_prints_usage_and_returns_nothing() {
    let mut extractor = FakeExtractor::new(vec![], DescriptorMatrix::Uint8(Array2::zeros((0, 64))));
    let outputs = call(&mut extractor, &[], 2).unwrap();
    assert!(outputs.is_empty());
    assert_eq!(extractor.detect_calls, 0);
}

#[test]
fn non_uint8_image_is_rejected_before_anything_runs() {
    let mut extractor = FakeExtractor::new(vec![], DescriptorMatrix::Uint8(Array2::zeros((0, 64))));
    let args = [HostValue::Double(Array2::zeros((10, 10)))];
    assert_eq!(call(&mut extractor, &args, 1), Err(Error::NotUint8));
    assert_eq!(extractor.detect_calls, 0);
}

#[test]
fn unpaired_trailing_argument_is_an_arity_error() {
    let mut extractor = FakeExtractor::new(vec![], DescriptorMatrix::Uint8(Array2::zeros((0, 64))));
    // image + ["soffset", 2.0, dangling] -> even total count
    let args = [
        image_arg(10, 10),
        HostValue::text("soffset"),
        HostValue::Scalar(2.0),
        HostValue::text("verbose"),
    ];
    assert_eq!(call(&mut extractor, &args, 1), Err(Error::BadArgNum));
    assert_eq!(extractor.detect_calls, 0);
}

#[test]
fn single_pair_name_without_value_is_an_arity_error() {
    let mut extractor = FakeExtractor::new(vec![], DescriptorMatrix::Uint8(Array2::zeros((0, 64))));
    let args = [image_arg(10, 10), HostValue::text("soffset")];
    assert_eq!(call(&mut extractor, &args, 1), Err(Error::BadArgNum));
}

#[test]
fn unknown_parameter_name_is_cited() {
    let mut extractor = FakeExtractor::new(vec![], DescriptorMatrix::Uint8(Array2::zeros((0, 64))));
    let args: Vec<HostValue> = std::iter::once(image_arg(10, 10))
        .chain(pair("omax", 4.0))
        .chain(pair("bogus", 1.0))
        .collect();
    assert_eq!(
        call(&mut extractor, &args, 1),
        Err(Error::BadParamName("bogus".to_string()))
    );
    assert_eq!(extractor.detect_calls, 0);
}

#[test]
fn non_numeric_pair_value_is_a_type_error() {
    let mut extractor = FakeExtractor::new(vec![], DescriptorMatrix::Uint8(Array2::zeros((0, 64))));
    let args = [
        image_arg(10, 10),
        HostValue::text("soffset"),
        HostValue::text("big"),
    ];
    assert_eq!(call(&mut extractor, &args, 1), Err(Error::BadParamType));
}

#[test]
fn flat_field_image_with_no_pairs_yields_a_coordinate_matrix() {
    let mut extractor = FakeExtractor::new(vec![], DescriptorMatrix::Uint8(Array2::zeros((0, 64))));
    let outputs = call(&mut extractor, &[image_arg(100, 50)], 1).unwrap();
    assert_eq!(outputs.len(), 1);
    let HostValue::Double(m) = &outputs[0] else {
        panic!("keypoints must come back as a double matrix");
    };
    assert_eq!(m.dim(), (0, 2));
    // Transposition contract: the pipeline saw width 100, height 50.
    assert_eq!(extractor.seen_dimensions, Some((100, 50)));
    let options = extractor.seen_options.unwrap();
    assert_eq!(options.image_width, 100);
    assert_eq!(options.image_height, 50);
}

#[test]
fn coordinates_round_trip_to_the_host_frame() {
    let mut extractor = FakeExtractor::new(
        vec![keypoint(3.0, 7.0), keypoint(42.5, 11.25)],
        DescriptorMatrix::Float32(Array2::zeros((2, 64))),
    );
    let outputs = call(&mut extractor, &[image_arg(64, 48)], 1).unwrap();
    let HostValue::Double(m) = &outputs[0] else {
        panic!("keypoints must come back as a double matrix");
    };
    assert_eq!(m.dim(), (2, 2));
    assert_eq!(m[[0, 0]], 7.0);
    assert_eq!(m[[0, 1]], 3.0);
    assert_eq!(m[[1, 0]], 11.25);
    assert_eq!(m[[1, 1]], 42.5);
}

#[test]
fn detection_runs_even_when_no_outputs_are_requested() {
    let mut extractor = FakeExtractor::new(
        vec![keypoint(1.0, 2.0)],
        DescriptorMatrix::Float32(Array2::zeros((1, 64))),
    );
    let outputs = call(&mut extractor, &[image_arg(16, 16)], 0).unwrap();
    assert!(outputs.is_empty());
    assert_eq!(extractor.detect_calls, 1);
    assert_eq!(extractor.describe_calls, 0);
}

#[test]
fn description_only_runs_for_the_second_output() {
    let mut extractor = FakeExtractor::new(
        vec![keypoint(1.0, 2.0)],
        DescriptorMatrix::Float32(Array2::zeros((1, 64))),
    );
    call(&mut extractor, &[image_arg(16, 16)], 1).unwrap();
    assert_eq!(extractor.describe_calls, 0);

    call(&mut extractor, &[image_arg(16, 16)], 2).unwrap();
    assert_eq!(extractor.describe_calls, 1);
}

#[test]
fn describe_sees_the_detected_keypoints_in_order() {
    let detected = vec![keypoint(5.0, 6.0), keypoint(7.0, 8.0), keypoint(9.0, 10.0)];
    let mut extractor = FakeExtractor::new(
        detected.clone(),
        DescriptorMatrix::Float32(Array2::zeros((3, 64))),
    );
    call(&mut extractor, &[image_arg(32, 32)], 2).unwrap();
    let expected: Vec<(f32, f32)> = detected.iter().map(|kp| kp.point).collect();
    assert_eq!(extractor.described_points, expected);
}

#[test]
fn float_descriptors_come_back_as_single_with_full_shape() {
    let descriptors = Array2::from_shape_fn((3, 128), |(r, c)| (r * 128 + c) as f32);
    let mut extractor = FakeExtractor::new(
        vec![keypoint(1.0, 1.0), keypoint(2.0, 2.0), keypoint(3.0, 3.0)],
        DescriptorMatrix::Float32(descriptors.clone()),
    );
    let outputs = call(&mut extractor, &[image_arg(32, 32)], 2).unwrap();
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[1], HostValue::Single(descriptors));
}

#[test]
fn uint8_descriptors_come_back_as_uint8_with_full_shape() {
    let descriptors = arr2(&[[1u8, 2, 3, 4], [5, 6, 7, 8]]);
    let mut extractor = FakeExtractor::new(
        vec![keypoint(1.0, 1.0), keypoint(2.0, 2.0)],
        DescriptorMatrix::Uint8(descriptors.clone()),
    );
    let outputs = call(&mut extractor, &[image_arg(32, 32)], 2).unwrap();
    assert_eq!(outputs[1], HostValue::Uint8(descriptors));
}

#[test]
fn unencodable_descriptor_type_is_fatal_with_no_outputs() {
    let mut extractor = FakeExtractor::new(
        vec![keypoint(1.0, 1.0)],
        DescriptorMatrix::Float64(Array2::zeros((1, 64))),
    );
    assert_eq!(
        call(&mut extractor, &[image_arg(32, 32)], 2),
        Err(Error::UnknownDescriptorType)
    );
}

#[test]
fn parsed_options_reach_the_extractor() {
    let _ = pretty_env_logger::try_init();
    let mut extractor = FakeExtractor::new(
        vec![keypoint(1.0, 1.0)],
        DescriptorMatrix::Float32(Array2::zeros((1, 64))),
    );
    let args: Vec<HostValue> = std::iter::once(image_arg(24, 24))
        .chain(pair("dthreshold", 0.01))
        .chain(pair("descriptor", 3.0))
        .chain(pair("verbose", 1.0))
        .collect();
    call(&mut extractor, &args, 2).unwrap();
    let options = extractor.seen_options.unwrap();
    assert_eq!(options.detector_threshold, 0.01);
    assert_eq!(options.descriptor, kaze_mex::DescriptorKind::SurfExtended);
    assert!(options.verbose);
}

#[test]
fn error_identifiers_are_stable() {
    assert_eq!(Error::NotUint8.identifier(), "kaze:notUint8");
    assert_eq!(Error::BadArgNum.identifier(), "kaze:badArgNum");
    assert_eq!(Error::BadParamType.identifier(), "kaze:badParamTypes");
    assert_eq!(
        Error::BadParamName("x".to_string()).identifier(),
        "kaze:badParamName"
    );
    assert_eq!(
        Error::UnknownDescriptorType.identifier(),
        "kaze:unknownDescType"
    );
}
