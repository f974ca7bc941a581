use lenet_rs::backend::spec::{SequentialSpec, SpecSerdeError, SPEC_VERSION};
use lenet_rs::{ImageDataFormat, LeNet};

#[test]
fn sequential_spec_round_trips_through_json() {
    let spec = LeNet::build_with_format(ImageDataFormat::ChannelsFirst, 32, 32, 3, 100);

    let json = spec.to_json().expect("spec serializes");
    let restored = SequentialSpec::from_json(&json).expect("spec deserializes");

    assert_eq!(restored, spec);
    assert_eq!(restored.spec_version(), SPEC_VERSION);
}

#[test]
fn mismatched_spec_version_is_rejected() {
    let spec = LeNet::build_with_format(ImageDataFormat::ChannelsLast, 28, 28, 1, 10);
    let json = spec.to_json().expect("spec serializes");

    let mut value: serde_json::Value = serde_json::from_str(&json).expect("json parses");
    value["spec_version"] = serde_json::Value::String("seqspec.v9.9".to_string());

    let err = SequentialSpec::from_json(&value.to_string())
        .expect_err("stale spec version is rejected");
    match err {
        SpecSerdeError::SpecVersionMismatch { found, expected } => {
            assert_eq!(found, "seqspec.v9.9");
            assert_eq!(expected, SPEC_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}
