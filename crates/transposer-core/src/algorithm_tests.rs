//! Tests for `algorithm` module

use super::algorithm::*;
use super::layout::{Dimensions, Layout, Transform};

#[test]
fn test_default_is_jki_map() {
    assert_eq!(Algorithm::default(), Algorithm::JkiMap);
}

#[test]
fn test_names_roundtrip_case_insensitively() {
    for algorithm in Algorithm::ALL {
        assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
        assert_eq!(
            algorithm.name().to_uppercase().parse::<Algorithm>().unwrap(),
            algorithm
        );
        assert_eq!(algorithm.to_string(), algorithm.name());
    }
}

#[test]
fn test_unknown_name_is_configuration_error() {
    let err = "blocked".parse::<Algorithm>().unwrap_err();
    assert_eq!(err.code(), "XPOSE-005");
    assert!(err.is_configuration());
    assert_eq!(err.exit_code(), libc::EINVAL);
}

#[test]
fn test_serde_uses_snake_case_names() {
    #[derive(serde::Deserialize)]
    struct Wrapper {
        algorithm: Algorithm,
    }
    let parsed: Wrapper = toml::from_str("algorithm = \"vector_output\"").unwrap();
    assert_eq!(parsed.algorithm, Algorithm::VectorOutput);
}

#[test]
fn test_nesting_only_for_map_algorithms() {
    assert_eq!(Algorithm::IjkMap.nesting(), Some(Layout::Ijk));
    assert_eq!(Algorithm::JkiMap.nesting(), Some(Layout::Jki));
    assert_eq!(Algorithm::JikMap.nesting(), Some(Layout::Jik));
    assert_eq!(Algorithm::VectorInput.nesting(), None);
    assert_eq!(Algorithm::VectorOutput.nesting(), None);
    assert_eq!(Algorithm::Matrix.nesting(), None);
}

#[test]
fn test_scratch_sizes() {
    let dims = Dimensions::new(3, 7, 5).unwrap();
    assert_eq!(Algorithm::JkiMap.scratch_elements(&dims), 0);
    assert_eq!(Algorithm::VectorInput.scratch_elements(&dims), 3);
    assert_eq!(Algorithm::VectorOutput.scratch_elements(&dims), 5);
    assert_eq!(Algorithm::Matrix.scratch_elements(&dims), 30);
}

#[test]
fn test_every_algorithm_supports_default_and_inverse_transform() {
    for algorithm in Algorithm::ALL {
        if algorithm.batching() == Batching::InputVector {
            // The inverse source (JIK) is not contiguous in i.
            assert!(algorithm.check_transform(Transform::JKI_TO_JIK).is_ok());
            assert!(algorithm
                .check_transform(Transform::JKI_TO_JIK.inverse())
                .is_err());
            continue;
        }
        if algorithm.batching() == Batching::OutputVector {
            // The inverse destination (JKI) is not contiguous in k.
            assert!(algorithm.check_transform(Transform::JKI_TO_JIK).is_ok());
            assert!(algorithm
                .check_transform(Transform::JKI_TO_JIK.inverse())
                .is_err());
            continue;
        }
        assert!(algorithm.check_transform(Transform::JKI_TO_JIK).is_ok());
        assert!(algorithm
            .check_transform(Transform::JKI_TO_JIK.inverse())
            .is_ok());
    }
}

#[test]
fn test_matrix_rejects_ijk() {
    let err = Algorithm::Matrix
        .check_transform(Transform::new(Layout::Ijk, Layout::Jik))
        .unwrap_err();
    assert_eq!(err.code(), "XPOSE-007");
    assert!(err.to_string().contains("IJK"));
}

#[test]
fn test_map_algorithms_accept_any_pair() {
    for source in Layout::ALL {
        for destination in Layout::ALL {
            let transform = Transform::new(source, destination);
            assert!(Algorithm::IjkMap.check_transform(transform).is_ok());
            assert!(Algorithm::JkiMap.check_transform(transform).is_ok());
            assert!(Algorithm::JikMap.check_transform(transform).is_ok());
        }
    }
}
