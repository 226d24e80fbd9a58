//! Proptest generators for property-based testing.

use proptest::prelude::*;

use crate::dummy::DummyParams;

/// Generate valid dummy driver parameters, starting anywhere in their
/// history.
pub fn dummy_params() -> impl Strategy<Value = DummyParams> {
    (1u32..=5)
        .prop_flat_map(|min| (Just(min), min..=5, 1u32..=3, 1u32..=3, 1u32..=3))
        .prop_flat_map(|(min, max, majors_per_io, step, minors_per_major)| {
            let len = (max - min + 1) * majors_per_io * minors_per_major;
            (
                Just((min, max, majors_per_io, step, minors_per_major)),
                0..len,
            )
        })
        .prop_map(
            |((min_io_major, max_io_major, majors_per_io, major_step, minors_per_major), pos)| {
                DummyParams {
                    min_io_major,
                    max_io_major,
                    majors_per_io,
                    major_step,
                    major: pos / minors_per_major * major_step,
                    minor: pos % minors_per_major,
                    minors_per_major,
                }
            },
        )
}

/// Generate between one and `max_drivers` dummy driver parameter sets.
pub fn dummy_params_list(max_drivers: usize) -> impl Strategy<Value = Vec<DummyParams>> {
    prop::collection::vec(dummy_params(), 1..=max_drivers.max(1))
}

/// Render dummy parameter sets as a mux configuration string.
pub fn dummy_config(params: &[DummyParams]) -> String {
    params
        .iter()
        .map(|p| format!("dummy:{}", p))
        .collect::<Vec<_>>()
        .join(" ")
}

impl Arbitrary for DummyParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        dummy_params().boxed()
    }
}
