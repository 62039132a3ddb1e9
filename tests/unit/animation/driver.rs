use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn run(seed: u64, ticks: usize, talking: bool) -> Vec<Vec<u32>> {
    let driver = AnimationDriver::default();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pose = PoseState::new();
    (0..ticks)
        .map(|_| {
            driver.tick(&mut pose, talking, &mut rng);
            pose.bit_pattern()
        })
        .collect()
}

#[test]
fn same_seed_gives_identical_sequences() {
    assert_eq!(run(42, 500, true), run(42, 500, true));
    assert_eq!(run(7, 500, false), run(7, 500, false));
    assert_ne!(run(1, 500, true), run(2, 500, true));
}

#[test]
fn blink_rate_converges_to_three_percent() {
    let driver = AnimationDriver::default();
    let mut rng = StdRng::seed_from_u64(0xB11A);
    let mut pose = PoseState::new();
    let n = 100_000;
    let mut blinks = 0u32;
    for _ in 0..n {
        if driver.tick(&mut pose, false, &mut rng).blinked {
            blinks += 1;
            assert_eq!(pose.blendshape(Blendshape::EyeBlinkLeft), 1.0);
            assert_eq!(pose.blendshape(Blendshape::EyeBlinkRight), 1.0);
        } else {
            assert_eq!(pose.blendshape(Blendshape::EyeBlinkLeft), 0.0);
        }
    }
    let rate = f64::from(blinks) / f64::from(n);
    assert!((rate - 0.03).abs() <= 0.005, "rate={rate}");
}

#[test]
fn head_yaw_moves_at_most_eight_thousandths_per_tick() {
    let driver = AnimationDriver::default();
    let mut rng = StdRng::seed_from_u64(9);
    let mut pose = PoseState::new();
    pose.set_bone_axis(Bone::Head, Axis::Y, 0.5);
    for _ in 0..2_000 {
        let before = pose.bone_axis(Bone::Head, Axis::Y);
        driver.tick(&mut pose, false, &mut rng);
        let after = pose.bone_axis(Bone::Head, Axis::Y);
        assert!((after - before).abs() <= 0.008 + 1e-6);
        assert!((0.0..=1.0).contains(&after));
    }
}

#[test]
fn jaw_closes_when_not_talking() {
    let driver = AnimationDriver::default();
    let mut rng = StdRng::seed_from_u64(3);
    let mut pose = PoseState::new();
    pose.set_blendshape(Blendshape::JawOpen, 0.7);
    let report = driver.tick(&mut pose, false, &mut rng);
    assert!(!report.talking);
    assert_eq!(pose.blendshape(Blendshape::JawOpen), 0.0);
}

#[test]
fn jaw_moves_while_talking() {
    let driver = AnimationDriver::default();
    let mut rng = StdRng::seed_from_u64(5);
    let mut pose = PoseState::new();
    let mut seen = std::collections::BTreeSet::new();
    for _ in 0..200 {
        driver.tick(&mut pose, true, &mut rng);
        seen.insert(pose.blendshape(Blendshape::JawOpen).to_bits());
    }
    assert!(seen.len() > 2, "jaw never moved: {seen:?}");
}

#[test]
fn step_does_not_mutate_input() {
    let driver = AnimationDriver::default();
    let mut rng = StdRng::seed_from_u64(11);
    let pose = PoseState::new();
    let next = driver.step(&pose, true, &mut rng);
    assert_eq!(pose, PoseState::new());
    assert!(next.is_within_range());
}

#[test]
fn zero_probability_never_blinks() {
    let driver = AnimationDriver::new(DriverOpts {
        blink_probability: 0.0,
        ..DriverOpts::default()
    });
    let mut rng = StdRng::seed_from_u64(1);
    let mut pose = PoseState::new();
    for _ in 0..1_000 {
        assert!(!driver.tick(&mut pose, false, &mut rng).blinked);
    }
}

proptest! {
    #[test]
    fn every_tick_stays_in_range(
        seed in any::<u64>(),
        jaw in -2.0f32..3.0,
        yaw in -2.0f32..3.0,
        talk_pattern in proptest::collection::vec(any::<bool>(), 1..200),
    ) {
        let driver = AnimationDriver::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pose = PoseState::new();
        pose.set_blendshape(Blendshape::JawOpen, jaw);
        pose.set_bone_axis(Bone::Head, Axis::Y, yaw);
        for talking in talk_pattern {
            driver.tick(&mut pose, talking, &mut rng);
            prop_assert!(pose.is_within_range());
            let y = pose.bone_axis(Bone::Head, Axis::Y);
            prop_assert!((0.0..=1.0).contains(&y));
            let j = pose.blendshape(Blendshape::JawOpen);
            prop_assert!((0.0..=1.0).contains(&j));
        }
    }
}
