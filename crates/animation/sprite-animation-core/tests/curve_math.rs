use sprite_animation_core::{
    curve::{CurveType, EasingCurve},
    loop_component::{Direction, LoopComponent, LoopMode},
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn value_at(curve_type: CurveType, t: f32) -> f32 {
    let mut c = EasingCurve::new(curve_type).with_range(2.0, 1.0);
    c.set_time(t);
    c.value()
}

#[test]
fn polynomial_curves_span_shift_to_scale_plus_shift() {
    for ct in [
        CurveType::Linear,
        CurveType::Quad,
        CurveType::Cubic,
        CurveType::Quart,
        CurveType::Quint,
    ] {
        approx(value_at(ct, 0.0), 1.0, 1e-6);
        approx(value_at(ct, 1.0), 3.0, 1e-6);
    }
    approx(value_at(CurveType::Quad, 0.5), 1.5, 1e-6);
    approx(value_at(CurveType::Cubic, 0.5), 1.25, 1e-6);
}

#[test]
fn sine_circ_and_expo_endpoints() {
    approx(value_at(CurveType::Sine, 0.0), 1.0, 1e-5);
    approx(value_at(CurveType::Sine, 0.5), 3.0, 1e-5);
    approx(value_at(CurveType::Sine, 1.0), 1.0, 1e-5);

    approx(value_at(CurveType::Circ, 0.0), 3.0, 1e-6);
    approx(value_at(CurveType::Circ, 1.0), 1.0, 1e-6);

    // 2^p: one at p=0, two at p=1
    approx(value_at(CurveType::Expo, 0.0), 3.0, 1e-6);
    approx(value_at(CurveType::Expo, 1.0), 5.0, 1e-6);
}

#[test]
fn names_are_unique() {
    let mut names: Vec<_> = CurveType::ALL.iter().map(|c| c.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), CurveType::ALL.len());
}

#[test]
fn disabled_saturates_and_stays() {
    let mut c = EasingCurve::new(CurveType::Linear);
    c.next(0.6);
    approx(c.time(), 0.6, 1e-6);
    c.next(5.0);
    approx(c.time(), 1.0, 0.0);
    assert!(c.at_boundary());
    let v = c.next(5.0);
    approx(c.time(), 1.0, 0.0);
    approx(v, 1.0, 1e-6);
    assert!(!c.looping.has_just_reset);
}

#[test]
fn rewind_wraps_fractional_overshoot() {
    let mut c = EasingCurve::new(CurveType::Linear).with_loop_mode(LoopMode::Rewind);
    c.set_time(0.9);
    c.next(0.3);
    approx(c.time(), 0.2, 1e-5);
    assert!(c.looping.has_just_reset);
    assert!(c.is_forward());
}

#[test]
fn ping_pong_bounces_at_the_end() {
    let mut c = EasingCurve::new(CurveType::Linear).with_loop_mode(LoopMode::PingPong);
    c.set_time(0.9);
    c.next(0.3);
    approx(c.time(), 1.0, 0.0);
    assert!(!c.is_forward());
    assert!(c.looping.has_just_reset);

    c.looping.has_just_reset = false;
    c.next(0.3);
    approx(c.time(), 0.7, 1e-6);
    assert!(!c.is_forward());
    assert!(!c.looping.has_just_reset);
}

#[test]
fn backward_direction_runs_the_curve_mirrored() {
    let mut c = EasingCurve::new(CurveType::Quad)
        .with_loop(LoopComponent::new(LoopMode::Disabled).with_direction(Direction::Backward));
    approx(c.value(), 1.0, 1e-6);
    c.next(0.5);
    approx(c.value(), 0.25, 1e-6);
    c.next(0.5);
    approx(c.value(), 0.0, 1e-6);
    assert!(c.at_boundary());
}

#[test]
fn initial_time_is_clamped() {
    let c = EasingCurve::new(CurveType::Linear).with_initial(1.5);
    assert_eq!(c.initial, Some(1.0));
}

#[test]
fn loop_delay_waits_after_the_boundary_frame() {
    let mut lc = LoopComponent::new(LoopMode::Rewind).with_delay(0.5);
    assert!(!lc.should_wait_delay(0.25));

    lc.has_just_reset = true;
    // boundary frame itself still advances
    assert!(!lc.should_wait_delay(0.25));
    assert!(lc.is_waiting());
    assert!(lc.should_wait_delay(0.25));
    assert!(lc.should_wait_delay(0.25));
    approx(lc.current_delay(), 0.5, 1e-6);
    assert!(!lc.should_wait_delay(0.25));
    assert!(!lc.is_waiting());
    assert!(!lc.should_wait_delay(0.25));
}

#[test]
fn curve_json_skips_runtime_cursor() {
    let mut c = EasingCurve::new(CurveType::Sine)
        .with_range(3.0, -1.0)
        .with_loop_mode(LoopMode::PingPong)
        .with_initial(0.25);
    c.set_time(0.8);
    let json = serde_json::to_value(&c).unwrap();
    assert_eq!(json["curve_type"], "sine");
    assert_eq!(json["loop"]["mode"], "ping_pong");
    assert!(json.get("time").is_none());

    let back: EasingCurve = serde_json::from_value(json).unwrap();
    assert_eq!(back.time(), 0.0);
    assert!(back.is_forward());
    assert_eq!(back.initial, Some(0.25));
    assert_eq!(back.loop_mode(), LoopMode::PingPong);
}
